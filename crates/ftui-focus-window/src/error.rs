#![forbid(unsafe_code)]

//! Error types for focus window construction and focus resolution.

use std::fmt;

/// A violated configuration rule, reported by [`FocusWindowConfig::validate`].
///
/// Rules are checked in declaration order; only the first failure is reported.
///
/// [`FocusWindowConfig::validate`]: crate::FocusWindowConfig::validate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No sorter was supplied.
    MissingSorter,
    /// No key extractor was supplied.
    MissingKeyExtractor,
    /// The buffer must hold at least one slot.
    ZeroReservedSize,
    /// `max_length` is larger than the buffer.
    MaxLengthExceedsReserved {
        max_length: usize,
        reserved_size: usize,
    },
    /// `initial_focus_index` points past the buffer.
    FocusIndexExceedsReserved {
        initial_focus_index: usize,
        reserved_size: usize,
    },
    /// More prepend items than slots before the initial focus.
    PrependExceedsFocusIndex {
        len: usize,
        initial_focus_index: usize,
    },
    /// More append items than slots from the initial focus onwards.
    AppendExceedsTrailingSpace { len: usize, available: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSorter => f.write_str("sorter is required"),
            Self::MissingKeyExtractor => f.write_str("keyExtractor is required"),
            Self::ZeroReservedSize => f.write_str("reservedSize must be greater than zero"),
            Self::MaxLengthExceedsReserved {
                max_length,
                reserved_size,
            } => write!(
                f,
                "maxLength cannot be greater than reservedSize ({max_length} > {reserved_size})"
            ),
            Self::FocusIndexExceedsReserved {
                initial_focus_index,
                reserved_size,
            } => write!(
                f,
                "initialFocusIndex cannot be greater than reservedSize \
                 ({initial_focus_index} > {reserved_size})"
            ),
            Self::PrependExceedsFocusIndex {
                len,
                initial_focus_index,
            } => write!(
                f,
                "prependItems.length cannot be greater than initialFocusIndex \
                 ({len} > {initial_focus_index})"
            ),
            Self::AppendExceedsTrailingSpace { len, available } => write!(
                f,
                "appendItems.length cannot be greater than reservedSize - initialFocusIndex \
                 ({len} > {available})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Focus could not be moved onto the requested slot.
///
/// The focus index has already been overwritten (and the focused key
/// cleared) by the time this is returned. Callers must re-focus a valid slot
/// before relying on focus state again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusError {
    /// The slot exists but holds no item.
    EmptySlot { index: usize },
    /// The index is past the end of the buffer.
    OutOfBounds { index: usize, reserved_size: usize },
}

impl FocusError {
    /// The index that was rejected.
    #[must_use]
    pub fn index(&self) -> usize {
        match *self {
            Self::EmptySlot { index } | Self::OutOfBounds { index, .. } => index,
        }
    }
}

impl fmt::Display for FocusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySlot { index } => {
                write!(f, "cannot focus empty slot at index {index}")
            }
            Self::OutOfBounds {
                index,
                reserved_size,
            } => write!(
                f,
                "focus index {index} is out of bounds (reservedSize={reserved_size})"
            ),
        }
    }
}

impl std::error::Error for FocusError {}
