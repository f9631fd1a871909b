#![forbid(unsafe_code)]

//! Construction-time configuration for [`FocusWindow`].
//!
//! The config is a builder: start from [`FocusWindowConfig::new`] (which
//! carries the defaults below), chain `with_*` calls, and hand it to
//! [`FocusWindow::new`]. Nothing here can change after construction.
//!
//! | Field | Default |
//! |-------|---------|
//! | `reserved_size` | 10 000 |
//! | `max_length` | 1 000 |
//! | `initial_focus_index` | 5 000 |
//! | `prepend_items` / `append_items` | empty |
//! | `sorter` / `key_extractor` | unset (required) |
//! | `on_focus_change` | none |
//!
//! [`FocusWindow`]: crate::FocusWindow
//! [`FocusWindow::new`]: crate::FocusWindow::new

use std::cmp::Ordering;
use std::fmt;

use crate::error::ConfigError;
use crate::event::FocusChange;

/// Default number of slots in the backing buffer.
pub const DEFAULT_RESERVED_SIZE: usize = 10_000;
/// Default cap on occupied slots.
pub const DEFAULT_MAX_LENGTH: usize = 1_000;
/// Default anchor index for the first population.
pub const DEFAULT_INITIAL_FOCUS_INDEX: usize = 5_000;

/// Total order over items.
pub type Sorter<T> = Box<dyn Fn(&T, &T) -> Ordering>;
/// Derives the identity of an item.
pub type KeyExtractor<T, K> = Box<dyn Fn(&T) -> K>;
/// Receives focus index changes after each committed mutation.
pub type FocusObserver = Box<dyn FnMut(FocusChange)>;

/// Builder for a [`FocusWindow`](crate::FocusWindow).
pub struct FocusWindowConfig<T, K = String> {
    reserved_size: usize,
    max_length: usize,
    initial_focus_index: usize,
    prepend_items: Vec<T>,
    append_items: Vec<T>,
    sorter: Option<Sorter<T>>,
    key_extractor: Option<KeyExtractor<T, K>>,
    on_focus_change: Option<FocusObserver>,
}

/// A config that passed [`FocusWindowConfig::validate`].
pub(crate) struct ValidatedConfig<T, K> {
    pub reserved_size: usize,
    pub max_length: usize,
    pub initial_focus_index: usize,
    pub prepend_items: Vec<T>,
    pub append_items: Vec<T>,
    pub sorter: Sorter<T>,
    pub key_extractor: KeyExtractor<T, K>,
    pub on_focus_change: Option<FocusObserver>,
}

impl<T, K> Default for FocusWindowConfig<T, K> {
    fn default() -> Self {
        Self {
            reserved_size: DEFAULT_RESERVED_SIZE,
            max_length: DEFAULT_MAX_LENGTH,
            initial_focus_index: DEFAULT_INITIAL_FOCUS_INDEX,
            prepend_items: Vec::new(),
            append_items: Vec::new(),
            sorter: None,
            key_extractor: None,
            on_focus_change: None,
        }
    }
}

impl<T, K> FocusWindowConfig<T, K> {
    /// Create a config with default sizes and no sorter or key extractor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total number of slots.
    #[must_use]
    pub fn with_reserved_size(mut self, reserved_size: usize) -> Self {
        self.reserved_size = reserved_size;
        self
    }

    /// Set the cap on occupied slots.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the anchor index used for the first population.
    #[must_use]
    pub fn with_initial_focus_index(mut self, index: usize) -> Self {
        self.initial_focus_index = index;
        self
    }

    /// Items prepended once during construction.
    #[must_use]
    pub fn with_prepend_items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.prepend_items = items.into_iter().collect();
        self
    }

    /// Items appended once during construction, after the prepend batch.
    #[must_use]
    pub fn with_append_items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.append_items = items.into_iter().collect();
        self
    }

    /// Set the total order used to sort the window.
    #[must_use]
    pub fn with_sorter(mut self, sorter: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.sorter = Some(Box::new(sorter));
        self
    }

    /// Set the identity function. Two items with equal keys are the same item.
    #[must_use]
    pub fn with_key_extractor(mut self, extractor: impl Fn(&T) -> K + 'static) -> Self {
        self.key_extractor = Some(Box::new(extractor));
        self
    }

    /// Observe focus index changes.
    #[must_use]
    pub fn with_focus_observer(mut self, observer: impl FnMut(FocusChange) + 'static) -> Self {
        self.on_focus_change = Some(Box::new(observer));
        self
    }

    #[must_use]
    pub fn reserved_size(&self) -> usize {
        self.reserved_size
    }

    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    #[must_use]
    pub fn initial_focus_index(&self) -> usize {
        self.initial_focus_index
    }

    /// Check every construction rule, reporting the first one violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sorter.is_none() {
            return Err(ConfigError::MissingSorter);
        }
        if self.key_extractor.is_none() {
            return Err(ConfigError::MissingKeyExtractor);
        }
        if self.reserved_size == 0 {
            return Err(ConfigError::ZeroReservedSize);
        }
        if self.max_length > self.reserved_size {
            return Err(ConfigError::MaxLengthExceedsReserved {
                max_length: self.max_length,
                reserved_size: self.reserved_size,
            });
        }
        if self.initial_focus_index > self.reserved_size {
            return Err(ConfigError::FocusIndexExceedsReserved {
                initial_focus_index: self.initial_focus_index,
                reserved_size: self.reserved_size,
            });
        }
        if self.prepend_items.len() > self.initial_focus_index {
            return Err(ConfigError::PrependExceedsFocusIndex {
                len: self.prepend_items.len(),
                initial_focus_index: self.initial_focus_index,
            });
        }
        let available = self.reserved_size - self.initial_focus_index;
        if self.append_items.len() > available {
            return Err(ConfigError::AppendExceedsTrailingSpace {
                len: self.append_items.len(),
                available,
            });
        }
        Ok(())
    }

    pub(crate) fn into_validated(self) -> Result<ValidatedConfig<T, K>, ConfigError> {
        self.validate()?;
        let sorter = self.sorter.ok_or(ConfigError::MissingSorter)?;
        let key_extractor = self.key_extractor.ok_or(ConfigError::MissingKeyExtractor)?;
        Ok(ValidatedConfig {
            reserved_size: self.reserved_size,
            max_length: self.max_length,
            initial_focus_index: self.initial_focus_index,
            prepend_items: self.prepend_items,
            append_items: self.append_items,
            sorter,
            key_extractor,
            on_focus_change: self.on_focus_change,
        })
    }
}

impl<T, K> fmt::Debug for FocusWindowConfig<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusWindowConfig")
            .field("reserved_size", &self.reserved_size)
            .field("max_length", &self.max_length)
            .field("initial_focus_index", &self.initial_focus_index)
            .field("prepend_items", &self.prepend_items.len())
            .field("append_items", &self.append_items.len())
            .field("sorter", &self.sorter.is_some())
            .field("key_extractor", &self.key_extractor.is_some())
            .field("on_focus_change", &self.on_focus_change.is_some())
            .finish()
    }
}
