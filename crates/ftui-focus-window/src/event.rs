#![forbid(unsafe_code)]

//! Focus change notifications.

/// The focus index moved as the result of a mutation.
///
/// Returned from [`FocusWindow::append`] and [`FocusWindow::prepend`] and
/// handed to the configured observer. A UI layer uses `index - previous` to
/// shift its scroll offset so the focused row stays in place.
///
/// [`FocusWindow::append`]: crate::FocusWindow::append
/// [`FocusWindow::prepend`]: crate::FocusWindow::prepend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusChange {
    /// Focus index after the mutation.
    pub index: usize,
    /// Focus index before the mutation.
    pub previous: usize,
}

impl FocusChange {
    #[must_use]
    pub const fn new(index: usize, previous: usize) -> Self {
        Self { index, previous }
    }

    /// Signed distance the focus moved (positive = towards the bottom).
    #[must_use]
    pub fn delta(&self) -> isize {
        self.index as isize - self.previous as isize
    }

    /// Whether the index stayed put (first population reports this).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.index == self.previous
    }
}
