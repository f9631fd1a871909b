#![forbid(unsafe_code)]

//! Fixed-capacity sorted window anchored on a focused item.
//!
//! A [`FocusWindow`] holds a bounded, sorted, key-deduplicated slice of an
//! unbounded feed (chat history, log tail, timeline) inside a slot buffer
//! whose length never changes. Batches stream in from either end through
//! [`append`](FocusWindow::append) and [`prepend`](FocusWindow::prepend);
//! the window keeps the focused item at a stable index whenever it can, so a
//! virtualized list rendering `slots()` does not jump.
//!
//! # Pipeline
//!
//! Every batch runs the same four steps:
//!
//! 1. **Merge** the batch with the occupied slots. A key already in the
//!    window keeps its existing item; the batch only contributes unseen keys.
//! 2. **Sort** the merged set with the configured sorter (stable).
//! 3. **Trim** to `max_length`, evicting from the end opposite the insertion
//!    direction (append evicts the top, prepend evicts the bottom).
//! 4. **Reposition** the result inside the buffer:
//!    - empty buffer: place against `initial_focus_index`
//!      (right after `reserved - initial` for append, ending at
//!      `initial` for prepend) and focus `initial_focus_index`;
//!    - focused key evicted: align to the insertion edge and focus the item
//!      nearest the opposite edge;
//!    - focused key kept: keep the focus index if the window fits around it,
//!      otherwise recenter the focus at `reserved / 2`.
//!
//! # Invariants
//!
//! 1. `slots().len() == reserved_size()` for the lifetime of the window.
//! 2. No two occupied slots share a key.
//! 3. Occupied slots, read in order, are sorted by the sorter.
//! 4. After a mutation, at most `max_length()` slots are occupied.
//! 5. `focused_key()` is always derived from the slot at `focused_index()`.
//!
//! # Example
//!
//! ```
//! use ftui_focus_window::{FocusChange, FocusWindow, FocusWindowConfig};
//!
//! let config = FocusWindowConfig::new()
//!     .with_reserved_size(10)
//!     .with_max_length(4)
//!     .with_initial_focus_index(5)
//!     .with_sorter(|a: &i32, b: &i32| a.cmp(b))
//!     .with_key_extractor(|item: &i32| item.to_string());
//! let mut window = FocusWindow::new(config).unwrap();
//!
//! assert_eq!(window.append([6, 7, 8]), Some(FocusChange::new(5, 5)));
//! assert_eq!(window.append([9, 10]), Some(FocusChange::new(6, 5)));
//! assert_eq!(window.focused_item(), Some(&7));
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;

use crate::config::{FocusObserver, FocusWindowConfig, KeyExtractor, Sorter, ValidatedConfig};
use crate::error::{ConfigError, FocusError};
use crate::event::FocusChange;

/// Direction a batch is inserted towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// Prepend: lowest-sorted end.
    Top,
    /// Append: highest-sorted end.
    Bottom,
}

/// A sorted, deduplicated window over a keyed feed, anchored on a focused item.
///
/// Not thread-safe by construction (the sorter, key extractor and observer
/// are plain boxed closures). Serialize access externally if shared.
pub struct FocusWindow<T, K = String> {
    /// Fixed-length backing buffer.
    slots: Vec<Option<T>>,
    /// Current anchor index. May point at an empty slot after a first
    /// population that does not reach `initial_focus_index`.
    focused_index: usize,
    /// Key of the item at `focused_index`, if any.
    focused_key: Option<K>,
    max_length: usize,
    initial_focus_index: usize,
    sorter: Sorter<T>,
    key_extractor: KeyExtractor<T, K>,
    on_focus_change: Option<FocusObserver>,
}

impl<T, K: Eq + Hash> FocusWindow<T, K> {
    /// Build a window from a config, then apply its prepend and append batches.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] the config violates.
    pub fn new(config: FocusWindowConfig<T, K>) -> Result<Self, ConfigError> {
        let ValidatedConfig {
            reserved_size,
            max_length,
            initial_focus_index,
            prepend_items,
            append_items,
            sorter,
            key_extractor,
            on_focus_change,
        } = config.into_validated()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            reserved_size,
            max_length,
            initial_focus_index,
            prepend = prepend_items.len(),
            append = append_items.len(),
            "FocusWindow::new"
        );

        let mut window = Self {
            slots: std::iter::repeat_with(|| None).take(reserved_size).collect(),
            focused_index: initial_focus_index,
            focused_key: None,
            max_length,
            initial_focus_index,
            sorter,
            key_extractor,
            on_focus_change,
        };

        if !prepend_items.is_empty() {
            window.insert(prepend_items, Edge::Top);
        }
        if !append_items.is_empty() {
            window.insert(append_items, Edge::Bottom);
        }
        Ok(window)
    }

    /// Merge `items` in from the bottom, evicting from the top when over
    /// `max_length`.
    ///
    /// Returns the focus change, if the focus index moved (or the window was
    /// populated for the first time).
    pub fn append(&mut self, items: impl IntoIterator<Item = T>) -> Option<FocusChange> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("focus_window.append").entered();

        self.insert(items.into_iter().collect(), Edge::Bottom)
    }

    /// Merge `items` in from the top, evicting from the bottom when over
    /// `max_length`.
    pub fn prepend(&mut self, items: impl IntoIterator<Item = T>) -> Option<FocusChange> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("focus_window.prepend").entered();

        self.insert(items.into_iter().collect(), Edge::Top)
    }

    /// Re-anchor on the item at `index`, then [`append`](Self::append).
    ///
    /// # Errors
    /// Fails like [`set_focused_index`](Self::set_focused_index), before the
    /// batch is touched.
    pub fn append_with_focus(
        &mut self,
        items: impl IntoIterator<Item = T>,
        index: usize,
    ) -> Result<Option<FocusChange>, FocusError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("focus_window.append", focus = index).entered();

        self.set_focused_index(index)?;
        Ok(self.insert(items.into_iter().collect(), Edge::Bottom))
    }

    /// Re-anchor on the item at `index`, then [`prepend`](Self::prepend).
    ///
    /// # Errors
    /// Fails like [`set_focused_index`](Self::set_focused_index), before the
    /// batch is touched.
    pub fn prepend_with_focus(
        &mut self,
        items: impl IntoIterator<Item = T>,
        index: usize,
    ) -> Result<Option<FocusChange>, FocusError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("focus_window.prepend", focus = index).entered();

        self.set_focused_index(index)?;
        Ok(self.insert(items.into_iter().collect(), Edge::Top))
    }

    /// Move the focus to `index` and re-read its key.
    ///
    /// This is not transactional: on failure the focus index has already
    /// been set to `index` and the focused key cleared. The next batch then
    /// treats the old anchor as gone.
    ///
    /// # Errors
    /// [`FocusError::EmptySlot`] if the slot holds no item,
    /// [`FocusError::OutOfBounds`] if `index >= reserved_size()`.
    pub fn set_focused_index(&mut self, index: usize) -> Result<(), FocusError> {
        self.focused_index = index;
        self.resolve_focused_key();
        if self.focused_key.is_some() {
            return Ok(());
        }

        let err = if index >= self.slots.len() {
            FocusError::OutOfBounds {
                index,
                reserved_size: self.slots.len(),
            }
        } else {
            FocusError::EmptySlot { index }
        };
        #[cfg(feature = "tracing")]
        tracing::warn!(index, error = %err, "focus target rejected");
        Err(err)
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// The whole buffer, empty slots included. Always `reserved_size()` long.
    #[must_use]
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Item at `index`, if occupied.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn focused_index(&self) -> usize {
        self.focused_index
    }

    #[must_use]
    pub fn focused_key(&self) -> Option<&K> {
        self.focused_key.as_ref()
    }

    /// Item currently under focus.
    #[must_use]
    pub fn focused_item(&self) -> Option<&T> {
        self.get(self.focused_index)
    }

    /// Occupied slots in buffer order, with their indices.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item)))
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied_len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether every slot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Index of the first occupied slot.
    #[must_use]
    pub fn first_occupied(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_some)
    }

    /// Index of the last occupied slot.
    #[must_use]
    pub fn last_occupied(&self) -> Option<usize> {
        self.slots.iter().rposition(Option::is_some)
    }

    /// Buffer index of the item with `key`.
    #[must_use]
    pub fn position_of(&self, key: &K) -> Option<usize> {
        self.occupied()
            .find(|(_, item)| (self.key_extractor)(item) == *key)
            .map(|(index, _)| index)
    }

    #[must_use]
    pub fn reserved_size(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    #[must_use]
    pub fn initial_focus_index(&self) -> usize {
        self.initial_focus_index
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    fn insert(&mut self, batch: Vec<T>, toward: Edge) -> Option<FocusChange> {
        let was_empty = self.is_empty();
        #[cfg(feature = "tracing")]
        tracing::trace!(batch = batch.len(), ?toward, was_empty, "insert");

        let mut candidates = self.merge(batch);
        self.trim(&mut candidates, toward);
        let change = self.reposition(candidates, toward, was_empty);

        if let Some(change) = change {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                index = change.index,
                previous = change.previous,
                "focus index changed"
            );
            if let Some(observer) = self.on_focus_change.as_mut() {
                observer(change);
            }
        }
        change
    }

    /// Drain the occupied slots and union them with `batch` by key, sorted.
    ///
    /// Existing items win key conflicts. Within the batch the last
    /// occurrence of a key wins.
    fn merge(&mut self, batch: Vec<T>) -> Vec<T> {
        let mut merged: Vec<T> = self.slots.iter_mut().filter_map(Option::take).collect();
        let existing = merged.len();

        let mut positions: HashMap<K, usize> = HashMap::with_capacity(existing + batch.len());
        for (index, item) in merged.iter().enumerate() {
            positions.insert((self.key_extractor)(item), index);
        }

        for item in batch {
            match positions.entry((self.key_extractor)(&item)) {
                Entry::Occupied(entry) => {
                    let index = *entry.get();
                    if index >= existing {
                        merged[index] = item;
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(merged.len());
                    merged.push(item);
                }
            }
        }

        merged.sort_by(|a, b| (self.sorter)(a, b));
        merged
    }

    /// Cut `candidates` down to `max_length`, evicting the edge opposite `toward`.
    fn trim(&self, candidates: &mut Vec<T>, toward: Edge) {
        if candidates.len() <= self.max_length {
            return;
        }
        let excess = candidates.len() - self.max_length;
        #[cfg(feature = "tracing")]
        tracing::trace!(excess, ?toward, "trim");
        match toward {
            Edge::Bottom => {
                candidates.drain(..excess);
            }
            Edge::Top => candidates.truncate(self.max_length),
        }
    }

    /// Lay `items` out in the buffer and move the focus. Returns the change
    /// to report, if any.
    fn reposition(&mut self, items: Vec<T>, toward: Edge, was_empty: bool) -> Option<FocusChange> {
        let reserved = self.slots.len();
        let previous = self.focused_index;

        if was_empty {
            let initial = self.initial_focus_index;
            let start = match toward {
                Edge::Bottom => (reserved - initial) as isize,
                Edge::Top => initial as isize + 1 - items.len() as isize,
            };
            #[cfg(feature = "tracing")]
            tracing::trace!(start, focus = initial, "reposition: first population");
            self.lay_out(start, items);
            self.focused_index = initial;
            self.resolve_focused_key();
            return Some(FocusChange::new(initial, previous));
        }

        let anchor = self.focused_key.as_ref().and_then(|key| {
            items
                .iter()
                .position(|item| (self.key_extractor)(item) == *key)
        });

        let (start, index) = match anchor {
            None if items.is_empty() => (0, self.initial_focus_index),
            None => match toward {
                Edge::Bottom => {
                    let index = reserved - items.len();
                    (index as isize, index)
                }
                Edge::Top => (0, items.len() - 1),
            },
            Some(before) => {
                let after = items.len() - before;
                let want_start = previous as isize - before as isize;
                let want_end = previous + after - 1;
                if want_start < 0 || want_end >= reserved {
                    let center = reserved / 2;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(want_start, want_end, center, "reposition: recenter");
                    (center as isize - before as isize, center)
                } else {
                    (want_start, previous)
                }
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(start, focus = index, anchored = anchor.is_some(), "reposition");
        self.lay_out(start, items);
        self.focused_index = index;
        self.resolve_focused_key();
        (index != previous).then_some(FocusChange::new(index, previous))
    }

    /// Clear the buffer and write `items` from `start`. Items landing outside
    /// the buffer are dropped.
    fn lay_out(&mut self, start: isize, items: Vec<T>) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        #[cfg(feature = "tracing")]
        let total = items.len();
        let mut placed = 0usize;
        for (offset, item) in items.into_iter().enumerate() {
            let slot = usize::try_from(start + offset as isize)
                .ok()
                .and_then(|index| self.slots.get_mut(index));
            if let Some(slot) = slot {
                *slot = Some(item);
                placed += 1;
            }
        }
        #[cfg(feature = "tracing")]
        {
            if placed < total {
                tracing::debug!(dropped = total - placed, start, "items pushed outside the buffer");
            }
        }
        debug_assert!(placed <= self.max_length);
    }

    fn resolve_focused_key(&mut self) {
        self.focused_key = self
            .slots
            .get(self.focused_index)
            .and_then(Option::as_ref)
            .map(|item| (self.key_extractor)(item));
    }
}

impl<T: fmt::Debug, K: fmt::Debug> fmt::Debug for FocusWindow<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusWindow")
            .field("slots", &self.slots)
            .field("focused_index", &self.focused_index)
            .field("focused_key", &self.focused_key)
            .field("max_length", &self.max_length)
            .field("initial_focus_index", &self.initial_focus_index)
            .finish_non_exhaustive()
    }
}
