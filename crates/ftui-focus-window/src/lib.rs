#![forbid(unsafe_code)]

//! Focus-anchored windowing for FrankenTUI virtualized feeds.
//!
//! A chat pane or log tail receives history in batches from both ends. The
//! [`FocusWindow`] keeps a bounded, sorted, deduplicated slice of that history
//! in a fixed-size slot buffer and reports when the focused row moves, so the
//! renderer can keep the viewport pinned to it.
//!
//! See [`window`] for the merge/trim/reposition pipeline.

pub mod config;
pub mod error;
pub mod event;
pub mod window;

pub use config::FocusWindowConfig;
pub use error::{ConfigError, FocusError};
pub use event::FocusChange;
pub use window::FocusWindow;
