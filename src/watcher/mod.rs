//! Watch mode
//!
//! Implements the `watch` command with:
//! - An initial build on start
//! - Debouncing (100ms) with changes coalesced into one rebuild
//! - Failures reported without stopping the watcher
//! - Graceful Ctrl+C shutdown

mod event;
mod sync;

pub use event::{DEBOUNCE_MS, WatchEvent, WatchEventKind};
pub use sync::{watch, watch_until};
