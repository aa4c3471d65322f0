//! Watch event types and debounce state

use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Something the watcher reports to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEventKind {
    WatchStarted { source: PathBuf },
    FileChanged { path: PathBuf },
    BuildStarted,
    BuildComplete { elapsed_ms: u128 },
    BuildFailed { message: String },
    Shutdown,
}

/// A timestamped watcher event.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    pub at: DateTime<Local>,
    pub kind: WatchEventKind,
}

impl WatchEvent {
    pub fn now(kind: WatchEventKind) -> Self {
        Self {
            at: Local::now(),
            kind,
        }
    }
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.at.format("%H:%M:%S"))?;
        match &self.kind {
            WatchEventKind::WatchStarted { source } => {
                write!(f, "Watching {} for changes", source.display())
            }
            WatchEventKind::FileChanged { path } => write!(f, "Changed: {}", path.display()),
            WatchEventKind::BuildStarted => f.write_str("Rebuilding"),
            WatchEventKind::BuildComplete { elapsed_ms } => {
                write!(f, "Build complete in {elapsed_ms} ms")
            }
            WatchEventKind::BuildFailed { message } => write!(f, "Build failed: {message}"),
            WatchEventKind::Shutdown => f.write_str("Stopped watching"),
        }
    }
}

/// Watcher state for debouncing.
///
/// Changes accumulate until nothing new has arrived for [`DEBOUNCE_MS`];
/// everything pending is then handed out as one rebuild.
pub(crate) struct WatcherState {
    pub(crate) pending_changes: BTreeSet<PathBuf>,
    pub(crate) last_change: Option<Instant>,
}

impl WatcherState {
    pub(crate) fn new() -> Self {
        Self {
            pending_changes: BTreeSet::new(),
            last_change: None,
        }
    }

    pub(crate) fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    pub(crate) fn should_build(&self) -> bool {
        match self.last_change {
            Some(last) => {
                !self.pending_changes.is_empty()
                    && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
            }
            None => false,
        }
    }

    pub(crate) fn take_changes(&mut self) -> Vec<PathBuf> {
        self.last_change = None;
        std::mem::take(&mut self.pending_changes).into_iter().collect()
    }
}
