//! Watch loop

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::bundler::Pipeline;
use crate::cli::RuntimeConfig;
use crate::error::Result;

use super::event::{WatchEvent, WatchEventKind, WatcherState};

/// How often pending changes are checked against the debounce window.
const POLL_MS: u64 = 50;

/// Builds once, then rebuilds after every change under `src/` until Ctrl+C.
pub async fn watch(pipeline: &Pipeline, runtime: &RuntimeConfig) -> Result<()> {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    watch_until(pipeline, runtime, ctrl_c).await
}

/// Like [`watch`], stopping when `shutdown` resolves.
///
/// A build in progress when `shutdown` resolves is abandoned and its child
/// processes are killed.
pub async fn watch_until(
    pipeline: &Pipeline,
    runtime: &RuntimeConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let source = pipeline.settings().source_dir();
    tokio::pin!(shutdown);

    report(
        runtime,
        WatchEventKind::WatchStarted {
            source: source.clone(),
        },
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<PathBuf>();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) if is_relevant(&event.kind) => {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Watch error: {}", e),
        },
        Config::default(),
    )?;
    watcher.watch(&source, RecursiveMode::Recursive)?;

    tokio::select! {
        _ = &mut shutdown => {
            report(runtime, WatchEventKind::Shutdown);
            return Ok(());
        }
        _ = build(pipeline, runtime) => {}
    }

    let mut state = WatcherState::new();
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(path) = rx.recv() => {
                state.add_change(path);
                continue;
            }
            _ = tokio::time::sleep(Duration::from_millis(POLL_MS)) => {}
        }

        if state.should_build() {
            for path in state.take_changes() {
                let path = path
                    .strip_prefix(pipeline.settings().project_root())
                    .map(|p| p.to_path_buf())
                    .unwrap_or(path);
                report(runtime, WatchEventKind::FileChanged { path });
            }

            // Changes arriving meanwhile queue up in the channel and become
            // the next single rebuild.
            tokio::select! {
                _ = &mut shutdown => break,
                _ = build(pipeline, runtime) => {}
            }
        }
    }

    report(runtime, WatchEventKind::Shutdown);
    Ok(())
}

/// Runs the pipeline, reporting instead of propagating failures.
async fn build(pipeline: &Pipeline, runtime: &RuntimeConfig) {
    report(runtime, WatchEventKind::BuildStarted);
    let started = Instant::now();

    match pipeline.run().await {
        Ok(_) => report(
            runtime,
            WatchEventKind::BuildComplete {
                elapsed_ms: started.elapsed().as_millis(),
            },
        ),
        Err(e) => report(
            runtime,
            WatchEventKind::BuildFailed {
                message: e.to_string(),
            },
        ),
    }
}

fn report(runtime: &RuntimeConfig, kind: WatchEventKind) {
    let event = WatchEvent::now(kind);
    match &event.kind {
        WatchEventKind::BuildFailed { .. } => runtime.error(&event.to_string()),
        _ => runtime.progress(&event.to_string()),
    }
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}
