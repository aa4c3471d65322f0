//! Command line interface.
//!
//! Loads `package.json` from the working directory and runs the selected
//! pipeline, or keeps rebuilding in watch mode.

mod args;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::{Pipeline, PipelineKind};
use crate::error::Result;
use anyhow::Context;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let runtime = RuntimeConfig::from(&args);

    let project_root = std::env::current_dir().context("determining the project directory")?;
    let manifest = crate::metadata::load_manifest(&project_root)?;
    log::debug!("Loaded manifest for {}", manifest.package.widget_name);

    match args.selected_command() {
        Command::Build => run_once(&manifest, PipelineKind::Build, runtime).await,
        Command::Release => run_once(&manifest, PipelineKind::Release, runtime).await,
        Command::Watch => {
            let settings = manifest.settings(PipelineKind::Build.mode())?;
            let pipeline = Pipeline::new(settings, runtime.clone());
            crate::watcher::watch(&pipeline, &runtime).await?;
            Ok(0)
        }
    }
}

async fn run_once(
    manifest: &crate::metadata::WidgetManifest,
    kind: PipelineKind,
    runtime: RuntimeConfig,
) -> Result<i32> {
    let settings = manifest.settings(kind.mode())?;
    runtime.progress(&format!(
        "Running {} for {} {}",
        kind.name(),
        settings.widget_name(),
        settings.version_string()
    ));

    Pipeline::new(settings, runtime).run().await?;
    Ok(0)
}
