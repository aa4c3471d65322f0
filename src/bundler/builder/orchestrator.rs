//! Pipeline orchestration.
//!
//! This module provides the [`Pipeline`] that runs the build steps in order
//! against one [`Settings`] value.

use super::{BuildReport, PipelineError, Step};
use crate::bundler::{BuildMode, Result, Settings, steps};
use crate::cli::RuntimeConfig;
use tokio::sync::Mutex;

/// The two pipelines the tool offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Development bundle
    Build,
    /// Production bundle
    Release,
}

impl PipelineKind {
    /// Bundler mode for this pipeline.
    pub fn mode(&self) -> BuildMode {
        match self {
            PipelineKind::Build => BuildMode::Development,
            PipelineKind::Release => BuildMode::Production,
        }
    }

    /// Name shown to the operator.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineKind::Build => "build",
            PipelineKind::Release => "release",
        }
    }
}

/// Runs an ordered list of steps.
///
/// The first failing step stops the run; nothing done by earlier steps is
/// rolled back. Concurrent calls to [`Pipeline::run`] on the same pipeline
/// wait for each other.
///
/// # Examples
///
/// ```no_run
/// use widget_bundler::bundler::{Pipeline, PipelineKind, Settings};
/// use widget_bundler::cli::RuntimeConfig;
///
/// # async fn example(settings: Settings) -> Result<(), widget_bundler::bundler::PipelineError> {
/// let pipeline = Pipeline::for_kind(&settings, PipelineKind::Release, RuntimeConfig::new(false, false));
/// let report = pipeline.run().await?;
/// for path in report.archive_paths() {
///     println!("Created: {}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pipeline {
    settings: Settings,
    runtime: RuntimeConfig,
    steps: Vec<Step>,
    lock: Mutex<()>,
}

impl Pipeline {
    /// Creates a pipeline running every step with the given settings.
    pub fn new(settings: Settings, runtime: RuntimeConfig) -> Self {
        Self {
            settings,
            runtime,
            steps: Step::ALL.to_vec(),
            lock: Mutex::new(()),
        }
    }

    /// Creates the `build` or `release` pipeline from shared settings.
    pub fn for_kind(settings: &Settings, kind: PipelineKind, runtime: RuntimeConfig) -> Self {
        Self::new(settings.with_mode(kind.mode()), runtime)
    }

    /// Replaces the step list.
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Settings every step receives.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs every step in order.
    pub async fn run(&self) -> std::result::Result<BuildReport, PipelineError> {
        let _guard = self.lock.lock().await;
        let started = std::time::Instant::now();
        let mut report = BuildReport::new(self.settings.mode());

        log::info!(
            "Starting {} mode pipeline for {} {}",
            self.settings.mode(),
            self.settings.widget_name(),
            self.settings.version_string()
        );

        for &step in &self.steps {
            self.runtime.section(step.description());
            self.run_step(step, &mut report)
                .await
                .map_err(|source| PipelineError { step, source })?;
        }

        report.elapsed = started.elapsed();
        self.print_summary(&report);
        Ok(report)
    }

    async fn run_step(&self, step: Step, report: &mut BuildReport) -> Result<()> {
        let settings = &self.settings;
        match step {
            Step::Clean => {
                report.cleaned = steps::clean(settings).await?;
                self.runtime
                    .verbose(&format!("Removed {} stale entries", report.cleaned));
            }
            Step::Typings => {
                let path = steps::generate_typings(settings).await?;
                self.runtime.success(&format!("Wrote {}", path.display()));
                report.typings = Some(path);
            }
            Step::Dependencies => {
                let deps = steps::check_dependencies(settings).await?;
                if !deps.installed.is_empty() {
                    self.runtime
                        .progress(&format!("Installed {}", deps.installed.join(", ")));
                }
                for mismatch in &deps.mismatches {
                    self.runtime.warn(&format!("Version mismatch: {mismatch}"));
                }
                self.runtime
                    .verbose(&format!("{} devDependencies checked", deps.checked));
                report.dependencies = Some(deps);
            }
            Step::Webpack => {
                report.bundle = Some(steps::run_webpack(settings, &self.runtime).await?);
            }
            Step::Archive => {
                let archive = steps::create_archive(settings).await?;
                for path in &archive.paths {
                    self.runtime.indent(&path.display().to_string());
                }
                report.archive = Some(archive);
            }
            Step::Deploy => {
                report.deployed = steps::copy_to_deployment(settings).await?;
            }
        }
        Ok(())
    }

    fn print_summary(&self, report: &BuildReport) {
        if let Some(archive) = &report.archive {
            self.runtime.progress(&format!(
                "{} ({}), sha256 {}",
                self.settings.archive_name(),
                steps::format_size(archive.size),
                archive.checksum
            ));
        }
        if self.steps.contains(&Step::Deploy) {
            self.runtime
                .progress(&format!("Deployed {} files", report.deployed));
        }
        self.runtime.success(&format!(
            "Finished {} build in {:.2}s",
            report.mode,
            report.elapsed.as_secs_f64()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{CommandSpec, PackageSettings, SettingsBuilder, ToolSettings};
    use std::path::Path;
    use tempfile::tempdir;

    const DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<widget id="com.acme.MyWidget"><properties>
    <property key="label" type="string"><caption>Label</caption></property>
</properties></widget>"#;

    // Writes a bundle whose content depends on the mode and records each
    // invocation in bundler.log.
    const FAKE_BUNDLER: &str = "echo run >> bundler.log && \
        mkdir -p dist/tmp/widgets/com/acme && \
        printf \"bundle-$NODE_ENV\" > dist/tmp/widgets/com/acme/MyWidget.js";

    fn project(root: &Path, bundler: &str) -> Settings {
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("src/MyWidget.xml"), DESCRIPTOR).unwrap();
        SettingsBuilder::new()
            .project_root(root)
            .project_path(root.join("host"))
            .package_settings(PackageSettings {
                widget_name: "MyWidget".into(),
                version: "1.0.0".into(),
                description: None,
            })
            .tool_settings(ToolSettings {
                bundler: Some(CommandSpec::new("sh", &["-c", bundler])),
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn kinds_map_to_modes() {
        assert_eq!(PipelineKind::Build.mode(), BuildMode::Development);
        assert_eq!(PipelineKind::Release.mode(), BuildMode::Production);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn build_produces_every_artifact() {
        let dir = tempdir().unwrap();
        let settings = project(dir.path(), FAKE_BUNDLER);

        let pipeline = Pipeline::for_kind(&settings, PipelineKind::Build, RuntimeConfig::quiet());
        let report = pipeline.run().await.unwrap();

        assert_eq!(report.mode, BuildMode::Development);
        assert!(report.typings.as_ref().unwrap().is_file());
        assert_eq!(report.archive_paths().len(), 2);
        for path in report.archive_paths() {
            assert!(path.is_file(), "{} missing", path.display());
        }
        assert_eq!(report.deployed, 1);
        assert_eq!(
            std::fs::read_to_string(
                settings
                    .deployment_widgets_dir()
                    .join("com/acme/MyWidget.js")
            )
            .unwrap(),
            "bundle-development"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_step_stops_the_pipeline() {
        let dir = tempdir().unwrap();
        let settings = project(dir.path(), FAKE_BUNDLER);
        std::fs::write(settings.descriptor_path(), "<widget><properties>").unwrap();

        let pipeline = Pipeline::new(settings.clone(), RuntimeConfig::quiet());
        let err = pipeline.run().await.unwrap_err();

        assert_eq!(err.step, Step::Typings);
        assert!(err.to_string().starts_with("Typings: "));
        assert!(!dir.path().join("bundler.log").exists());
        assert!(!settings.archive_paths()[0].exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn bundler_failure_leaves_no_archive() {
        let dir = tempdir().unwrap();
        let settings = project(dir.path(), "echo broken >&2; exit 1");
        let deployed = settings.deployment_widgets_dir();
        std::fs::create_dir_all(deployed.join("com/acme")).unwrap();
        std::fs::write(deployed.join("com/acme/MyWidget.js"), "previous build").unwrap();

        let err = Pipeline::new(settings.clone(), RuntimeConfig::quiet())
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.step, Step::Webpack);
        for path in settings.archive_paths() {
            assert!(!path.exists());
        }
        assert!(deployed.is_dir());
        assert!(deployed.read_dir().unwrap().next().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn concurrent_runs_are_serialized() {
        let dir = tempdir().unwrap();
        let settings = project(dir.path(), FAKE_BUNDLER);
        let pipeline = Pipeline::new(settings, RuntimeConfig::quiet());

        let (first, second) = tokio::join!(pipeline.run(), pipeline.run());

        assert!(first.is_ok());
        assert!(second.is_ok());
        let log = std::fs::read_to_string(dir.path().join("bundler.log")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn custom_step_list_runs_only_those_steps() {
        let dir = tempdir().unwrap();
        let settings = project(dir.path(), FAKE_BUNDLER);

        let pipeline = Pipeline::new(settings.clone(), RuntimeConfig::quiet())
            .with_steps(vec![Step::Clean, Step::Typings]);
        let report = pipeline.run().await.unwrap();

        assert!(report.typings.is_some());
        assert!(report.bundle.is_none());
        assert!(!dir.path().join("bundler.log").exists());
    }
}
