//! Core Settings struct and the filesystem layout derived from it.

use super::{BuildMode, DependencySettings, PackageSettings, ToolSettings};
use std::path::{Path, PathBuf};

/// Main settings for a pipeline run.
///
/// Constructed once via [`SettingsBuilder`](super::SettingsBuilder) and
/// passed by reference into every step. All output locations are derived
/// here so the steps agree on them.
///
/// # Layout
///
/// | Path | Purpose |
/// | --- | --- |
/// | `{root}/src/{widget}.xml` | widget descriptor |
/// | `{root}/typings/{widget}Props.d.ts` | generated typings |
/// | `{root}/dist/tmp/widgets/` | bundler output |
/// | `{root}/dist/{version}/{widget}.mpk` | versioned archive |
/// | `{project}/widgets/{widget}.mpk` | local archive copy |
/// | `{project}/deployment/web/widgets/` | deployed assets |
#[derive(Clone, Debug)]
pub struct Settings {
    /// Widget metadata.
    package: PackageSettings,

    /// Directory holding `package.json`.
    project_root: PathBuf,

    /// External host project the widget is deployed into.
    project_path: PathBuf,

    /// Bundler mode.
    mode: BuildMode,

    /// External tools.
    tools: ToolSettings,

    /// Development dependency checks.
    dependencies: DependencySettings,
}

impl Settings {
    /// Returns the widget name.
    pub fn widget_name(&self) -> &str {
        &self.package.widget_name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the package metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// Returns the bundler mode.
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Returns a copy of these settings with a different bundler mode.
    pub fn with_mode(&self, mode: BuildMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Returns the tool configuration.
    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// Returns the dependency configuration.
    pub fn dependencies(&self) -> &DependencySettings {
        &self.dependencies
    }

    /// Directory holding `package.json`.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// External host project path.
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Watched source tree.
    pub fn source_dir(&self) -> PathBuf {
        self.project_root.join("src")
    }

    /// Widget descriptor, `src/{widget}.xml`.
    pub fn descriptor_path(&self) -> PathBuf {
        self.source_dir().join(format!("{}.xml", self.widget_name()))
    }

    /// Folder receiving generated typings.
    pub fn typings_dir(&self) -> PathBuf {
        self.project_root.join("typings")
    }

    /// Generated typings file, `typings/{widget}Props.d.ts`.
    pub fn typings_path(&self) -> PathBuf {
        self.typings_dir()
            .join(format!("{}Props.d.ts", self.widget_name()))
    }

    /// Local `dist` folder.
    pub fn dist_dir(&self) -> PathBuf {
        self.project_root.join("dist")
    }

    /// Ephemeral staging folder, `dist/tmp`.
    pub fn tmp_dir(&self) -> PathBuf {
        self.dist_dir().join("tmp")
    }

    /// Bundler output tree, `dist/tmp/widgets`.
    pub fn bundle_output_dir(&self) -> PathBuf {
        self.tmp_dir().join("widgets")
    }

    /// Versioned distribution folder, `dist/{version}`.
    pub fn versioned_dist_dir(&self) -> PathBuf {
        self.dist_dir().join(self.version_string())
    }

    /// Host project's widgets folder.
    pub fn widgets_folder(&self) -> PathBuf {
        self.project_path.join("widgets")
    }

    /// Host project's deployment folder for unpacked widget assets.
    pub fn deployment_widgets_dir(&self) -> PathBuf {
        self.project_path
            .join("deployment")
            .join("web")
            .join("widgets")
    }

    /// Archive file name, `{widget}.mpk`.
    pub fn archive_name(&self) -> String {
        format!("{}.mpk", self.widget_name())
    }

    /// Both archive destinations, versioned copy first.
    pub fn archive_paths(&self) -> [PathBuf; 2] {
        let name = self.archive_name();
        [
            self.versioned_dist_dir().join(&name),
            self.widgets_folder().join(&name),
        ]
    }

    /// Webpack configuration file, resolved against the project root.
    pub fn webpack_config_path(&self) -> PathBuf {
        self.project_root.join(&self.tools.webpack_config)
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageSettings,
        project_root: PathBuf,
        project_path: PathBuf,
        mode: BuildMode,
        tools: ToolSettings,
        dependencies: DependencySettings,
    ) -> Self {
        Self {
            package,
            project_root,
            project_path,
            mode,
            tools,
            dependencies,
        }
    }
}
