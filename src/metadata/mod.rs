//! Project descriptor loading from package.json

use crate::bundler::{
    BuildMode, CommandSpec, DependencySettings, MismatchPolicy, PackageSettings, Settings,
    SettingsBuilder, ToolSettings,
};
use crate::error::{BundlerError, CliError, Result};
use path_absolutize::Absolutize;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Descriptor file name looked up in the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// Subset of `package.json` the pipeline reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    widget_name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    #[serde(default)]
    config: BuildConfig,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
}

/// The `config` section of `package.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildConfig {
    project_path: Option<String>,
    webpack_config: Option<PathBuf>,
    bundler: Option<CommandSpec>,
    install: Option<CommandSpec>,
    version_mismatch: Option<MismatchPolicy>,
}

/// Complete project configuration read from `package.json`.
///
/// Loaded once per process; [`WidgetManifest::settings`] turns it into the
/// [`Settings`] value every pipeline step receives.
#[derive(Debug, Clone)]
pub struct WidgetManifest {
    /// Directory holding `package.json`
    pub project_root: PathBuf,

    /// `widgetName`, `version`, `description`
    pub package: PackageSettings,

    /// Absolute external project path
    pub project_path: PathBuf,

    /// Bundler and installer configuration
    pub tools: ToolSettings,

    /// `devDependencies` plus mismatch policy
    pub dependencies: DependencySettings,
}

impl WidgetManifest {
    /// Builds pipeline settings for the given bundler mode.
    pub fn settings(&self, mode: BuildMode) -> Result<Settings> {
        Ok(SettingsBuilder::new()
            .project_root(&self.project_root)
            .project_path(&self.project_path)
            .package_settings(self.package.clone())
            .mode(mode)
            .tool_settings(self.tools.clone())
            .dependency_settings(self.dependencies.clone())
            .build()?)
    }
}

/// Load the widget manifest from `{project_root}/package.json`.
///
/// `widgetName` and `version` are required. `config.projectPath` is
/// optional; relative values resolve against the project root and
/// Windows-style separators are accepted on every host.
pub fn load_manifest(project_root: &Path) -> Result<WidgetManifest> {
    let manifest_path = project_root.join(MANIFEST_FILE);

    let raw = std::fs::read_to_string(&manifest_path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_package_json".to_string(),
            reason: format!("Failed to read {}: {}", manifest_path.display(), e),
        })
    })?;

    let package: PackageJson = serde_json::from_str(&raw).map_err(|e| {
        BundlerError::Cli(CliError::InvalidManifest {
            path: manifest_path.clone(),
            reason: e.to_string(),
        })
    })?;

    let widget_name = package.widget_name.ok_or_else(|| {
        BundlerError::Cli(CliError::InvalidManifest {
            path: manifest_path.clone(),
            reason: "missing 'widgetName'".to_string(),
        })
    })?;

    let version = package.version.ok_or_else(|| {
        BundlerError::Cli(CliError::InvalidManifest {
            path: manifest_path.clone(),
            reason: "missing 'version'".to_string(),
        })
    })?;

    let project_path = match package.config.project_path.as_deref() {
        Some(raw_path) if !raw_path.trim().is_empty() => {
            resolve_project_path(project_root, raw_path)?
        }
        _ => {
            log::debug!("config.projectPath not set, using dist/MxTestProject");
            project_root.join("dist").join("MxTestProject")
        }
    };

    let mut tools = ToolSettings::default();
    if let Some(webpack_config) = package.config.webpack_config {
        tools.webpack_config = webpack_config;
    }
    tools.bundler = package.config.bundler;
    if let Some(install) = package.config.install {
        tools.install = install;
    }

    let dependencies = DependencySettings {
        dev_dependencies: package.dev_dependencies,
        version_mismatch: package.config.version_mismatch.unwrap_or_default(),
    };

    log::info!(
        "Loaded {} {} (project path: {})",
        widget_name,
        version,
        project_path.display()
    );

    Ok(WidgetManifest {
        project_root: project_root.to_path_buf(),
        package: PackageSettings {
            widget_name,
            version,
            description: package.description,
        },
        project_path,
        tools,
        dependencies,
    })
}

/// Normalizes separators and resolves a configured project path.
fn resolve_project_path(project_root: &Path, raw: &str) -> Result<PathBuf> {
    let normalized = if cfg!(windows) {
        raw.to_string()
    } else {
        raw.replace('\\', "/")
    };

    let joined = project_root.join(normalized);
    let absolute = joined.absolutize().map_err(|e| {
        BundlerError::Cli(CliError::InvalidArguments {
            reason: format!("Invalid projectPath {}: {}", raw, e),
        })
    })?;

    Ok(absolute.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_manifest(dir: &Path, json: &str) {
        std::fs::write(dir.join(MANIFEST_FILE), json).unwrap();
    }

    #[test]
    fn reads_widget_name_version_and_project_path() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{
                "name": "my-widget",
                "widgetName": "MyWidget",
                "version": "1.0.0",
                "config": { "projectPath": "/proj" },
                "devDependencies": { "webpack": "^5.0.0" }
            }"#,
        );

        let manifest = load_manifest(dir.path()).unwrap();
        assert_eq!(manifest.package.widget_name, "MyWidget");
        assert_eq!(manifest.package.version, "1.0.0");
        assert_eq!(manifest.project_path, PathBuf::from("/proj"));
        assert_eq!(
            manifest.dependencies.dev_dependencies.get("webpack").map(String::as_str),
            Some("^5.0.0")
        );
        assert_eq!(manifest.dependencies.version_mismatch, MismatchPolicy::Warn);
        assert_eq!(manifest.tools.install, CommandSpec::new("npm", &["install"]));
    }

    #[test]
    fn relative_project_path_resolves_against_root() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{ "widgetName": "W", "version": "1.0.0",
                 "config": { "projectPath": "..\\host\\app" } }"#,
        );

        let manifest = load_manifest(dir.path()).unwrap();
        if !cfg!(windows) {
            let parent = dir.path().parent().unwrap();
            assert_eq!(manifest.project_path, parent.join("host").join("app"));
        }
    }

    #[test]
    fn missing_project_path_defaults_to_test_project() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), r#"{ "widgetName": "W", "version": "0.1.0" }"#);

        let manifest = load_manifest(dir.path()).unwrap();
        assert_eq!(
            manifest.project_path,
            dir.path().join("dist").join("MxTestProject")
        );
    }

    #[test]
    fn missing_widget_name_is_rejected() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), r#"{ "version": "0.1.0" }"#);

        let err = load_manifest(dir.path()).unwrap_err();
        assert!(err.to_string().contains("widgetName"));
    }

    #[test]
    fn unreadable_manifest_is_a_cli_error_naming_the_file() {
        let dir = tempdir().unwrap();

        let err = load_manifest(dir.path()).unwrap_err();

        assert!(matches!(
            err,
            BundlerError::Cli(CliError::ExecutionFailed { .. })
        ));
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn tool_overrides_and_policy_are_read() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{ "widgetName": "W", "version": "0.1.0",
                 "config": {
                     "webpackConfig": "build/webpack.js",
                     "bundler": { "command": "sh", "args": ["bundle.sh"] },
                     "install": { "command": "yarn" },
                     "versionMismatch": "fail"
                 } }"#,
        );

        let manifest = load_manifest(dir.path()).unwrap();
        assert_eq!(manifest.tools.webpack_config, PathBuf::from("build/webpack.js"));
        assert_eq!(
            manifest.tools.bundler,
            Some(CommandSpec::new("sh", &["bundle.sh"]))
        );
        assert_eq!(manifest.tools.install.display(), "yarn");
        assert_eq!(manifest.dependencies.version_mismatch, MismatchPolicy::Fail);

        let settings = manifest.settings(BuildMode::Production).unwrap();
        assert_eq!(settings.mode(), BuildMode::Production);
        assert_eq!(
            settings.webpack_config_path(),
            dir.path().join("build/webpack.js")
        );
    }
}
