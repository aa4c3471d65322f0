//! Builder for constructing Settings.

use super::{BuildMode, DependencySettings, PackageSettings, Settings, ToolSettings};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use widget_bundler::bundler::{BuildMode, PackageSettings, SettingsBuilder};
///
/// # fn example() -> widget_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root(".")
///     .project_path("../MxTestProject")
///     .package_settings(PackageSettings {
///         widget_name: "MyWidget".into(),
///         version: "1.0.0".into(),
///         ..Default::default()
///     })
///     .mode(BuildMode::Production)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_root: Option<PathBuf>,
    project_path: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    mode: BuildMode,
    tools: ToolSettings,
    dependencies: DependencySettings,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the directory holding `package.json`.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the external host project path.
    ///
    /// Default: `{project_root}/dist/MxTestProject`
    pub fn project_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets widget metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets the bundler mode.
    ///
    /// Default: [`BuildMode::Development`]
    pub fn mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets external tool configuration.
    pub fn tool_settings(mut self, tools: ToolSettings) -> Self {
        self.tools = tools;
        self
    }

    /// Sets development dependency configuration.
    pub fn dependency_settings(mut self, dependencies: DependencySettings) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `project_root` or `package_settings` is missing,
    /// or if the widget name or version is empty.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::{Context, Error};

        let project_root = self.project_root.context("project_root is required")?;
        let package = self
            .package_settings
            .context("package_settings is required")?;

        if package.widget_name.trim().is_empty() {
            return Err(Error::Config("widget name must not be empty".into()));
        }
        if package.version.trim().is_empty() {
            return Err(Error::Config("version must not be empty".into()));
        }

        let project_path = self
            .project_path
            .unwrap_or_else(|| project_root.join("dist").join("MxTestProject"));

        Ok(Settings::new(
            package,
            project_root,
            project_path,
            self.mode,
            self.tools,
            self.dependencies,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::ErrorKind;

    #[test]
    fn defaults_project_path_under_dist() {
        let settings = SettingsBuilder::new()
            .project_root("/w")
            .package_settings(PackageSettings {
                widget_name: "W".into(),
                version: "2.0.0".into(),
                description: None,
            })
            .build()
            .unwrap();
        assert_eq!(settings.project_path(), Path::new("/w/dist/MxTestProject"));
        assert_eq!(settings.mode(), BuildMode::Development);
    }

    #[test]
    fn rejects_empty_widget_name() {
        let err = SettingsBuilder::new()
            .project_root("/w")
            .package_settings(PackageSettings {
                widget_name: " ".into(),
                version: "1.0.0".into(),
                description: None,
            })
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn requires_package_settings() {
        assert!(SettingsBuilder::new().project_root("/w").build().is_err());
    }
}
