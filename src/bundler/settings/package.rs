//! Widget package metadata.

/// Widget identity taken from `package.json`.
///
/// # Examples
///
/// ```no_run
/// use widget_bundler::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     widget_name: "MyWidget".into(),
///     version: "1.0.0".into(),
///     description: Some("Shows a greeting".into()),
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageSettings {
    /// Widget name (`widgetName` in `package.json`).
    ///
    /// Names the descriptor (`src/{name}.xml`), the typings file and the
    /// `.mpk` archive.
    pub widget_name: String,

    /// Version string, used for the versioned `dist/{version}` folder.
    pub version: String,

    /// Package description, informational only.
    pub description: Option<String>,
}
