//! Build mode passed to the external bundler.

use std::fmt;

/// Bundler optimization mode.
///
/// `build` and `watch` bundle in [`BuildMode::Development`]; `release`
/// bundles in [`BuildMode::Production`] (minified output).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Unminified output with readable module names
    #[default]
    Development,
    /// Minified, optimized output
    Production,
}

impl BuildMode {
    /// Value passed as `--mode` and `NODE_ENV`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
