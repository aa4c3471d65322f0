//! External tool and dependency configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// A program plus its leading arguments.
///
/// # Configuration
///
/// ```json
/// "config": {
///     "bundler": { "command": "npx", "args": ["webpack"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CommandSpec {
    /// Program name or path, looked up on PATH when not a path.
    pub command: String,

    /// Arguments placed before any the step appends.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Creates a command spec.
    pub fn new(command: impl Into<String>, args: &[&str]) -> Self {
        Self {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Human-readable command line.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// External tool configuration.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Webpack configuration file, relative to the project root.
    ///
    /// Default: `webpack.config.js`
    pub webpack_config: PathBuf,

    /// Bundler override.
    ///
    /// Default: None (`node_modules/.bin/webpack`, else `npx webpack`)
    pub bundler: Option<CommandSpec>,

    /// Command that installs missing development dependencies.
    ///
    /// Default: `npm install`
    pub install: CommandSpec,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            webpack_config: PathBuf::from("webpack.config.js"),
            bundler: None,
            install: CommandSpec::new("npm", &["install"]),
        }
    }
}

/// What to do when an installed dependency does not satisfy its range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Report and continue
    #[default]
    Warn,
    /// Fail the dependency step
    Fail,
}

/// Declared development dependencies and the mismatch policy.
#[derive(Debug, Clone, Default)]
pub struct DependencySettings {
    /// `devDependencies` from `package.json`, name to version range.
    pub dev_dependencies: BTreeMap<String, String>,

    /// Version mismatch handling.
    pub version_mismatch: MismatchPolicy,
}
