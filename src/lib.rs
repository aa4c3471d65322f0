//! Build orchestrator for pluggable widgets.
//!
//! Turns a widget project (a `package.json`, a `src/{widgetName}.xml`
//! descriptor and a webpack configuration) into a `.mpk` archive and
//! deploys it into a test project:
//! - [`bundler`] - settings, pipeline steps and the orchestrator
//! - [`metadata`] - `package.json` loading
//! - [`watcher`] - rebuild on change
//! - [`cli`] - argument parsing and operator output
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod watcher;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
