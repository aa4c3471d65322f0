//! Command line argument parsing.

use clap::{Parser, Subcommand};

/// Build orchestrator for pluggable widgets
#[derive(Parser, Debug)]
#[command(
    name = "widget_bundler",
    version,
    about = "Builds, packages and deploys a pluggable widget",
    long_about = "Builds, packages and deploys a pluggable widget described by ./package.json.

Every pipeline cleans previous output, generates typings from src/{widgetName}.xml,
checks devDependencies, runs webpack, writes {widgetName}.mpk to dist/{version}/ and
{projectPath}/widgets/, and copies the bundle into {projectPath}/deployment/web/widgets/.

Usage:
  widget_bundler build     development bundle
  widget_bundler release   production bundle
  widget_bundler watch     build now and again on every change under src/ (default)

Exit code 0 = pipeline completed."
)]
pub struct Args {
    /// Pipeline to run; defaults to `watch`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available pipelines.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the pipeline once in development mode
    Build,
    /// Run the pipeline once in production mode
    Release,
    /// Build, then rebuild on every change under src/
    Watch,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Selected command, `watch` when none was given.
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::Watch)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(_args: &Args) -> Self {
        Self::new(log::log_enabled!(log::Level::Debug), false)
    }
}

impl RuntimeConfig {
    /// Creates a runtime configuration.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Configuration that prints nothing but warnings and errors.
    pub fn quiet() -> Self {
        Self::new(false, true)
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose(&self, message: &str) {
        self.output.verbose(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) {
        self.output.warn(message)
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        self.output.error(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) {
        self.output.success(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        self.output.indent(message)
    }
}
