//! Top-level error types.
//!
//! Step failures arrive as [`PipelineError`](crate::bundler::PipelineError),
//! already labeled with the step that failed; everything that can go wrong
//! before a pipeline starts (arguments, `package.json`) is a [`CliError`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for application-level operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI and configuration errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Step errors outside a pipeline run (e.g. settings validation)
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),

    /// A pipeline step failed
    #[error("{0}")]
    Pipeline(#[from] crate::bundler::PipelineError),

    /// File watcher could not be set up
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments or configuration values
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// `package.json` is malformed or lacks required keys
    #[error("Invalid manifest {}: {reason}", .path.display())]
    InvalidManifest {
        /// Manifest path
        path: PathBuf,
        /// What is wrong
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}
