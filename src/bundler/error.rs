//! Error types for pipeline steps.
//!
//! Every step returns [`Result`]; the orchestrator attaches the failing
//! step's label on top of these (see [`crate::bundler::PipelineError`]).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for step operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of step failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Delete, copy, read or write failure.
    Filesystem,
    /// Malformed widget descriptor.
    Parse,
    /// Missing or unresolvable development dependency.
    Dependency,
    /// The external bundler failed or could not be started.
    Bundler,
    /// Invalid project configuration.
    Config,
}

/// Errors raised by individual pipeline steps.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// What was being attempted
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Raw IO error without path context.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Directory traversal failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid glob pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Widget descriptor could not be parsed.
    #[error("{}: {message}", .path.display())]
    Descriptor {
        /// Descriptor file
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    /// Typings template failed to render.
    #[error("template error: {0}")]
    Template(String),

    /// Development dependencies could not be satisfied.
    #[error("{0}")]
    Dependency(String),

    /// Installed dependency versions do not satisfy the declared ranges.
    #[error("version mismatch: {}", .0.join(", "))]
    DependencyMismatch(Vec<String>),

    /// External tool not found on PATH.
    #[error("{tool} not found: {source}")]
    ToolNotFound {
        /// Tool name
        tool: String,
        /// Lookup failure
        #[source]
        source: which::Error,
    },

    /// External command could not be spawned or awaited.
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Command line
        command: String,
        /// Underlying error
        error: std::io::Error,
    },

    /// External bundler exited unsuccessfully.
    #[error("{command} exited with {status}{}", format_stderr(.stderr))]
    BundlerFailed {
        /// Command line
        command: String,
        /// Exit status
        status: std::process::ExitStatus,
        /// Captured stderr lines
        stderr: Vec<String>,
    },

    /// Bundler reported success but produced nothing to package.
    #[error("bundler produced no output at {}", .0.display())]
    BundleMissing(PathBuf),

    /// Archive could not be written.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid project configuration.
    #[error("{0}")]
    Config(String),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

fn format_stderr(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("\n{}", lines.join("\n"))
    }
}

impl Error {
    /// Classifies this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Fs { .. }
            | Error::IoError(_)
            | Error::Walk(_)
            | Error::Pattern(_)
            | Error::Zip(_)
            | Error::GenericError(_) => ErrorKind::Filesystem,
            Error::Descriptor { .. } | Error::Template(_) => ErrorKind::Parse,
            Error::Dependency(_) | Error::DependencyMismatch(_) => ErrorKind::Dependency,
            Error::ToolNotFound { .. }
            | Error::CommandFailed { .. }
            | Error::BundlerFailed { .. }
            | Error::BundleMissing(_) => ErrorKind::Bundler,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn descriptor(path: &Path, message: impl Into<String>) -> Self {
        Error::Descriptor {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with what was being done and to which path.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Converts `Option`s and foreign errors into [`Error::GenericError`].
pub trait Context<T> {
    /// Adds a message on failure.
    fn context(self, message: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, message: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(message.to_string()))
    }
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, message: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{message}: {e}")))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_kind() {
        let err = std::fs::read("/definitely/not/here")
            .fs_context("reading descriptor", "/definitely/not/here")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert!(err.to_string().contains("reading descriptor /definitely/not/here"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let missing: Option<u8> = None;
        let err = missing.context("value required").unwrap_err();
        assert_eq!(err.to_string(), "value required");
    }

    #[test]
    fn descriptor_errors_are_parse_errors() {
        let err = Error::descriptor(Path::new("src/W.xml"), "missing attribute");
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.to_string(), "src/W.xml: missing attribute");
    }
}
