//! External tool detection and availability checking.
//!
//! Resolves the bundler and package-manager executables, preferring the
//! project's own `node_modules/.bin` over the global PATH.

use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Installed Node.js version, if `node` is on PATH.
///
/// Cached result to avoid repeated subprocess calls across watch rebuilds.
pub static NODE_VERSION: LazyLock<Option<String>> = LazyLock::new(|| match which::which("node") {
    Ok(path) => match std::process::Command::new(&path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            log::debug!("Found node {} at {}", version, path.display());
            Some(version)
        }
        Ok(output) => {
            log::warn!(
                "node found at {} but --version failed (exit code: {:?})",
                path.display(),
                output.status.code()
            );
            None
        }
        Err(e) => {
            log::warn!("node found at {} but failed to execute: {}", path.display(), e);
            None
        }
    },
    Err(e) => {
        log::debug!("node not found in PATH: {}", e);
        None
    }
});

/// Resolves `command` to an executable path.
///
/// Commands containing a path separator are taken relative to
/// `project_root`; bare names are searched in `node_modules/.bin` first and
/// then on PATH.
pub fn resolve_tool(command: &str, project_root: &Path) -> Result<PathBuf> {
    if command.contains('/') || command.contains('\\') {
        let path = project_root.join(command);
        log::debug!("Using {} for {}", path.display(), command);
        return Ok(path);
    }

    if let Some(local) = local_bin(project_root, command) {
        log::debug!("Found project-local {} at {}", command, local.display());
        return Ok(local);
    }

    match which::which(command) {
        Ok(path) => {
            log::debug!("Found {} at: {}", command, path.display());
            Ok(path)
        }
        Err(source) => Err(Error::ToolNotFound {
            tool: command.to_string(),
            source,
        }),
    }
}

/// Returns `node_modules/.bin/{name}` when the project has it installed.
pub fn local_bin(project_root: &Path, name: &str) -> Option<PathBuf> {
    let bin_dir = project_root.join("node_modules").join(".bin");
    let candidates = if cfg!(windows) {
        vec![format!("{name}.cmd"), format!("{name}.exe")]
    } else {
        vec![name.to_string()]
    };

    candidates
        .into_iter()
        .map(|candidate| bin_dir.join(candidate))
        .find(|path| path.is_file())
}
