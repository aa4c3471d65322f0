//! Removal of generated and staged output.

use crate::bundler::{
    error::{ErrorExt, Result},
    settings::Settings,
    utils::fs,
};
use std::path::Path;

/// Glob patterns removed before every build.
///
/// Directory parts are escaped, so only the trailing `*` is a wildcard.
pub fn clean_patterns(settings: &Settings) -> Vec<String> {
    let dist = settings.dist_dir();
    let contents_of = |dir: &Path| format!("{}/*", escape(dir));

    vec![
        contents_of(&settings.versioned_dist_dir()),
        contents_of(&settings.tmp_dir()),
        contents_of(&dist.join("tsc")),
        contents_of(&dist.join("testresults")),
        contents_of(&settings.deployment_widgets_dir()),
        format!(
            "{}/{}",
            escape(&settings.widgets_folder()),
            glob::Pattern::escape(&settings.archive_name())
        ),
    ]
}

fn escape(path: &Path) -> String {
    glob::Pattern::escape(&path.to_string_lossy())
}

/// Deletes everything matched by [`clean_patterns`].
///
/// Paths that do not exist are skipped; any other filesystem error aborts.
/// Returns the number of entries removed.
pub async fn clean(settings: &Settings) -> Result<usize> {
    let mut removed = 0;

    for pattern in clean_patterns(settings) {
        log::debug!("Cleaning {}", pattern);
        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(std::io::Error::from(e)).fs_context("reading", path);
                }
            };
            if fs::remove_path(&path).await? {
                log::debug!("Removed {}", path.display());
                removed += 1;
            }
        }
    }

    log::info!("Removed {} stale entries", removed);
    Ok(removed)
}
