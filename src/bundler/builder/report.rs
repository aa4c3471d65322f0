//! Summary of a completed pipeline run.

use crate::bundler::{
    BuildMode,
    steps::{ArchiveOutcome, BundleReport, DependencyReport},
};
use std::path::PathBuf;
use std::time::Duration;

/// What a pipeline run produced.
///
/// Fields stay `None` for steps that were not part of the run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Bundler mode the run used
    pub mode: BuildMode,
    /// Entries removed by the cleaner
    pub cleaned: usize,
    /// Generated typings file
    pub typings: Option<PathBuf>,
    /// Dependency check outcome
    pub dependencies: Option<DependencyReport>,
    /// Bundler output
    pub bundle: Option<BundleReport>,
    /// Archive copies and checksum
    pub archive: Option<ArchiveOutcome>,
    /// Files copied into the deployment folder
    pub deployed: usize,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl BuildReport {
    pub(crate) fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Archive paths, empty when no archive was produced.
    pub fn archive_paths(&self) -> &[PathBuf] {
        self.archive
            .as_ref()
            .map(|archive| archive.paths.as_slice())
            .unwrap_or_default()
    }
}
