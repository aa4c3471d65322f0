//! Pipeline steps, in the order the orchestrator runs them.

pub mod archive;
pub mod clean;
pub mod dependencies;
pub mod deploy;
pub mod typings;
pub mod webpack;

pub use archive::{ArchiveOutcome, create_archive};
pub use clean::{clean, clean_patterns};
pub use dependencies::{DependencyReport, check_dependencies};
pub use deploy::copy_to_deployment;
pub use typings::generate_typings;
pub use webpack::{BundleReport, format_size, run_webpack};
