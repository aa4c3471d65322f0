//! Pipeline step identities and the error that names the failing step.

use crate::bundler::Error;
use std::fmt;

/// One unit of work in a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Remove stale output
    Clean,
    /// Generate `.d.ts` typings from the widget descriptor
    Typings,
    /// Verify and install development dependencies
    Dependencies,
    /// Run the external bundler
    Webpack,
    /// Create the `.mpk` archive
    Archive,
    /// Copy bundled assets into the host project
    Deploy,
}

impl Step {
    /// Every step in execution order.
    pub const ALL: [Step; 6] = [
        Step::Clean,
        Step::Typings,
        Step::Dependencies,
        Step::Webpack,
        Step::Archive,
        Step::Deploy,
    ];

    /// Short label used to prefix failures.
    pub fn label(&self) -> &'static str {
        match self {
            Step::Clean => "Clean",
            Step::Typings => "Typings",
            Step::Dependencies => "Dependencies",
            Step::Webpack => "Webpack",
            Step::Archive => "Archive",
            Step::Deploy => "Deploy",
        }
    }

    /// Section heading shown while the step runs.
    pub fn description(&self) -> &'static str {
        match self {
            Step::Clean => "Cleaning previous output",
            Step::Typings => "Generating typings",
            Step::Dependencies => "Checking dependencies",
            Step::Webpack => "Bundling",
            Step::Archive => "Creating archive",
            Step::Deploy => "Deploying to test project",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A step failure. Displays as `"{label}: {cause}"`.
#[derive(Debug, thiserror::Error)]
#[error("{step}: {source}")]
pub struct PipelineError {
    /// The step that failed
    pub step: Step,
    /// Why it failed
    pub source: Error,
}
