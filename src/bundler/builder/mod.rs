//! Pipeline orchestration and the helpers steps share.
//!
//! - [`orchestrator`] - [`Pipeline`] and the `build`/`release` kinds
//! - [`step`] - step identities and [`PipelineError`]
//! - [`report`] - [`BuildReport`]
//! - [`checksum`] - SHA-256 of archive copies
//! - [`tool_detection`] - locating node tooling

pub mod checksum;
mod orchestrator;
mod report;
mod step;
pub mod tool_detection;

pub use orchestrator::{Pipeline, PipelineKind};
pub use report::BuildReport;
pub use step::{PipelineError, Step};
