//! Widget build pipeline.
//!
//! Settings describe one widget project; the steps in [`steps`] each read
//! them and touch a well-defined part of the filesystem; the
//! [`Pipeline`] runs those steps in order.
//!
//! # Example
//!
//! ```no_run
//! use widget_bundler::bundler::{PackageSettings, Pipeline, PipelineKind, SettingsBuilder};
//! use widget_bundler::cli::RuntimeConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SettingsBuilder::new()
//!     .project_root(".")
//!     .package_settings(PackageSettings {
//!         widget_name: "MyWidget".into(),
//!         version: "1.0.0".into(),
//!         description: None,
//!     })
//!     .build()?;
//!
//! let report = Pipeline::for_kind(&settings, PipelineKind::Build, RuntimeConfig::new(false, false))
//!     .run()
//!     .await?;
//! println!("Deployed {} files", report.deployed);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod settings;
pub mod steps;
pub mod typings;
pub mod utils;

pub use builder::{BuildReport, Pipeline, PipelineError, PipelineKind, Step};
pub use error::{Error, ErrorKind, Result};
pub use settings::{
    BuildMode, CommandSpec, DependencySettings, MismatchPolicy, PackageSettings, Settings,
    SettingsBuilder, ToolSettings,
};
