//! Configuration structures for pipeline runs.
//!
//! [`Settings`] is the single configuration value every step receives. It is
//! built once from `package.json` (see [`crate::metadata`]) and never mutated.

mod builder;
mod bundle;
mod core;
mod mode;
mod package;

// Re-export all public types
pub use builder::SettingsBuilder;
pub use bundle::{CommandSpec, DependencySettings, MismatchPolicy, ToolSettings};
pub use core::Settings;
pub use mode::BuildMode;
pub use package::PackageSettings;
