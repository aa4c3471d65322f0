//! Shared helpers for pipeline steps.

pub mod fs;
