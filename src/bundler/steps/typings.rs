//! Typings generation step.

use crate::bundler::{
    error::{ErrorExt, Result},
    settings::Settings,
    typings::{parse_descriptor, render_typings},
    utils::fs,
};
use std::path::PathBuf;

/// Reads `src/{widget}.xml` and writes `typings/{widget}Props.d.ts`.
///
/// A malformed descriptor fails the step and nothing is written.
pub async fn generate_typings(settings: &Settings) -> Result<PathBuf> {
    let descriptor_path = settings.descriptor_path();
    let xml = tokio::fs::read_to_string(&descriptor_path)
        .await
        .fs_context("reading widget descriptor", &descriptor_path)?;

    let descriptor = parse_descriptor(&xml, &descriptor_path)?;
    log::debug!(
        "Parsed {} top-level properties from {}",
        descriptor.properties.len(),
        descriptor_path.display()
    );

    let typings = render_typings(&descriptor, settings.widget_name())?;

    let typings_path = settings.typings_path();
    fs::write_file(&typings_path, typings.as_bytes()).await?;
    log::info!("Generated {}", typings_path.display());

    Ok(typings_path)
}
