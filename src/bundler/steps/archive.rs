//! `.mpk` archive creation.
//!
//! The archive is a plain ZIP of the bundler output tree. Entries are added
//! in sorted order with a fixed timestamp so an unchanged tree always
//! yields the same bytes.

use crate::bundler::{
    builder::checksum::verify_identical,
    error::{Error, ErrorExt, Result},
    settings::Settings,
    utils::fs,
};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

/// Where the archive ended up.
#[derive(Debug, Clone)]
pub struct ArchiveOutcome {
    /// Every written copy, versioned copy first
    pub paths: Vec<PathBuf>,
    /// SHA-256 shared by all copies
    pub checksum: String,
    /// Archive size in bytes
    pub size: u64,
    /// Number of entries, directories included
    pub entries: usize,
}

/// Zips `dist/tmp/widgets/**` into `dist/{version}/{widget}.mpk` and copies
/// it into the host project's widgets folder.
pub async fn create_archive(settings: &Settings) -> Result<ArchiveOutcome> {
    let source = settings.bundle_output_dir();
    if !source.is_dir() {
        return Err(Error::BundleMissing(source));
    }

    let [primary, copy] = settings.archive_paths();
    if let Some(parent) = primary.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }

    let entries = {
        let source = source.clone();
        let target = primary.clone();
        tokio::task::spawn_blocking(move || write_zip(&source, &target))
            .await
            .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))??
    };
    log::info!("Wrote {} ({} entries)", primary.display(), entries);

    fs::copy_file(&primary, &copy).await?;
    log::debug!("Copied archive to {}", copy.display());

    let paths = vec![primary, copy];
    let checksum = verify_identical(&paths).await?;
    let size = tokio::fs::metadata(&paths[0])
        .await
        .fs_context("reading metadata", &paths[0])?
        .len();

    Ok(ArchiveOutcome {
        paths,
        checksum,
        size,
        entries,
    })
}

/// Writes the ZIP synchronously; returns the number of entries written.
fn write_zip(source: &Path, target: &Path) -> Result<usize> {
    let file = std::fs::File::create(target).fs_context("creating archive", target)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let mut entries = 0;

    for entry in walkdir::WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let name = entry_name(&fs::relative_to(source, entry.path())?);

        if entry.file_type().is_dir() {
            zip.add_directory(name, entry_options(0o755))?;
        } else {
            zip.start_file(name, entry_options(0o644))?;
            let mut input =
                std::fs::File::open(entry.path()).fs_context("opening", entry.path())?;
            std::io::copy(&mut input, &mut zip).fs_context("compressing", entry.path())?;
        }
        entries += 1;
    }

    let mut writer = zip.finish()?;
    writer.flush().fs_context("flushing archive", target)?;
    Ok(entries)
}

fn entry_options(permissions: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(permissions)
}

/// ZIP entry names always use `/`.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
