//! Archive checksum calculation.
//!
//! The archive is written once and copied to a second destination; hashing
//! both copies confirms they are byte-identical.

use crate::{
    bail,
    bundler::{Result, error::ErrorExt},
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Calculates the hex-encoded SHA-256 of a file, reading in 8KB chunks.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hashes every path and fails unless all digests agree.
///
/// Returns the shared digest.
pub async fn verify_identical(paths: &[PathBuf]) -> Result<String> {
    let Some((first, rest)) = paths.split_first() else {
        bail!("no archive copies to verify");
    };

    let expected = calculate_sha256(first).await?;
    for path in rest {
        let actual = calculate_sha256(path).await?;
        if actual != expected {
            bail!(
                "archive copies differ: {} ({}) vs {} ({})",
                first.display(),
                expected,
                path.display(),
                actual
            );
        }
    }

    Ok(expected)
}
