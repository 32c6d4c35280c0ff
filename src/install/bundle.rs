// ABOUTME: Local installer bundle that unpacks into the files to upload.
// ABOUTME: ZipBundle extracts a zip archive on the blocking pool.

use super::error::InstallError;
use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Source of the package files an install uploads.
#[async_trait]
pub trait Bundle: Send + Sync {
    /// Unpack and return the extracted files in archive order.
    async fn extract(&self) -> Result<Vec<PathBuf>, InstallError>;
}

/// A zip archive unpacked into `dest`.
#[derive(Debug, Clone)]
pub struct ZipBundle {
    archive: PathBuf,
    dest: PathBuf,
}

impl ZipBundle {
    pub fn new(archive: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            dest: dest.into(),
        }
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }
}

#[async_trait]
impl Bundle for ZipBundle {
    async fn extract(&self) -> Result<Vec<PathBuf>, InstallError> {
        let archive = self.archive.clone();
        let dest = self.dest.clone();

        tokio::task::spawn_blocking(move || unzip(&archive, &dest))
            .await
            .map_err(|e| InstallError::extraction(&self.archive, e))?
    }
}

fn unzip(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>, InstallError> {
    let fail = |e: &dyn std::fmt::Display| InstallError::extraction(archive, e);

    let file = fs::File::open(archive).map_err(|e| fail(&e))?;
    let mut zip = zip::ZipArchive::new(io::BufReader::new(file)).map_err(|e| fail(&e))?;

    // Stale files from an earlier run would be uploaded again.
    if dest.exists() {
        fs::remove_dir_all(dest).map_err(|e| fail(&e))?;
    }
    fs::create_dir_all(dest).map_err(|e| fail(&e))?;

    let mut extracted = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| fail(&e))?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("skipping unsafe archive entry {}", entry.name());
            continue;
        };
        let outpath = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| fail(&e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| fail(&e))?;
        }
        let mut outfile = fs::File::create(&outpath).map_err(|e| fail(&e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| fail(&e))?;

        tracing::debug!("extracted {}", outpath.display());
        extracted.push(outpath);
    }

    Ok(extracted)
}
