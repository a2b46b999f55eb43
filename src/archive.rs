//! Archive codec used by the pipelines.
//!
//! - **Packing**: [`Archiver::pack`] writes a flat list of files into one archive
//! - **Unpacking**: [`Archiver::unpack`] extracts every entry into a directory
//! - **Hashing**: [`calculate_file_hash`] SHA-256 checksum of a produced archive
//!
//! The codec knows nothing about backups. [`ZipArchiver`] is the default; a
//! backup named `*.rar` is still written by whichever codec is configured.

use crate::error::{Error, Result};
use log::debug;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Packs files into one archive and unpacks archives into directories
pub trait Archiver: Send + Sync {
    /// Write `files` into a new archive at `destination`, each under its base name
    ///
    /// A failure may leave a partial archive at `destination`.
    fn pack(&self, files: &[PathBuf], destination: &Path) -> Result<()>;

    /// Extract every entry of `archive` into `destination`
    fn unpack(&self, archive: &Path, destination: &Path) -> Result<()>;
}

/// ZIP codec
#[derive(Debug, Clone, Copy)]
pub struct ZipArchiver {
    compression: CompressionMethod,
}

impl ZipArchiver {
    /// Deflate-compressed archives
    #[must_use]
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Store entries uncompressed
    #[must_use]
    pub fn stored() -> Self {
        Self {
            compression: CompressionMethod::Stored,
        }
    }
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Archiver for ZipArchiver {
    fn pack(&self, files: &[PathBuf], destination: &Path) -> Result<()> {
        let file = File::create(destination).map_err(|e| Error::FileWrite {
            path: destination.to_path_buf(),
            source: e,
        })?;

        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default()
            .compression_method(self.compression)
            .unix_permissions(0o644);

        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| {
                    Error::Archive(format!("'{}' has no file name", path.display()))
                })?;

            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::Archive(format!("Failed to add '{name}': {e}")))?;

            let mut source = File::open(path).map_err(|e| Error::FileRead {
                path: path.clone(),
                source: e,
            })?;

            std::io::copy(&mut source, &mut zip).map_err(|e| Error::FileRead {
                path: path.clone(),
                source: e,
            })?;
            debug!("Packed {name}");
        }

        zip.finish().map_err(|e| Error::Archive(e.to_string()))?;
        Ok(())
    }

    fn unpack(&self, archive: &Path, destination: &Path) -> Result<()> {
        let file = File::open(archive).map_err(|e| Error::FileRead {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let mut zip = ZipArchive::new(file)
            .map_err(|e| Error::Archive(format!("{}: {e}", archive.display())))?;

        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;

            let relative = entry.enclosed_name().ok_or_else(|| {
                Error::Archive(format!(
                    "Entry '{}' escapes the extraction directory",
                    entry.name()
                ))
            })?;
            let outpath = destination.join(relative);

            if entry.is_dir() {
                crate::error::create_dir(&outpath)?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                crate::error::create_dir(parent)?;
            }

            let mut outfile = File::create(&outpath).map_err(|e| Error::FileWrite {
                path: outpath.clone(),
                source: e,
            })?;

            std::io::copy(&mut entry, &mut outfile).map_err(|e| {
                Error::Archive(format!("Failed to extract '{}': {e}", outpath.display()))
            })?;
            debug!("Extracted {}", outpath.display());
        }

        Ok(())
    }
}

/// Calculate SHA-256 hash of a file, returning the hex digest and its size
pub fn calculate_file_hash(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut total_size = 0u64;

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        total_size += bytes_read as u64;
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = format!("{:x}", hasher.finalize());
    Ok((hash, total_size))
}

// =============================================================================
// Tests
// =============================================================================
