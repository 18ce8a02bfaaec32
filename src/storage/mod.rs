//! Content-addressed document storage
//!
//! This module handles persisting downloaded reports, including:
//! - SHA-256 content hashing
//! - Deterministic file layout `<out_dir>/<brand>/<hash prefix>.pdf`
//! - The [`Downloader`] that probes, fetches and writes documents
//!
//! Identical bytes fetched from different URLs map to the same file.

mod downloader;

pub use downloader::Downloader;

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::crawler::FetchError;

/// Hex characters of the content hash used in file names
pub const FILE_HASH_PREFIX_LEN: usize = 16;

/// Errors that can occur while downloading one document
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid document URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Not a PDF: {url} (content type {content_type})")]
    NotPdf { url: String, content_type: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for download operations
pub type DownloadResult<T> = Result<T, DownloadError>;

/// A document saved to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    /// URL the bytes were fetched from
    pub url: String,

    /// Where the bytes were written
    pub file_path: PathBuf,

    /// Length of the body in bytes
    pub byte_size: usize,

    /// Full lowercase hex SHA-256 of the body
    pub content_hash: String,

    /// Text carried over from the document reference
    pub associated_text: String,
}

/// Computes the lowercase hex SHA-256 of a body
///
/// ```
/// use pcf_harvester::storage::content_hash;
///
/// assert_eq!(
///     content_hash(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Directory name for a brand
///
/// Lower-cased, with path separators replaced and leading dots dropped, so
/// the result is always a single component below the output directory.
///
/// ```
/// use pcf_harvester::storage::brand_dir_name;
///
/// assert_eq!(brand_dir_name("Dell"), "dell");
/// assert_eq!(brand_dir_name("../x"), "_x");
/// ```
pub fn brand_dir_name(brand: &str) -> String {
    let name: String = brand
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let name = name.trim_start_matches('.');
    if name.is_empty() {
        "unknown".to_string()
    } else {
        name.to_string()
    }
}

/// Directory holding one brand's documents
pub fn brand_dir(out_dir: &Path, brand: &str) -> PathBuf {
    out_dir.join(brand_dir_name(brand))
}

/// Storage path for a document with the given content hash
pub fn artifact_path(out_dir: &Path, brand: &str, content_hash: &str) -> PathBuf {
    let prefix = &content_hash[..content_hash.len().min(FILE_HASH_PREFIX_LEN)];
    brand_dir(out_dir, brand).join(format!("{}.pdf", prefix))
}
