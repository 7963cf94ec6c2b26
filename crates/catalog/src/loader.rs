//! Catalog ingestion from the data directory.
//!
//! A release file is UTF-8 text made of blocks separated by a delimiter
//! line (40 dashes in the stock data). Each block is a run of
//! `Key: Value` lines and becomes one [`ReleaseRecord`].

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::record::ReleaseRecord;

/// Split one file's content into records, in block order.
///
/// Blank blocks are skipped; malformed ones still yield a (possibly
/// partial) record.
pub fn parse_release_file(content: &str, delimiter: &str) -> Vec<ReleaseRecord> {
    content
        .trim()
        .split(delimiter)
        .filter(|block| !block.trim().is_empty())
        .map(ReleaseRecord::from_block)
        .collect()
}

/// List the release files in `dir`: every `*.txt` except `subgenres_file`,
/// ordered by file name.
pub fn release_files(dir: &Path, subgenres_file: &str) -> Result<Vec<PathBuf>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CatalogError::io(dir, e))?.path();
        let is_txt = path.extension().is_some_and(|ext| ext == "txt");
        let is_subgenres = path.file_name().is_some_and(|name| name == subgenres_file);
        if is_txt && !is_subgenres && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every release file in `dir`, records in file-then-block order.
pub fn load_releases(
    dir: &Path,
    subgenres_file: &str,
    delimiter: &str,
) -> Result<Vec<ReleaseRecord>, CatalogError> {
    let files = release_files(dir, subgenres_file)?;
    if files.is_empty() {
        warn!(dir = %dir.display(), "No release files found; catalog is empty");
    }

    let mut releases = Vec::new();
    for path in &files {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let parsed = parse_release_file(&content, delimiter);
        debug!(file = %path.display(), records = parsed.len(), "Parsed release file");
        releases.extend(parsed);
    }
    Ok(releases)
}

/// Read the subgenre listing verbatim.
pub fn load_subgenres(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))
}
