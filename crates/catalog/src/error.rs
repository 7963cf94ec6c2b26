//! Start-up failures for catalog data.
//!
//! These are fatal: the process reports them and stops before serving any
//! request. Per-record problems (bad lines, bad dates, short CSV rows) are
//! degraded in place and never become a `CatalogError`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Required file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Data directory not found: {}", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse album table {}: {source}", path.display())]
    AlbumTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Album table {} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

impl CatalogError {
    /// Map an I/O error on `path`, turning "not found" into [`CatalogError::MissingFile`].
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile { path }
        } else {
            Self::Read { path, source }
        }
    }
}
