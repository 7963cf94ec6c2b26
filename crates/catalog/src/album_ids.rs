//! (artist, album) → streaming album id reference table.
//!
//! Loaded once from a CSV with `artist_lower`, `album_lower`, and an id
//! column. Matching is exact on both names after lowercasing.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::error::CatalogError;

const ARTIST_COLUMN: &str = "artist_lower";
const ALBUM_COLUMN: &str = "album_lower";

#[derive(Debug, Clone, Default)]
pub struct AlbumIdTable {
    index: HashMap<(String, String), String>,
    rows: usize,
}

impl AlbumIdTable {
    /// Load the table from `path`, reading ids from `id_column`.
    pub fn load(path: &Path, id_column: &str) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(|e| CatalogError::io(path, e))?;
        let table = Self::from_reader(file, id_column).map_err(|e| match e {
            TableError::Csv(source) => CatalogError::AlbumTable {
                path: path.to_path_buf(),
                source,
            },
            TableError::MissingColumn(column) => CatalogError::MissingColumn {
                path: path.to_path_buf(),
                column,
            },
        })?;
        info!(
            path = %path.display(),
            rows = table.rows,
            albums = table.len(),
            "Loaded album id table"
        );
        Ok(table)
    }

    fn from_reader(reader: impl Read, id_column: &str) -> Result<Self, TableError> {
        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = csv.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))
        };
        let artist_idx = column(ARTIST_COLUMN)?;
        let album_idx = column(ALBUM_COLUMN)?;
        let id_idx = column(id_column)?;

        let mut table = Self::default();
        for (line, row) in csv.records().enumerate() {
            let row = row?;
            let (Some(artist), Some(album), Some(id)) =
                (row.get(artist_idx), row.get(album_idx), row.get(id_idx))
            else {
                warn!(row = line + 2, "Skipping short album table row");
                continue;
            };
            table.rows += 1;
            table
                .index
                .entry((artist.to_lowercase(), album.to_lowercase()))
                .or_insert_with(|| id.to_string());
        }
        Ok(table)
    }

    /// Build a table from in-memory rows; the first row for a pair wins.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let mut table = Self::default();
        for (artist, album, id) in rows {
            table.rows += 1;
            table
                .index
                .entry((artist.to_lowercase(), album.to_lowercase()))
                .or_insert_with(|| id.to_string());
        }
        table
    }

    /// The album id for a pair, case-insensitively. `None` when not listed.
    pub fn lookup(&self, artist: &str, album: &str) -> Option<&str> {
        self.index
            .get(&(artist.to_lowercase(), album.to_lowercase()))
            .map(String::as_str)
    }

    /// Distinct (artist, album) pairs.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[derive(Debug)]
enum TableError {
    Csv(csv::Error),
    MissingColumn(String),
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}
