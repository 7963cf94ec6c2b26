//! The loaded catalog data, built once and shared read-only.

use chrono::NaiveDateTime;
use metalagent_config::CatalogConfig;
use tracing::info;

use crate::album_ids::AlbumIdTable;
use crate::error::CatalogError;
use crate::listing::{menu_listing, recent_listing};
use crate::loader::{load_releases, load_subgenres};
use crate::record::ReleaseRecord;

/// Releases, the subgenre menu, and the album-id table, plus the limits the
/// tools apply to them.
///
/// Nothing mutates a context after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CatalogContext {
    pub releases: Vec<ReleaseRecord>,
    pub subgenres: String,
    pub album_ids: AlbumIdTable,
    pub settings: CatalogConfig,
}

impl CatalogContext {
    /// Load everything `config` points at. Any missing file is fatal.
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let subgenres = load_subgenres(&config.subgenres_path())?;
        let releases = load_releases(&config.data_dir, &config.subgenres_file, &config.delimiter)?;
        let album_ids = AlbumIdTable::load(&config.album_ids_path, &config.album_id_column)?;

        info!(
            releases = releases.len(),
            dated = releases.iter().filter(|r| r.date().is_some()).count(),
            albums = album_ids.len(),
            "Catalog loaded"
        );

        Ok(Self {
            releases,
            subgenres,
            album_ids,
            settings: config.clone(),
        })
    }

    /// Assemble a context from parts already in memory.
    pub fn from_parts(
        releases: Vec<ReleaseRecord>,
        subgenres: impl Into<String>,
        album_ids: AlbumIdTable,
        settings: CatalogConfig,
    ) -> Self {
        Self {
            releases,
            subgenres: subgenres.into(),
            album_ids,
            settings,
        }
    }

    /// Genre menu text: the subgenre listing followed by the newest releases
    /// in `genre` (all genres when blank).
    pub fn menu(&self, genre: &str) -> String {
        let listing = menu_listing(
            &self.releases,
            Some(genre),
            self.settings.menu_limit,
            self.settings.listing_order,
        );
        format!(
            "\nGENRE MENU:\n{}\n\nRecent Releases in {} (Limited to {} entries to fit model constraints):\n{}\n",
            self.subgenres, genre, self.settings.menu_limit, listing
        )
    }

    /// Releases from the trailing window ending at `now`, or the
    /// no-results sentinel.
    pub fn recent(&self, genres: &str, now: NaiveDateTime) -> String {
        recent_listing(
            &self.releases,
            genres,
            now,
            self.settings.window_days,
            self.settings.recent_limit,
        )
    }
}
