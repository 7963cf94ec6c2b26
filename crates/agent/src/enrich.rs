//! Reply post-processing: parse recommendations, look up album ids, and
//! render player embeds.

use std::sync::Arc;

use metalagent_catalog::{CatalogContext, album_embed, parse_recommendations};
use metalagent_config::EmbedConfig;
use serde::Serialize;
use tracing::debug;

/// A recommended album, with its player embed when the album is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub artist: String,
    pub album: String,
    pub album_id: Option<String>,
    pub embed: Option<String>,
}

impl Recommendation {
    pub fn is_playable(&self) -> bool {
        self.embed.is_some()
    }
}

pub struct Enricher {
    catalog: Arc<CatalogContext>,
    embed: EmbedConfig,
}

impl Enricher {
    pub fn new(catalog: Arc<CatalogContext>, embed: EmbedConfig) -> Self {
        Self { catalog, embed }
    }

    pub fn catalog(&self) -> &Arc<CatalogContext> {
        &self.catalog
    }

    /// Every recommendation in `reply`, in order. Lookup misses keep the
    /// pair with no id or embed.
    pub fn enrich(&self, reply: &str) -> Vec<Recommendation> {
        let recommendations: Vec<Recommendation> = parse_recommendations(reply)
            .into_iter()
            .map(|pair| {
                let album_id = self
                    .catalog
                    .album_ids
                    .lookup(&pair.artist, &pair.album)
                    .map(str::to_string);
                let embed = album_id.as_deref().map(|id| album_embed(id, &self.embed));
                Recommendation {
                    artist: pair.artist,
                    album: pair.album,
                    album_id,
                    embed,
                }
            })
            .collect();

        debug!(
            parsed = recommendations.len(),
            matched = recommendations.iter().filter(|r| r.is_playable()).count(),
            "Enriched reply"
        );
        recommendations
    }
}
