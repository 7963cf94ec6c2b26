//! The release record and its block parser.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;

use crate::date::parse_release_date;

/// Rendered in place of a field the record does not carry.
pub const MISSING: &str = "N/A";

const KEY_VALUE_SEPARATOR: &str = ": ";

/// One release parsed from a catalog block.
///
/// The four fields the tools use are named; every other `Key: Value` line
/// (label, format, country, ...) is kept in `extra`.
#[derive(Debug, Clone, Default)]
pub struct ReleaseRecord {
    pub band: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// The date exactly as written in the file.
    pub release_date: Option<String>,
    pub extra: BTreeMap<String, String>,
    parsed_date: OnceLock<Option<NaiveDate>>,
}

impl ReleaseRecord {
    /// Parse one block of `Key: Value` lines.
    ///
    /// Lines without `": "` are skipped. The first `": "` splits key from
    /// value; both are trimmed. A repeated key keeps its last value.
    pub fn from_block(block: &str) -> Self {
        let mut record = Self::default();
        for line in block.trim().lines() {
            if let Some((key, value)) = line.split_once(KEY_VALUE_SEPARATOR) {
                record.set(key.trim(), value.trim());
            }
        }
        record
    }

    /// Set a field by its catalog key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "Band" => self.band = Some(value),
            "Album" => self.album = Some(value),
            "Genre" => self.genre = Some(value),
            "Release Date" => {
                self.release_date = Some(value);
                self.parsed_date = OnceLock::new();
            }
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Look a field up by its catalog key.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "Band" => self.band.as_deref(),
            "Album" => self.album.as_deref(),
            "Genre" => self.genre.as_deref(),
            "Release Date" => self.release_date.as_deref(),
            _ => self.extra.get(key).map(String::as_str),
        }
    }

    /// Number of fields present.
    pub fn field_count(&self) -> usize {
        [&self.band, &self.album, &self.genre, &self.release_date]
            .iter()
            .filter(|f| f.is_some())
            .count()
            + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Normalized release date, computed on first use.
    pub fn date(&self) -> Option<NaiveDate> {
        *self
            .parsed_date
            .get_or_init(|| self.release_date.as_deref().and_then(parse_release_date))
    }

    /// Case-insensitive substring match against the genre.
    ///
    /// `needle_lower` must already be lowercase. A record without a genre
    /// only matches the empty needle.
    pub fn genre_contains(&self, needle_lower: &str) -> bool {
        self.genre
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(needle_lower)
    }

    /// The listing line `- Band - Album [Genre] (Release Date)`.
    pub fn bullet(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReleaseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |v: &Option<String>| v.as_deref().unwrap_or(MISSING).to_owned();
        write!(
            f,
            "- {} - {} [{}] ({})",
            field(&self.band),
            field(&self.album),
            field(&self.genre),
            field(&self.release_date)
        )
    }
}
