//! `recommend_releases`: what came out recently in the given genres.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use metalagent_catalog::{CatalogContext, NO_RECENT_RELEASES, end_of_day};
use metalagent_core::error::ToolError;
use metalagent_core::tool::{Tool, ToolResult};
use tracing::debug;

pub struct RecommendReleasesTool {
    catalog: Arc<CatalogContext>,
    description: String,
    /// Fixed window end; the local time when unset.
    now: Option<NaiveDateTime>,
}

impl RecommendReleasesTool {
    pub fn new(catalog: Arc<CatalogContext>) -> Self {
        let description = format!(
            "Recommend releases from the last {} days in one or more genres. \
             Returns one release per line, or a message saying nothing matched.",
            catalog.settings.window_days
        );
        Self {
            catalog,
            description,
            now: None,
        }
    }

    /// Pin the end of the window to the last second of `today`.
    pub fn with_today(self, today: NaiveDate) -> Self {
        self.with_now(end_of_day(today))
    }

    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

#[async_trait]
impl Tool for RecommendReleasesTool {
    fn name(&self) -> &str {
        "recommend_releases"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "genres": {
                    "type": "string",
                    "description": "Comma-separated genres, each matched case-insensitively as a substring (e.g. \"black metal, doom\")"
                }
            },
            "required": ["genres"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let genres = arguments["genres"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'genres' argument".into()))?;

        let now = self.now();
        let output = self.catalog.recent(genres, now);
        debug!(
            genres,
            %now,
            matched = output != NO_RECENT_RELEASES,
            "Selected recent releases"
        );
        Ok(ToolResult::text(output))
    }
}
