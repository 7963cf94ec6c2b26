//! `get_menu`: subgenre menu plus the newest releases in one genre.

use std::sync::Arc;

use async_trait::async_trait;
use metalagent_catalog::CatalogContext;
use metalagent_core::error::ToolError;
use metalagent_core::tool::{Tool, ToolResult};
use tracing::debug;

pub struct GetMenuTool {
    catalog: Arc<CatalogContext>,
}

impl GetMenuTool {
    pub fn new(catalog: Arc<CatalogContext>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Tool for GetMenuTool {
    fn name(&self) -> &str {
        "get_menu"
    }

    fn description(&self) -> &str {
        "Get the menu of metal subgenres together with the most recent releases in a genre. \
         Use this to see which subgenres exist and what has come out lately."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "genre": {
                    "type": "string",
                    "description": "Genre to list releases for, matched case-insensitively as a substring (e.g. \"black metal\"). An empty string lists every genre."
                }
            },
            "required": ["genre"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let genre = arguments["genre"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'genre' argument".into()))?;

        let output = self.catalog.menu(genre);
        debug!(genre, bytes = output.len(), "Built genre menu");
        Ok(ToolResult::text(output))
    }
}
