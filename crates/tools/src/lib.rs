//! Tools the agent can call against the release catalog.
//!
//! - `get_menu`: the subgenre menu plus the newest releases in a genre.
//! - `recommend_releases`: releases from the trailing window in any of a
//!   comma-separated list of genres.
//!
//! Both read a shared, immutable [`CatalogContext`].

pub mod get_menu;
pub mod recommend_releases;

use std::sync::Arc;

use metalagent_catalog::CatalogContext;
use metalagent_core::tool::ToolRegistry;

pub use get_menu::GetMenuTool;
pub use recommend_releases::RecommendReleasesTool;

/// A registry holding both catalog tools.
pub fn default_registry(catalog: Arc<CatalogContext>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(GetMenuTool::new(Arc::clone(&catalog))));
    registry.register(Box::new(RecommendReleasesTool::new(catalog)));
    registry
}
