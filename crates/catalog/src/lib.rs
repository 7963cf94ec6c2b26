//! Release catalog for MetalAgent.
//!
//! Everything here is plain synchronous data munging over small in-memory
//! lists:
//!
//! - [`loader`] reads delimited `Key: Value` release files into
//!   [`ReleaseRecord`]s.
//! - [`date`] normalizes "March 3rd, 1986"-style dates.
//! - [`listing`] selects and renders releases for the two agent tools.
//! - [`recommendation`] pulls (artist, album) pairs back out of the
//!   model's bullet-list reply.
//! - [`album_ids`] maps those pairs to streaming album ids, and [`embed`]
//!   renders the player markup.
//!
//! [`CatalogContext`] bundles the loaded data; it is built once at start-up
//! and shared read-only.

pub mod album_ids;
pub mod context;
pub mod date;
pub mod embed;
pub mod error;
pub mod listing;
pub mod loader;
pub mod recommendation;
pub mod record;

pub use album_ids::AlbumIdTable;
pub use context::CatalogContext;
pub use date::parse_release_date;
pub use embed::album_embed;
pub use error::CatalogError;
pub use listing::{NO_RECENT_RELEASES, end_of_day, menu_listing, recent_listing, render_listing};
pub use recommendation::{RecommendationPair, parse_recommendations};
pub use record::{MISSING, ReleaseRecord};
