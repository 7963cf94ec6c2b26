pub mod catalog;
pub mod chat;
pub mod doctor;
pub mod init;
pub mod serve;

use std::path::Path;

use anyhow::Context;
use metalagent_catalog::CatalogContext;
use metalagent_config::AppConfig;

pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    AppConfig::load(path).context("Failed to load config")
}

pub(crate) fn load_catalog(config: &AppConfig) -> anyhow::Result<CatalogContext> {
    CatalogContext::load(&config.catalog).with_context(|| {
        format!(
            "Failed to load catalog from {}",
            config.catalog.data_dir.display()
        )
    })
}
