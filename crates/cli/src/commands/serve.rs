//! `metalagent serve`: start the HTTP gateway.

use std::path::Path;

use super::load_config;

pub async fn run(config_path: Option<&Path>, port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if !config.has_api_key() {
        tracing::warn!("No API key configured; chat requests will fail until one is set");
    }

    println!("🤘 MetalAgent Gateway");
    println!("   Open:     http://{}:{}/", config.gateway.host, config.gateway.port);
    println!("   Provider: {} ({})", config.default_provider, config.default_model);

    metalagent_gateway::start(config).await?;
    Ok(())
}
