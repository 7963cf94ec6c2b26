//! `metalagent init`: write a default config file.

use std::path::Path;

use anyhow::Context;
use metalagent_config::AppConfig;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    if path.exists() {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or delete it and re-run init.");
        return Ok(());
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(&path, AppConfig::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created config at: {}", path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set GOOGLE_API_KEY or add api_key to the config");
    println!("   2. Point catalog.data_dir at your release files");
    println!("   3. Run: metalagent chat\n");
    Ok(())
}
