//! `metalagent doctor`: check config, API key, and data files.

use std::path::Path;

use metalagent_catalog::CatalogContext;
use metalagent_config::AppConfig;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    println!("🩺 MetalAgent Doctor");
    println!("====================\n");

    let mut issues = 0;

    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running other checks.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured for {}", config.default_provider);
    } else {
        println!("  ⚠️  No API key. Set GOOGLE_API_KEY or add api_key to the config");
        issues += 1;
    }

    let catalog = &config.catalog;
    let mut files_ok = true;
    for (label, path) in [
        ("Data directory", catalog.data_dir.clone()),
        ("Subgenre listing", catalog.subgenres_path()),
        ("Album id table", catalog.album_ids_path.clone()),
    ] {
        if path.exists() {
            println!("  ✅ {label}: {}", path.display());
        } else {
            println!("  ❌ {label} missing: {}", path.display());
            files_ok = false;
            issues += 1;
        }
    }

    if files_ok {
        match CatalogContext::load(catalog) {
            Ok(ctx) => println!(
                "  ✅ Catalog loads: {} releases, {} albums with ids",
                ctx.releases.len(),
                ctx.album_ids.len()
            ),
            Err(e) => {
                println!("  ❌ Catalog failed to load: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }
    Ok(())
}
