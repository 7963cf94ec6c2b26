//! Catalog commands that run without the LLM: `menu`, `recent`, `lookup`,
//! and `parse`.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use metalagent_catalog::embed::embed_url;
use metalagent_catalog::{AlbumIdTable, album_embed, end_of_day, parse_recommendations};

use super::{load_catalog, load_config};

pub fn menu(config_path: Option<&Path>, genre: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(&config)?;
    print!("{}", catalog.menu(genre.unwrap_or_default()));
    Ok(())
}

pub fn recent(config_path: Option<&Path>, genres: &str, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(&config)?;
    let now = date
        .map(end_of_day)
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    println!("{}", catalog.recent(genres, now));
    Ok(())
}

pub fn lookup(config_path: Option<&Path>, artist: &str, album: &str) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let table = AlbumIdTable::load(&config.catalog.album_ids_path, &config.catalog.album_id_column)
        .context("Failed to load album id table")?;

    match table.lookup(artist, album) {
        Some(id) => {
            println!("Album ID: {id}");
            println!("Player:   {}", embed_url(id, &config.embed));
            println!("{}", album_embed(id, &config.embed));
        }
        None => println!("Album ID not found for {artist} - {album}"),
    }
    Ok(())
}

pub fn parse(config_path: Option<&Path>, file: Option<&Path>) -> anyhow::Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let config = load_config(config_path)?;
    let table = AlbumIdTable::load(&config.catalog.album_ids_path, &config.catalog.album_id_column)
        .context("Failed to load album id table")?;

    let lines = describe_pairs(&text, &table);
    if lines.is_empty() {
        println!("No recommendations found.");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// One `Artist - Album: <id | not found>` line per parsed recommendation.
fn describe_pairs(text: &str, table: &AlbumIdTable) -> Vec<String> {
    parse_recommendations(text)
        .into_iter()
        .map(|pair| {
            let id = table.lookup(&pair.artist, &pair.album).unwrap_or("not found");
            format!("{} - {}: {id}", pair.artist, pair.album)
        })
        .collect()
}
