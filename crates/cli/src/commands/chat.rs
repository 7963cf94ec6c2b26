//! `metalagent chat`: interactive or single-message chat.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use metalagent_agent::{AgentLoop, ChatSession, Enricher, Recommendation, TurnOutcome, WELCOME_MESSAGE};
use metalagent_catalog::embed::embed_url;
use metalagent_config::{AppConfig, EmbedConfig};
use metalagent_core::event::EventBus;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{load_catalog, load_config};

pub async fn run(config_path: Option<&Path>, message: Option<String>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GOOGLE_API_KEY       (Gemini, the default provider)");
        eprintln!("    OPENAI_API_KEY       (with default_provider = \"openai\")");
        eprintln!("    METALAGENT_API_KEY   (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        bail!("No API key found. See above for setup instructions.");
    }

    let catalog = Arc::new(load_catalog(&config)?);
    let provider = metalagent_providers::build_from_config(&config)
        .default_provider()
        .with_context(|| format!("Unknown provider '{}'", config.default_provider))?;
    let tools = Arc::new(metalagent_tools::default_registry(Arc::clone(&catalog)));
    let agent = AgentLoop::from_config(&config, provider, tools, Arc::new(EventBus::default()));
    let enricher = Enricher::new(catalog, config.embed.clone());
    let mut session = ChatSession::new();

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let outcome = session.send(&agent, &enricher, &msg).await;
        eprint!("\r              \r");
        return match outcome {
            TurnOutcome::Reply {
                text,
                recommendations,
            } => {
                println!("{text}");
                print_players(&recommendations, &config.embed);
                Ok(())
            }
            TurnOutcome::Ended => Ok(()),
            TurnOutcome::Failed(e) => bail!(e),
        };
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          MetalAgent: Interactive Mode         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", agent.provider_name());
    println!("  Model:     {}", agent.model());
    println!("  Catalog:   {} releases", enricher.catalog().releases.len());
    println!();
    for line in WELCOME_MESSAGE.lines() {
        println!("  {line}");
    }
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt()?;
            continue;
        }

        eprint!("  ...");
        let outcome = session.send(&agent, &enricher, &line).await;
        eprint!("\r     \r");

        match outcome {
            TurnOutcome::Reply {
                text,
                recommendations,
            } => {
                println!();
                for line in text.lines() {
                    println!("  MetalAgent > {line}");
                }
                print_players(&recommendations, &config.embed);
                println!();
            }
            TurnOutcome::Ended => break,
            TurnOutcome::Failed(e) => {
                eprintln!("  [Error] {e}");
                println!();
            }
        }
        prompt()?;
    }

    println!();
    println!("  Goodbye! 🤘");
    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

fn print_players(recommendations: &[Recommendation], embed: &EmbedConfig) {
    for rec in recommendations {
        if let Some(id) = &rec.album_id {
            println!("  ▶ {} - {}: {}", rec.artist, rec.album, embed_url(id, embed));
        }
    }
}
