//! End-to-end tests: on-disk catalog → tools → agent loop → enrichment.
//!
//! The LLM is replaced by a scripted provider that issues the same tool
//! calls a real model would, so every other layer runs for real.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use metalagent_agent::{AgentLoop, ChatSession, Enricher, TranscriptEntry, TurnOutcome};
use metalagent_catalog::{CatalogContext, NO_RECENT_RELEASES};
use metalagent_config::AppConfig;
use metalagent_core::error::ProviderError;
use metalagent_core::event::EventBus;
use metalagent_core::message::{Message, MessageToolCall, Role};
use metalagent_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use metalagent_core::tool::ToolRegistry;
use metalagent_tools::{GetMenuTool, RecommendReleasesTool};

// ── Scripted provider ────────────────────────────────────────────────────

struct ScriptedProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(mut responses: Vec<ProviderResponse>) -> Self {
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 500,
                message: "script exhausted".into(),
            })
    }
}

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock".into(),
    }
}

fn tool_response(name: &str, args: serde_json::Value) -> ProviderResponse {
    let mut message = Message::assistant("");
    message.tool_calls.push(MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: args.to_string(),
    });
    ProviderResponse {
        message,
        usage: None,
        model: "mock".into(),
    }
}

// ── Fixture catalog ──────────────────────────────────────────────────────

const DELIM: &str = "----------------------------------------";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()
}

fn write_catalog(dir: &Path) -> AppConfig {
    let data = dir.join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("subgenres.txt"),
        "Atmospheric Black Metal\nBlack Metal\nDoom Metal\nDeath Metal",
    )
    .unwrap();
    std::fs::write(
        data.join("2024-09.txt"),
        format!(
            "Band: Pallbearer\nAlbum: Mind Burns Alive\nGenre: Doom Metal\nRelease Date: May 17th, 2024\n{DELIM}\n\
             Band: Panopticon\nAlbum: The Rime of Memory\nGenre: Atmospheric Black Metal\nRelease Date: September 20th, 2024\n{DELIM}\n"
        ),
    )
    .unwrap();
    std::fs::write(
        data.join("2024-10.txt"),
        format!(
            "Band: Mgła\nAlbum: Age of Excuse\nGenre: Black Metal\nRelease Date: October 2nd, 2024\n{DELIM}\n\
             malformed line without separator\n{DELIM}\n\
             Band: Blood Incantation\nAlbum: Absolute Elsewhere\nGenre: Death Metal\nRelease Date: TBA\n{DELIM}\n"
        ),
    )
    .unwrap();
    std::fs::write(
        dir.join("albums.csv"),
        "Artist,Album,artist_lower,album_lower,Spotify Album ID\n\
         Mgła,Age of Excuse,mgła,age of excuse,2Mg1aExcuse\n\
         Panopticon,The Rime of Memory,panopticon,the rime of memory,3PanRime\n",
    )
    .unwrap();

    let toml = format!(
        "default_model = \"test-model\"\n\n[catalog]\ndata_dir = {:?}\nalbum_ids_path = {:?}\n",
        data.display().to_string(),
        dir.join("albums.csv").display().to_string(),
    );
    let config_path = dir.join("config.toml");
    std::fs::write(&config_path, toml).unwrap();
    AppConfig::load_from(&config_path).unwrap()
}

fn registry(catalog: &Arc<CatalogContext>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(GetMenuTool::new(Arc::clone(catalog))));
    registry.register(Box::new(
        RecommendReleasesTool::new(Arc::clone(catalog)).with_today(today()),
    ));
    registry
}

fn agent(config: &AppConfig, provider: Arc<ScriptedProvider>, catalog: &Arc<CatalogContext>) -> AgentLoop {
    AgentLoop::from_config(
        config,
        provider,
        Arc::new(registry(catalog)),
        Arc::new(EventBus::default()),
    )
}

// ── Tests ────────────────────────────────────────────────────────────────

#[test]
fn e2e_catalog_loads_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_catalog(dir.path());
    assert_eq!(config.default_model, "test-model");

    let catalog = CatalogContext::load(&config.catalog).unwrap();
    // Four well-formed blocks plus one block with no usable keys.
    assert_eq!(catalog.releases.len(), 5);
    assert!(catalog.subgenres.starts_with("Atmospheric Black Metal"));
    assert_eq!(catalog.album_ids.lookup("MGŁA", "AGE OF EXCUSE"), Some("2Mg1aExcuse"));
}

#[tokio::test]
async fn e2e_recommendation_turn_with_tools_and_embeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_catalog(dir.path());
    let catalog = Arc::new(CatalogContext::load(&config.catalog).unwrap());

    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response("get_menu", serde_json::json!({"genre": "black metal"})),
        tool_response("recommend_releases", serde_json::json!({"genres": "black metal, doom"})),
        text_response(
            "Here are some recent black metal releases:\n\
             - Mgła - Age of Excuse [Black Metal] (October 2, 2024)\n\
             - Panopticon - The Rime of Memory [Atmospheric Black Metal] (September 20, 2024)\n\
             - Made Up Band - Imaginary Album [Black Metal] (October 1, 2024)\n\
             Enjoy!",
        ),
    ]));
    let agent = agent(&config, Arc::clone(&provider), &catalog);
    let enricher = Enricher::new(Arc::clone(&catalog), config.embed.clone());
    let mut session = ChatSession::new();

    let outcome = session
        .send(&agent, &enricher, "give me a list of recent black metal releases")
        .await;
    let recommendations = match outcome {
        TurnOutcome::Reply { recommendations, .. } => recommendations,
        other => panic!("expected a reply, got {other:?}"),
    };

    // Three parsed, two with ids.
    assert_eq!(recommendations.len(), 3);
    assert_eq!(recommendations[0].album_id.as_deref(), Some("2Mg1aExcuse"));
    assert_eq!(recommendations[1].album_id.as_deref(), Some("3PanRime"));
    assert!(recommendations[2].embed.is_none());
    assert!(
        recommendations[0]
            .embed
            .as_deref()
            .unwrap()
            .contains("https://open.spotify.com/embed/album/2Mg1aExcuse")
    );

    // The model saw both tool outputs.
    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].model, "test-model");
    let menu = &requests[1].messages.last().unwrap().content;
    assert!(menu.contains("GENRE MENU:\nAtmospheric Black Metal"));
    assert!(menu.contains("- Mgła - Age of Excuse [Black Metal] (October 2nd, 2024)"));
    assert!(!menu.contains("Pallbearer"));
    let recent = &requests[2].messages.last().unwrap().content;
    assert_eq!(
        recent,
        "- Panopticon - The Rime of Memory [Atmospheric Black Metal] (September 20th, 2024)\n\
         - Mgła - Age of Excuse [Black Metal] (October 2nd, 2024)"
    );

    // Two embeds in the transcript, none in the LLM conversation.
    let embeds = session
        .transcript()
        .iter()
        .filter(|e| matches!(e, TranscriptEntry::Embed { .. }))
        .count();
    assert_eq!(embeds, 2);
    assert!(
        session
            .conversation()
            .messages
            .iter()
            .all(|m| !m.content.contains("<iframe"))
    );
}

#[tokio::test]
async fn e2e_no_recent_releases_and_quit() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_catalog(dir.path());
    let catalog = Arc::new(CatalogContext::load(&config.catalog).unwrap());

    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response("recommend_releases", serde_json::json!({"genres": "polka"})),
        text_response("I couldn't find any recent polka metal. Try another genre?"),
    ]));
    let agent = agent(&config, Arc::clone(&provider), &catalog);
    let enricher = Enricher::new(Arc::clone(&catalog), config.embed.clone());
    let mut session = ChatSession::new();

    let outcome = session.send(&agent, &enricher, "recent polka metal").await;
    assert!(matches!(
        outcome,
        TurnOutcome::Reply { ref recommendations, .. } if recommendations.is_empty()
    ));
    let requests = provider.requests();
    let tool_output = requests[1].messages.last().unwrap();
    assert_eq!(tool_output.role, Role::Tool);
    assert_eq!(tool_output.content, NO_RECENT_RELEASES);

    assert_eq!(session.send(&agent, &enricher, "  Goodbye ").await, TurnOutcome::Ended);
    assert!(session.is_finished());
    assert_eq!(provider.requests().len(), 2);
}

#[tokio::test]
async fn e2e_bad_tool_arguments_recover() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_catalog(dir.path());
    let catalog = Arc::new(CatalogContext::load(&config.catalog).unwrap());

    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response("recommend_releases", serde_json::json!({"genre": "doom"})),
        tool_response("recommend_releases", serde_json::json!({"genres": "doom"})),
        text_response("Nothing new in doom this month."),
    ]));
    let agent = agent(&config, Arc::clone(&provider), &catalog);
    let enricher = Enricher::new(catalog, config.embed.clone());
    let mut session = ChatSession::new();

    let outcome = session.send(&agent, &enricher, "doom?").await;
    assert!(matches!(outcome, TurnOutcome::Reply { .. }));

    let requests = provider.requests();
    let first_tool = &requests[1].messages.last().unwrap().content;
    assert!(first_tool.starts_with("Error: Invalid tool arguments"));
    let second_tool = &requests[2].messages.last().unwrap().content;
    assert_eq!(second_tool, NO_RECENT_RELEASES);
}

#[test]
fn e2e_missing_data_is_a_startup_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_catalog(dir.path());
    config.catalog.data_dir = dir.path().join("nowhere");
    assert!(CatalogContext::load(&config.catalog).is_err());
}
