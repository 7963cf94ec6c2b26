//! HTTP gateway for MetalAgent.
//!
//! Serves the chat UI and a small JSON API:
//!
//! - `GET  /health`
//! - `POST /api/session` creates a chat session
//! - `GET  /api/session/{id}` returns its transcript
//! - `POST /api/chat` sends one message
//!
//! Built on Axum. Each session sits behind its own mutex, so users only
//! ever wait on their own turns.

pub mod frontend;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, info};

use metalagent_agent::{
    AgentLoop, ChatSession, Enricher, Recommendation, TranscriptEntry, TurnOutcome, WELCOME_MESSAGE,
};
use metalagent_catalog::{CatalogContext, CatalogError};
use metalagent_config::AppConfig;
use metalagent_core::event::EventBus;

/// Request bodies above this are rejected.
pub const BODY_LIMIT: usize = 64 * 1024;

/// Reply text sent when the user quits.
pub const FAREWELL: &str = "Goodbye! Stay heavy.";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("No provider configured: {0}")]
    NoProvider(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct GatewayState {
    pub agent: Arc<AgentLoop>,
    pub enricher: Arc<Enricher>,
    sessions: RwLock<HashMap<String, Arc<Mutex<ChatSession>>>>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(agent: Arc<AgentLoop>, enricher: Arc<Enricher>) -> Self {
        Self {
            agent,
            enricher,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    async fn create_session(&self) -> String {
        let session = ChatSession::new();
        let id = session.id().to_string();
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    async fn session(&self, id: &str) -> Option<Arc<Mutex<ChatSession>>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Build the router with every route and layer.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            is_local_origin(origin.as_bytes())
        }))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/session", post(create_session_handler))
        .route("/api/session/{id}", get(transcript_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn is_local_origin(origin: &[u8]) -> bool {
    ["http://localhost", "http://127.0.0.1"].iter().any(|prefix| {
        origin
            .strip_prefix(prefix.as_bytes())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(b":"))
    })
}

/// Load the catalog, build the agent, and serve until shut down.
pub async fn start(config: AppConfig) -> Result<(), GatewayError> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let catalog = Arc::new(CatalogContext::load(&config.catalog)?);
    let provider = metalagent_providers::build_from_config(&config)
        .default_provider()
        .ok_or_else(|| GatewayError::NoProvider(config.default_provider.clone()))?;
    let tools = Arc::new(metalagent_tools::default_registry(Arc::clone(&catalog)));
    let agent = Arc::new(AgentLoop::from_config(
        &config,
        provider,
        tools,
        Arc::new(EventBus::default()),
    ));
    let enricher = Arc::new(Enricher::new(catalog, config.embed.clone()));

    let app = build_router(Arc::new(GatewayState::new(agent, enricher)));

    info!(%addr, "MetalAgent gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sessions: usize,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.session_count().await,
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub welcome: String,
}

async fn create_session_handler(State(state): State<SharedState>) -> Json<SessionCreated> {
    let session_id = state.create_session().await;
    debug!(session = %session_id, "Session created");
    Json(SessionCreated {
        session_id,
        welcome: WELCOME_MESSAGE.to_string(),
    })
}

#[derive(Serialize)]
struct TranscriptResponse {
    session_id: String,
    finished: bool,
    transcript: Vec<TranscriptEntry>,
}

async fn transcript_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let session = state.session(&id).await.ok_or_else(|| ApiError::unknown_session(&id))?;
    let session = session.lock().await;
    Ok(Json(TranscriptResponse {
        session_id: id,
        finished: session.is_finished(),
        transcript: session.transcript().to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub recommendations: Vec<Recommendation>,
    pub finished: bool,
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Message must not be empty"));
    }
    let session = state
        .session(&body.session_id)
        .await
        .ok_or_else(|| ApiError::unknown_session(&body.session_id))?;

    let mut session = session.lock().await;
    let outcome = session
        .send(&state.agent, &state.enricher, &body.message)
        .await;

    let (reply, recommendations) = match outcome {
        TurnOutcome::Reply {
            text,
            recommendations,
        } => (text, recommendations),
        TurnOutcome::Ended => (FAREWELL.to_string(), Vec::new()),
        TurnOutcome::Failed(message) => {
            return Err(ApiError::new(StatusCode::BAD_GATEWAY, message));
        }
    };

    Ok(Json(ChatResponse {
        session_id: body.session_id,
        reply,
        recommendations,
        finished: session.is_finished(),
    }))
}

// --- Errors ---

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn unknown_session(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("Unknown session: {id}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}
