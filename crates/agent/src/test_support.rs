//! Shared helpers for agent tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use metalagent_catalog::{AlbumIdTable, CatalogContext, ReleaseRecord};
use metalagent_config::CatalogConfig;
use metalagent_core::error::ProviderError;
use metalagent_core::message::{Message, MessageToolCall};
use metalagent_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

/// Replays scripted responses in order and records every request.
pub struct ScriptedProvider {
    script: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(mut script: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        script.reverse();
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(texts.into_iter().map(|t| text_response(t.as_ref())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.script.lock().unwrap().pop().unwrap_or_else(|| {
            Err(ProviderError::ApiError {
                status_code: 500,
                message: "script exhausted".into(),
            })
        })
    }
}

pub fn failing_provider() -> ScriptedProvider {
    ScriptedProvider::with_results(vec![Err(ProviderError::RateLimited {
        retry_after_secs: 5,
    })])
}

pub fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// A response calling `name` once, with call id `call_{name}`.
pub fn tool_call_response(name: &str, arguments: &str) -> ProviderResponse {
    let mut message = Message::assistant("");
    message.tool_calls.push(MessageToolCall {
        id: format!("call_{name}"),
        name: name.into(),
        arguments: arguments.into(),
    });
    ProviderResponse {
        message,
        usage: None,
        model: "mock-model".into(),
    }
}

fn record(band: &str, album: &str, genre: &str, date: &str) -> ReleaseRecord {
    let mut r = ReleaseRecord::default();
    r.set("Band", band);
    r.set("Album", album);
    r.set("Genre", genre);
    r.set("Release Date", date);
    r
}

/// A small catalog; Mgła's album has an id, the rest do not.
pub fn catalog() -> Arc<CatalogContext> {
    Arc::new(CatalogContext::from_parts(
        vec![
            record("Mgła", "Age of Excuse", "Black Metal", "October 2nd, 2024"),
            record("Pallbearer", "Mind Burns Alive", "Doom Metal", "May 17th, 2024"),
        ],
        "Black Metal\nDoom Metal",
        AlbumIdTable::from_rows([("mgła", "age of excuse", "mgla123")]),
        CatalogConfig::default(),
    ))
}
