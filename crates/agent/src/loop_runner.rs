//! The agent reasoning loop.

use std::sync::Arc;
use std::time::Instant;

use metalagent_config::AppConfig;
use metalagent_core::event::{DomainEvent, EventBus};
use metalagent_core::message::{Conversation, Message, Role};
use metalagent_core::provider::{Provider, ProviderRequest};
use metalagent_core::tool::{ToolCall, ToolRegistry};
use tracing::{debug, info, warn};

use crate::prompt::SYSTEM_PROMPT;

/// Returned when the model keeps calling tools past the iteration cap.
pub const ITERATION_LIMIT_REPLY: &str =
    "I've reached the maximum number of tool call iterations. Please try rephrasing your request.";

/// Orchestrates LLM calls and tool execution for one conversation turn.
pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    system_prompt: String,
    /// Maximum LLM round trips per turn.
    max_iterations: u32,
    event_bus: Arc<EventBus>,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_iterations: 8,
            event_bus,
        }
    }

    /// An agent using the model settings from `config`.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let model = config
            .providers
            .get(&config.default_provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| config.default_model.clone());

        Self::new(provider, model, config.default_temperature, tools, event_bus)
            .with_max_tokens(config.default_max_tokens)
            .with_max_iterations(config.max_tool_iterations)
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Run the conversation until the model answers with text.
    ///
    /// Tool calls are executed in order and their results appended to the
    /// conversation. A failing tool is reported back to the model as an
    /// `Error: ...` tool result rather than aborting the turn. Provider
    /// errors abort the turn.
    pub async fn process(
        &self,
        conversation: &mut Conversation,
    ) -> Result<String, metalagent_core::Error> {
        info!(
            conversation_id = %conversation.id,
            messages = conversation.messages.len(),
            "Processing conversation"
        );

        let system = Message::system(&self.system_prompt);
        if conversation.messages.first().is_some_and(|m| m.role == Role::System) {
            conversation.messages[0] = system;
        } else {
            conversation.messages.insert(0, system);
        }

        let tool_definitions = self.tools.definitions();

        for iteration in 1..=self.max_iterations {
            debug!(conversation_id = %conversation.id, iteration, "Agent loop iteration");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    conversation_id: conversation.id.to_string(),
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: chrono::Utc::now(),
                });
            }

            if response.message.tool_calls.is_empty() {
                let text = response.message.content.clone();
                conversation.push(response.message);
                return Ok(text);
            }

            debug!(tool_count = response.message.tool_calls.len(), "Executing tool calls");
            let tool_calls = response.message.tool_calls.clone();
            conversation.push(response.message);

            for tc in &tool_calls {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                let start = Instant::now();
                let result = self.tools.execute(&call).await;
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                let (success, output) = match result {
                    Ok(r) => (r.success, r.output),
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "Tool execution failed");
                        (false, format!("Error: {e}"))
                    }
                };

                self.event_bus.publish(DomainEvent::ToolExecuted {
                    tool_name: tc.name.clone(),
                    success,
                    duration_ms,
                    timestamp: chrono::Utc::now(),
                });
                conversation.push(Message::tool_result(&tc.id, output));
            }
        }

        warn!(
            conversation_id = %conversation.id,
            max_iterations = self.max_iterations,
            "Max tool iterations reached"
        );
        conversation.push(Message::assistant(ITERATION_LIMIT_REPLY));
        Ok(ITERATION_LIMIT_REPLY.to_string())
    }
}
