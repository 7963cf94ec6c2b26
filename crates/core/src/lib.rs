//! # MetalAgent Core
//!
//! Domain types and traits shared by every MetalAgent crate: chat messages,
//! the LLM provider abstraction, the tool abstraction the agent calls into,
//! domain events, and the error hierarchy.
//!
//! Implementations live elsewhere (`metalagent-providers`,
//! `metalagent-tools`, `metalagent-agent`); all of them depend inward on
//! this crate.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Conversation, ConversationId, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
