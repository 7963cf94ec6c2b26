//! LLM provider implementations for MetalAgent.
//!
//! Every provider implements `metalagent_core::Provider`. The router picks
//! the configured default.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_from_config};
