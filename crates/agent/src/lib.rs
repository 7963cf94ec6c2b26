//! The MetalAgent agent: a tool-calling loop over an LLM provider, and the
//! chat sessions built on it.
//!
//! Each user turn runs **send → act → observe** until the model answers
//! with text:
//!
//! 1. Send the conversation and tool definitions to the provider.
//! 2. If the model calls tools, execute them and append the results.
//! 3. Repeat until a text reply or the iteration cap.
//!
//! [`ChatSession`] wraps a turn with quit handling and passes the reply
//! through the [`Enricher`], which turns recommended albums into player
//! embeds.

pub mod enrich;
pub mod loop_runner;
pub mod prompt;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use enrich::{Enricher, Recommendation};
pub use loop_runner::{AgentLoop, ITERATION_LIMIT_REPLY};
pub use prompt::{SYSTEM_PROMPT, WELCOME_MESSAGE};
pub use session::{ChatSession, QUIT_WORDS, TranscriptEntry, TurnOutcome, is_quit};
