//! A single user's chat: the conversation sent to the LLM plus the
//! transcript shown to the user.

use metalagent_core::event::DomainEvent;
use metalagent_core::message::{Conversation, ConversationId, Message, Role};
use serde::Serialize;
use tracing::{debug, warn};

use crate::enrich::{Enricher, Recommendation};
use crate::loop_runner::AgentLoop;
use crate::prompt::WELCOME_MESSAGE;

/// Inputs that end a session, compared trimmed and case-insensitively.
pub const QUIT_WORDS: [&str; 4] = ["q", "quit", "exit", "goodbye"];

pub fn is_quit(input: &str) -> bool {
    let input = input.trim();
    QUIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

/// One entry in the user-facing transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Message { role: Role, content: String },
    /// Player markup for a recommended album. Never sent to the LLM.
    Embed {
        artist: String,
        album: String,
        html: String,
    },
    Error { message: String },
}

impl TranscriptEntry {
    fn message(role: Role, content: impl Into<String>) -> Self {
        Self::Message {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Reply {
        text: String,
        recommendations: Vec<Recommendation>,
    },
    /// The user quit, now or earlier.
    Ended,
    /// The agent failed; the session stays usable.
    Failed(String),
}

#[derive(Debug)]
pub struct ChatSession {
    conversation: Conversation,
    transcript: Vec<TranscriptEntry>,
    finished: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            transcript: vec![TranscriptEntry::message(Role::Assistant, WELCOME_MESSAGE)],
            finished: false,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.conversation.id
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Messages as the LLM sees them.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Handle one line of user input.
    pub async fn send(&mut self, agent: &AgentLoop, enricher: &Enricher, input: &str) -> TurnOutcome {
        if self.finished {
            return TurnOutcome::Ended;
        }

        self.transcript.push(TranscriptEntry::message(Role::User, input));
        if is_quit(input) {
            debug!(session = %self.conversation.id, "Session ended by user");
            self.finished = true;
            return TurnOutcome::Ended;
        }

        let mark = self.conversation.messages.len();
        self.conversation.push(Message::user(input));

        let text = match agent.process(&mut self.conversation).await {
            Ok(text) => text,
            Err(e) => {
                warn!(session = %self.conversation.id, error = %e, "Agent turn failed");
                // Drop the partial turn so the next request starts clean.
                self.conversation.messages.truncate(mark.max(1));
                let message = e.to_string();
                self.transcript.push(TranscriptEntry::Error {
                    message: message.clone(),
                });
                return TurnOutcome::Failed(message);
            }
        };

        self.transcript.push(TranscriptEntry::message(Role::Assistant, &text));
        let recommendations = enricher.enrich(&text);
        for rec in &recommendations {
            if let Some(html) = &rec.embed {
                self.transcript.push(TranscriptEntry::Embed {
                    artist: rec.artist.clone(),
                    album: rec.album.clone(),
                    html: html.clone(),
                });
            }
        }

        agent.event_bus().publish(DomainEvent::RecommendationsEnriched {
            conversation_id: self.conversation.id.to_string(),
            parsed: recommendations.len(),
            matched: recommendations.iter().filter(|r| r.is_playable()).count(),
            timestamp: chrono::Utc::now(),
        });

        TurnOutcome::Reply {
            text,
            recommendations,
        }
    }
}
