//! Assistant chat transcript
//!
//! The assistant itself is an opaque text-in/text-out service. This module
//! only keeps the conversation and turns failures into fixed fallbacks.

use crate::{ReliefError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::warn;

pub const GREETING: &str = "Hello! I'm Relief AI, your disaster response assistant. I can help you with safety questions, find nearby resources, and provide emergency guidance. How can I help you today?";

/// Reply shown when the service answers without a response text
pub const NO_RESPONSE_FALLBACK: &str = "Sorry, I could not understand that.";

/// Reply shown when the request fails
pub const ERROR_FALLBACK: &str = "Sorry, something went wrong while fetching the response.";

pub const QUICK_QUESTIONS: [&str; 5] = [
    "Is my area safe right now?",
    "Where is the nearest shelter?",
    "What should I do in a flood?",
    "How to prepare for evacuation?",
    "Are the roads safe to travel?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: usize,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Text to display for a completed request
pub fn reply_text<E: Display>(reply: std::result::Result<Option<String>, E>) -> String {
    match reply {
        Ok(Some(text)) if !text.trim().is_empty() => text,
        Ok(_) => NO_RESPONSE_FALLBACK.to_string(),
        Err(e) => {
            warn!("Chat request failed: {}", e);
            ERROR_FALLBACK.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
        };
        transcript.push(GREETING.to_string(), Sender::Assistant);
        transcript
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, text: String, sender: Sender) -> &ChatMessage {
        let id = self.messages.len() + 1;
        self.messages.push(ChatMessage {
            id,
            text,
            sender,
            timestamp: Utc::now(),
        });
        &self.messages[id - 1]
    }

    /// Append a user message; blank input is rejected and nothing is sent
    pub fn push_user(&mut self, text: &str) -> Result<&ChatMessage> {
        if text.trim().is_empty() {
            return Err(ReliefError::EmptyMessage);
        }
        Ok(self.push(text.to_string(), Sender::User))
    }

    pub fn push_reply<E: Display>(
        &mut self,
        reply: std::result::Result<Option<String>, E>,
    ) -> &ChatMessage {
        self.push(reply_text(reply), Sender::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_starts_with_greeting() {
        let t = Transcript::new();
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].sender, Sender::Assistant);
        assert_eq!(t.messages()[0].text, GREETING);
    }

    #[test]
    fn test_blank_message_rejected() {
        let mut t = Transcript::new();
        assert!(matches!(t.push_user("   "), Err(ReliefError::EmptyMessage)));
        assert_eq!(t.messages().len(), 1);
    }

    #[test]
    fn test_reply_fallbacks() {
        let mut t = Transcript::new();
        t.push_user(QUICK_QUESTIONS[1]).unwrap();
        t.push_reply::<String>(Ok(Some("Head to the community center.".to_string())));
        t.push_reply::<String>(Ok(None));
        t.push_reply::<String>(Ok(Some(String::new())));
        t.push_reply(Err("connection refused"));

        let texts: Vec<&str> = t.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts[2..],
            [
                "Head to the community center.",
                NO_RESPONSE_FALLBACK,
                NO_RESPONSE_FALLBACK,
                ERROR_FALLBACK
            ]
        );
        let ids: Vec<usize> = t.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }
}
