//! Support chat transcript.
//!
//! Holds the running conversation with the support assistant and the
//! quick-reply suggestions that accompany the latest reply. The full
//! transcript goes out with every turn so the assistant keeps context;
//! a failed send leaves the user's message in place and flips the
//! retry flag instead of dropping the text they typed.

use crate::models::{ChatMessage, ChatReply, ChatRole};

/// Starter suggestions shown before the first exchange.
fn default_suggestions() -> Vec<String> {
    vec![
        "Como funciona a triagem?".to_string(),
        "Quero agendar uma consulta".to_string(),
        "Como altero minha senha?".to_string(),
    ]
}

// ═══════════════════════════════════════════════════════════
// SupportChat
// ═══════════════════════════════════════════════════════════

/// In-memory chat state for one signed-in session. Not persisted.
#[derive(Debug, Clone)]
pub struct SupportChat {
    messages: Vec<ChatMessage>,
    suggestions: Vec<String>,
    needs_retry: bool,
}

impl Default for SupportChat {
    fn default() -> Self {
        Self::new()
    }
}

impl SupportChat {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            suggestions: default_suggestions(),
            needs_retry: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Quick replies for the current point in the conversation.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// True when the last outgoing message never got a reply.
    pub fn needs_retry(&self) -> bool {
        self.needs_retry
    }

    /// The messages to send for the next turn: the whole transcript,
    /// ending with the user's newest message.
    pub fn outbound(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append the user's message ahead of sending it. A send already
    /// awaiting retry keeps its flag until a reply lands.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Record the assistant's reply: append it, swap in the new
    /// suggestions, and clear any pending retry.
    pub fn push_reply(&mut self, reply: &ChatReply) {
        self.messages.push(ChatMessage::assistant(&reply.text));
        self.suggestions = reply.suggestions.clone();
        self.needs_retry = false;
    }

    /// Mark the last send as failed. The user's message stays in the
    /// transcript so a retry resends it verbatim.
    pub fn mark_failed(&mut self) {
        self.needs_retry = true;
    }

    /// Drop the transcript and start over with the default suggestions.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// The last user message, if the transcript ends with one.
    pub fn pending_message(&self) -> Option<&str> {
        match self.messages.last() {
            Some(m) if m.role == ChatRole::User => Some(&m.content),
            _ => None,
        }
    }
}
