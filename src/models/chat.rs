use serde::{Deserialize, Serialize};

use super::enums::ChatRole;

/// One turn of the support-chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// An action the assistant asked the shell to perform.
///
/// Converted from the API's raw `action` / `action_target` string pair;
/// unknown actions are dropped at the boundary with a warning and never
/// propagate as raw strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatDirective {
    Navigate { target: String },
    StartTriage,
    BookConsultation,
}

impl ChatDirective {
    pub fn from_wire(action: &str, target: Option<String>) -> Option<Self> {
        match action {
            "navigate" => {
                let Some(target) = target else {
                    tracing::warn!("Chat navigate action without a target, dropping");
                    return None;
                };
                Some(Self::Navigate { target })
            }
            "start_triage" => Some(Self::StartTriage),
            "book_consultation" => Some(Self::BookConsultation),
            other => {
                tracing::warn!(action = %other, "Unknown chat action, dropping");
                None
            }
        }
    }
}

/// Assistant reply after boundary conversion: display text, an optional
/// typed directive, and follow-up suggestions.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub directive: Option<ChatDirective>,
    pub suggestions: Vec<String>,
}
