//! Support chatbot endpoint.

use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{ChatDirective, ChatMessage, ChatReply};

#[derive(Serialize)]
struct ChatTurnRequest<'a> {
    messages: &'a [ChatMessage],
    page: &'a str,
    page_title: &'a str,
}

/// Raw reply before the action pair is converted to a typed directive.
#[derive(Deserialize)]
struct ChatTurnResponse {
    reply: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    action_target: Option<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

impl From<ChatTurnResponse> for ChatReply {
    fn from(response: ChatTurnResponse) -> Self {
        let directive = response
            .action
            .as_deref()
            .and_then(|action| ChatDirective::from_wire(action, response.action_target));
        Self {
            text: response.reply,
            directive,
            suggestions: response.suggestions,
        }
    }
}

/// One chat turn: the full transcript plus the page the user is on.
pub async fn chat_turn(
    client: &ApiClient,
    messages: &[ChatMessage],
    page: &str,
    page_title: &str,
) -> Result<ChatReply, ApiError> {
    let response: ChatTurnResponse = client
        .post(
            "/api/v1/chatbot/chat",
            &ChatTurnRequest {
                messages,
                page,
                page_title,
            },
        )
        .await?;
    Ok(response.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_page_context() {
        let messages = vec![ChatMessage::user("Como agendo uma consulta?")];
        let body = serde_json::to_value(ChatTurnRequest {
            messages: &messages,
            page: "/dashboard",
            page_title: "Dashboard",
        })
        .unwrap();
        assert_eq!(body["page"], "/dashboard");
        assert_eq!(body["page_title"], "Dashboard");
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn response_with_known_action_converts_to_directive() {
        let response: ChatTurnResponse = serde_json::from_value(json!({
            "reply": "Vou te levar para a triagem.",
            "action": "start_triage"
        }))
        .unwrap();
        let reply = ChatReply::from(response);
        assert_eq!(reply.directive, Some(ChatDirective::StartTriage));
        assert!(reply.suggestions.is_empty());
    }

    #[test]
    fn response_with_unknown_action_drops_it() {
        let response: ChatTurnResponse = serde_json::from_value(json!({
            "reply": "ok",
            "action": "open_billing",
            "action_target": "/billing"
        }))
        .unwrap();
        let reply = ChatReply::from(response);
        assert!(reply.directive.is_none(), "unknown actions never propagate");
        assert_eq!(reply.text, "ok");
    }

    #[test]
    fn response_without_action_has_no_directive() {
        let response: ChatTurnResponse = serde_json::from_value(json!({
            "reply": "Posso ajudar com mais alguma coisa?",
            "suggestions": ["Agendar consulta", "Ver histórico"]
        }))
        .unwrap();
        let reply = ChatReply::from(response);
        assert!(reply.directive.is_none());
        assert_eq!(reply.suggestions.len(), 2);
    }
}
