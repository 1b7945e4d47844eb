//! Triage endpoints.
//!
//! The submit response may carry a loosely-typed `reasoning` object;
//! it is flattened to display strings here and never leaves this
//! module as raw JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{AnswerValue, Question, RecommendedAction, RiskLevel, TriageHistoryItem, TriageOutcome};

#[derive(Serialize)]
struct StartRequest<'a> {
    chief_complaint: &'a str,
}

/// Response of `POST /api/v1/triage/start`.
#[derive(Debug, Deserialize)]
pub struct StartResponse {
    pub session_id: Uuid,
    pub questions: Vec<Question>,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    answers: &'a BTreeMap<String, AnswerValue>,
}

/// Raw submit response before boundary conversion.
#[derive(Deserialize)]
struct OutcomeDto {
    risk_level: RiskLevel,
    recommended_action: RecommendedAction,
    score: f64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    reasoning: Option<serde_json::Value>,
}

impl From<OutcomeDto> for TriageOutcome {
    fn from(dto: OutcomeDto) -> Self {
        Self {
            risk_level: dto.risk_level,
            recommended_action: dto.recommended_action,
            score: dto.score,
            created_at: dto.created_at,
            reasoning: dto.reasoning.map(flatten_reasoning).unwrap_or_default(),
        }
    }
}

/// Flatten the API's free-form reasoning into display-ready lines.
/// Objects keep their keys, arrays are numbered, anything else lands
/// under a single "summary" entry.
fn flatten_reasoning(value: serde_json::Value) -> BTreeMap<String, String> {
    let mut lines = BTreeMap::new();
    match value {
        serde_json::Value::Object(entries) => {
            for (key, entry) in entries {
                lines.insert(key, display_value(entry));
            }
        }
        serde_json::Value::Array(entries) => {
            for (i, entry) in entries.into_iter().enumerate() {
                lines.insert(format!("{:02}", i + 1), display_value(entry));
            }
        }
        serde_json::Value::Null => {}
        other => {
            lines.insert("summary".to_string(), display_value(other));
        }
    }
    lines
}

fn display_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

pub async fn start(client: &ApiClient, chief_complaint: &str) -> Result<StartResponse, ApiError> {
    client
        .post("/api/v1/triage/start", &StartRequest { chief_complaint })
        .await
}

pub async fn submit(
    client: &ApiClient,
    session_id: Uuid,
    answers: &BTreeMap<String, AnswerValue>,
) -> Result<TriageOutcome, ApiError> {
    let dto: OutcomeDto = client
        .post(
            &format!("/api/v1/triage/{session_id}/submit"),
            &SubmitRequest { answers },
        )
        .await?;
    Ok(dto.into())
}

pub async fn history(client: &ApiClient) -> Result<Vec<TriageHistoryItem>, ApiError> {
    client.get("/api/v1/triage/history").await
}
