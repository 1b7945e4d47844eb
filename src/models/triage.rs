use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{RecommendedAction, RiskLevel};

fn default_scale_min() -> i64 {
    1
}

fn default_scale_max() -> i64 {
    10
}

/// What kind of answer a triage question expects.
///
/// Tagged on the wire as `"type": "boolean" | "scale" | "select"`.
/// Scale bounds default to 1..=10 when the API omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Boolean,
    Scale {
        #[serde(default = "default_scale_min")]
        min: i64,
        #[serde(default = "default_scale_max")]
        max: i64,
    },
    Select { options: Vec<String> },
}

/// One question in a triage session's dynamic question set.
///
/// Issued by the API at `start`; immutable for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within the session; answers are keyed by it.
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// A recorded answer. Serializes as a bare JSON bool, number, or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Scale(i64),
    Text(String),
}

impl QuestionKind {
    /// Whether `answer` type-matches this question.
    ///
    /// Booleans must be real JSON booleans (never "true" strings),
    /// scale answers must fall inside the inclusive range, select
    /// answers must be one of the issued options.
    pub fn accepts(&self, answer: &AnswerValue) -> bool {
        match (self, answer) {
            (Self::Boolean, AnswerValue::Bool(_)) => true,
            (Self::Scale { min, max }, AnswerValue::Scale(n)) => n >= min && n <= max,
            (Self::Select { options }, AnswerValue::Text(s)) => options.iter().any(|o| o == s),
            _ => false,
        }
    }
}

/// Scored result of a submitted triage session. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageOutcome {
    pub risk_level: RiskLevel,
    pub recommended_action: RecommendedAction,
    /// Composite score in [0, 100], computed server-side.
    pub score: f64,
    pub created_at: DateTime<Utc>,
    /// Display-ready reasoning lines, flattened from the API's
    /// loosely-typed reasoning object at the boundary.
    pub reasoning: BTreeMap<String, String>,
}

/// One row of `GET /api/v1/triage/history`: a past completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageHistoryItem {
    pub session_id: Uuid,
    pub chief_complaint: String,
    pub risk_level: RiskLevel,
    pub recommended_action: RecommendedAction,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}
