//! Data vocabulary shared across the portal core.
//!
//! Everything here mirrors the remote API's JSON contracts. Untrusted
//! strings (roles, risk levels, statuses) are parsed into closed enums
//! at the boundary; raw `serde_json::Value` never leaves the `api`
//! module.

pub mod chat;
pub mod consultation;
pub mod enums;
pub mod triage;
pub mod user;

pub use chat::{ChatDirective, ChatMessage, ChatReply};
pub use consultation::{BookingRequest, Consultation};
pub use enums::{
    ActionDeadline, ChatRole, ConsultationStatus, CurrentState, NextAction, PaymentStatus,
    RecommendedAction, RiskLevel, Role, Specialty, Urgency,
};
pub use triage::{AnswerValue, Question, QuestionKind, TriageHistoryItem, TriageOutcome};
pub use user::{CredentialsResponse, Session, User};

/// Errors from model parsing and conversion.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid {field} value: '{value}'")]
    InvalidEnum { field: String, value: String },
}
