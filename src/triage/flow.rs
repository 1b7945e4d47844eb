//! Triage wizard state machine.
//!
//! `TriageFlow` is plain data with pure transition methods, no I/O
//! and no locks, unit-testable without a UI or a server. The `Portal`
//! validates input, calls the API, and applies the matching transition
//! only on success, so a failed call always leaves the flow exactly
//! where it was.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::models::{AnswerValue, Question, TriageOutcome};

// ═══════════════════════════════════════════════════════════
// Steps and view
// ═══════════════════════════════════════════════════════════

/// Forward steps of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriageStep {
    #[default]
    Start,
    Questions,
    Result,
}

/// Which pane the triage page shows. Toggling it never touches the
/// wizard's forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriageView {
    #[default]
    Wizard,
    History,
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// Errors from flow transitions and answer recording.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("Cannot {operation} in the {step:?} step")]
    WrongStep {
        operation: &'static str,
        step: TriageStep,
    },
    #[error("No triage session in progress")]
    NoActiveSession,
    #[error("Unknown question '{key}'")]
    UnknownQuestion { key: String },
    #[error("Answer for '{key}' does not match the question type")]
    AnswerMismatch { key: String },
}

// ═══════════════════════════════════════════════════════════
// TriageFlow
// ═══════════════════════════════════════════════════════════

/// State of one triage episode: Start → Questions → Result.
#[derive(Debug, Clone, Default)]
pub struct TriageFlow {
    step: TriageStep,
    view: TriageView,
    chief_complaint: Option<String>,
    session_id: Option<Uuid>,
    questions: Vec<Question>,
    answers: BTreeMap<String, AnswerValue>,
    outcome: Option<TriageOutcome>,
}

impl TriageFlow {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn step(&self) -> TriageStep {
        self.step
    }

    pub fn view(&self) -> TriageView {
        self.view
    }

    pub fn chief_complaint(&self) -> Option<&str> {
        self.chief_complaint.as_deref()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<String, AnswerValue> {
        &self.answers
    }

    pub fn outcome(&self) -> Option<&TriageOutcome> {
        self.outcome.as_ref()
    }

    /// A session was started but not yet submitted. Feeds the
    /// dangling-session input of patient-state derivation.
    pub fn in_progress(&self) -> bool {
        self.step() == TriageStep::Questions
    }

    /// Keys of questions without a recorded answer, in issue order.
    pub fn unanswered_keys(&self) -> Vec<&str> {
        self.questions
            .iter()
            .filter(|q| !self.answers.contains_key(&q.key))
            .map(|q| q.key.as_str())
            .collect()
    }

    /// Gate an operation on the current step.
    pub fn require_step(
        &self,
        expected: TriageStep,
        operation: &'static str,
    ) -> Result<(), TriageError> {
        if self.step() != expected {
            return Err(TriageError::WrongStep {
                operation,
                step: self.step(),
            });
        }
        Ok(())
    }

    // ── Transitions ─────────────────────────────────────────

    /// Adopt a started session: Start → Questions.
    ///
    /// Called with a validated complaint and the API's question set.
    /// Answers reset so a previous episode can never bleed through.
    pub fn begin(
        &mut self,
        chief_complaint: String,
        session_id: Uuid,
        questions: Vec<Question>,
    ) -> Result<(), TriageError> {
        self.require_step(TriageStep::Start, "start a session")?;
        self.chief_complaint = Some(chief_complaint);
        self.session_id = Some(session_id);
        self.questions = questions;
        self.answers.clear();
        self.outcome = None;
        self.step = TriageStep::Questions;
        Ok(())
    }

    /// Record an answer. Re-answering a key overwrites; the step does
    /// not change.
    pub fn answer(&mut self, key: &str, value: AnswerValue) -> Result<(), TriageError> {
        self.require_step(TriageStep::Questions, "answer a question")?;
        let question = self
            .questions
            .iter()
            .find(|q| q.key == key)
            .ok_or_else(|| TriageError::UnknownQuestion { key: key.to_string() })?;
        if !question.kind.accepts(&value) {
            return Err(TriageError::AnswerMismatch { key: key.to_string() });
        }
        self.answers.insert(key.to_string(), value);
        Ok(())
    }

    /// Adopt the scored result: Questions → Result.
    pub fn complete(&mut self, outcome: TriageOutcome) -> Result<(), TriageError> {
        self.require_step(TriageStep::Questions, "complete the session")?;
        self.outcome = Some(outcome);
        self.step = TriageStep::Result;
        Ok(())
    }

    /// Back to a blank Start. Valid from any step: from Result after
    /// reading the outcome, from Questions to abandon a dangling
    /// session. The view toggle is left alone.
    pub fn restart(&mut self) {
        self.step = TriageStep::Start;
        self.chief_complaint = None;
        self.session_id = None;
        self.questions.clear();
        self.answers.clear();
        self.outcome = None;
    }

    // ── View toggle ─────────────────────────────────────────

    pub fn set_view(&mut self, view: TriageView) {
        self.view = view;
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
