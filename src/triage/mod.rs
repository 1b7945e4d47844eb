//! Triage flow: the wizard state machine and its vocabulary.

pub mod flow;

pub use flow::{TriageError, TriageFlow, TriageStep, TriageView};
