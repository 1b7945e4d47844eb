//! Client core of the Telsalus telehealth portal: session lifecycle,
//! symptom triage, consultation booking, patient-state derivation, and
//! the support chat, behind one `Portal` facade. UI shells stay thin.

pub mod api; // typed HTTP client + endpoint bindings
pub mod chat; // support assistant transcript
pub mod config;
pub mod models;
pub mod patient_state; // current state + next action derivation
pub mod portal;
pub mod session; // token persistence, restore, 401 handling
pub mod triage; // symptom wizard state machine
pub mod validation;

use tracing_subscriber::EnvFilter;

pub use config::PortalConfig;
pub use portal::{Portal, PortalError};

/// Initialize tracing from `RUST_LOG`, falling back to the crate
/// default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
