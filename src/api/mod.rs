//! HTTP surface against the remote API.
//!
//! `ApiClient` carries the portal-wide request pipeline (bearer
//! injection, error mapping, the global 401 hook); the endpoint
//! modules wrap individual routes with typed request/response DTOs.
//! Raw `serde_json::Value` never leaves this module.

pub mod auth;
pub mod chatbot;
pub mod client;
pub mod consultations;
pub mod dashboard;
pub mod error;
pub mod triage;

pub use client::ApiClient;
pub use error::ApiError;
