//! Consultation endpoints.

use uuid::Uuid;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{BookingRequest, Consultation};

pub async fn book(client: &ApiClient, request: &BookingRequest) -> Result<Consultation, ApiError> {
    client.post("/api/v1/consultations/", request).await
}

pub async fn list(client: &ApiClient) -> Result<Vec<Consultation>, ApiError> {
    client.get("/api/v1/consultations/").await
}

/// Doctor-side: move a scheduled consultation to in-progress.
/// Role gating is server-side; the client just reflects the result.
pub async fn start(client: &ApiClient, id: Uuid) -> Result<Consultation, ApiError> {
    client
        .post_no_body(&format!("/api/v1/consultations/{id}/start"))
        .await
}

/// Doctor-side: close out an in-progress consultation.
pub async fn complete(client: &ApiClient, id: Uuid) -> Result<Consultation, ApiError> {
    client
        .post_no_body(&format!("/api/v1/consultations/{id}/complete"))
        .await
}
