//! Dashboard endpoints.

use super::client::ApiClient;
use super::error::ApiError;
use crate::patient_state::PatientState;

/// Server-computed patient state, the authoritative value for the
/// dashboard page. The local deriver covers consumers that already
/// hold the underlying data.
pub async fn patient_state(client: &ApiClient) -> Result<PatientState, ApiError> {
    client.get("/api/v1/dashboard/patient-state").await
}
