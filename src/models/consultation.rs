use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ConsultationStatus, PaymentStatus, Specialty};

/// A consultation as the API reports it.
///
/// The client only reflects `status`; transitions happen server-side
/// through the explicit booking / start / complete calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub specialty: Specialty,
    pub status: ConsultationStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    /// Links back to the triage session the booking stemmed from.
    /// Absent for self-initiated bookings.
    #[serde(default)]
    pub triage_session_id: Option<Uuid>,
}

/// Request body for `POST /api/v1/consultations/`.
///
/// `triage_session_id` is omitted from the JSON entirely when absent,
/// not sent as null.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest {
    pub specialty: Specialty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triage_session_id: Option<Uuid>,
}
