//! Patient state derivation.
//!
//! One pure function from (triage history, dangling-session flag,
//! consultation list) to the patient's current state and recommended
//! next step. Never persisted, always recomputed on demand.
//!
//! The same `PatientState` shape deserializes from
//! `GET /api/v1/dashboard/patient-state`, which is authoritative for
//! the dashboard; this local implementation serves consumers that
//! already hold the data, and every consumer is read-only.

use serde::{Deserialize, Serialize};

use crate::models::{
    ActionDeadline, Consultation, ConsultationStatus, CurrentState, NextAction, RecommendedAction,
    RiskLevel, TriageHistoryItem, Urgency,
};

// ═══════════════════════════════════════════════════════════
// PatientState
// ═══════════════════════════════════════════════════════════

/// Where the patient stands and what they should do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientState {
    pub current_state: CurrentState,
    #[serde(default)]
    pub last_triage_risk: Option<RiskLevel>,
    #[serde(default)]
    pub last_triage_action: Option<RecommendedAction>,
    pub next_action: NextAction,
    #[serde(default)]
    pub next_action_deadline: Option<ActionDeadline>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
    pub triage_count: u32,
    pub consultation_count: u32,
    /// Completed consultations as a whole percent of all consultations.
    /// `None` when there are none to measure (rendered "—").
    #[serde(default)]
    pub resolution_rate: Option<u8>,
}

// ═══════════════════════════════════════════════════════════
// Derivation
// ═══════════════════════════════════════════════════════════

/// Derive the patient state. Total: every input combination produces
/// exactly one of the five states.
///
/// Precedence: a dangling (started, unsubmitted) session wins, then an
/// empty history, then the latest completed triage interpreted against
/// the consultations that reference it. A cancelled or no-show booking
/// does not count as addressing the recommendation; the state falls
/// back to `TriageCompleted` so the call to action comes back.
pub fn derive(
    history: &[TriageHistoryItem],
    triage_in_progress: bool,
    consultations: &[Consultation],
) -> PatientState {
    let latest = latest_triage(history);
    let last_triage_risk = latest.map(|t| t.risk_level);
    let last_triage_action = latest.map(|t| t.recommended_action);
    let counts = Counts::of(history, consultations);

    if triage_in_progress {
        return PatientState {
            current_state: CurrentState::TriageInProgress,
            last_triage_risk,
            last_triage_action,
            next_action: NextAction::ContinueTriage,
            next_action_deadline: None,
            urgency: None,
            triage_count: counts.triage,
            consultation_count: counts.consultations,
            resolution_rate: counts.resolution_rate,
        };
    }

    let Some(latest) = latest else {
        return PatientState {
            current_state: CurrentState::NoTriage,
            last_triage_risk: None,
            last_triage_action: None,
            next_action: NextAction::StartTriage,
            next_action_deadline: None,
            urgency: None,
            triage_count: counts.triage,
            consultation_count: counts.consultations,
            resolution_rate: counts.resolution_rate,
        };
    };

    let (current_state, next_action, next_action_deadline, urgency) =
        match booking_for(latest, consultations) {
            BookingOutcome::Completed => (
                CurrentState::ConsultationCompleted,
                NextAction::None,
                None,
                None,
            ),
            BookingOutcome::Active => {
                (CurrentState::ConsultationBooked, NextAction::None, None, None)
            }
            BookingOutcome::Unaddressed => {
                let (action, urgency, deadline) = action_for_risk(latest.risk_level);
                (CurrentState::TriageCompleted, action, deadline, Some(urgency))
            }
        };

    PatientState {
        current_state,
        last_triage_risk,
        last_triage_action,
        next_action,
        next_action_deadline,
        urgency,
        triage_count: counts.triage,
        consultation_count: counts.consultations,
        resolution_rate: counts.resolution_rate,
    }
}

/// Next step, urgency, and deadline for a completed-but-unaddressed
/// triage, by risk level.
fn action_for_risk(risk: RiskLevel) -> (NextAction, Urgency, Option<ActionDeadline>) {
    match risk {
        // Immediate: a deadline would only soften the message
        RiskLevel::Urgent => (NextAction::GoToEr, Urgency::Critical, None),
        RiskLevel::High => (
            NextAction::BookConsultation,
            Urgency::High,
            Some(ActionDeadline::Today),
        ),
        RiskLevel::Medium => (
            NextAction::BookConsultation,
            Urgency::Medium,
            Some(ActionDeadline::Within24h),
        ),
        RiskLevel::Low => (
            NextAction::SelfCare,
            Urgency::Low,
            Some(ActionDeadline::Whenever),
        ),
    }
}

fn latest_triage(history: &[TriageHistoryItem]) -> Option<&TriageHistoryItem> {
    history.iter().max_by_key(|t| t.created_at)
}

enum BookingOutcome {
    /// A consultation referencing the triage was completed.
    Completed,
    /// A referencing consultation is requested, scheduled, or running.
    Active,
    /// No referencing consultation, or only cancelled / no-show ones.
    Unaddressed,
}

fn booking_for(triage: &TriageHistoryItem, consultations: &[Consultation]) -> BookingOutcome {
    let mut active = false;
    let mut completed = false;
    for consultation in consultations
        .iter()
        .filter(|c| c.triage_session_id == Some(triage.session_id))
    {
        match consultation.status {
            ConsultationStatus::Completed => completed = true,
            ConsultationStatus::Cancelled | ConsultationStatus::NoShow => {}
            _ => active = true,
        }
    }
    if completed {
        BookingOutcome::Completed
    } else if active {
        BookingOutcome::Active
    } else {
        BookingOutcome::Unaddressed
    }
}

struct Counts {
    triage: u32,
    consultations: u32,
    resolution_rate: Option<u8>,
}

impl Counts {
    fn of(history: &[TriageHistoryItem], consultations: &[Consultation]) -> Self {
        let completed = consultations
            .iter()
            .filter(|c| c.status == ConsultationStatus::Completed)
            .count();
        let resolution_rate = if consultations.is_empty() {
            None
        } else {
            let rate = (completed as f64 / consultations.len() as f64) * 100.0;
            Some(rate.round() as u8)
        };
        Self {
            triage: history.len() as u32,
            consultations: consultations.len() as u32,
            resolution_rate,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentStatus, Specialty};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn triage_item(risk: RiskLevel, action: RecommendedAction, age_hours: i64) -> TriageHistoryItem {
        TriageHistoryItem {
            session_id: Uuid::new_v4(),
            chief_complaint: "febre e tosse".into(),
            risk_level: risk,
            recommended_action: action,
            score: 50.0,
            created_at: Utc::now() - Duration::hours(age_hours),
        }
    }

    fn consultation_referencing(
        triage: &TriageHistoryItem,
        status: ConsultationStatus,
    ) -> Consultation {
        Consultation {
            id: Uuid::new_v4(),
            specialty: Specialty::GeneralPractice,
            status,
            scheduled_at: None,
            payment_status: PaymentStatus::Pending,
            triage_session_id: Some(triage.session_id),
        }
    }

    fn unrelated_consultation(status: ConsultationStatus) -> Consultation {
        Consultation {
            id: Uuid::new_v4(),
            specialty: Specialty::Dermatology,
            status,
            scheduled_at: None,
            payment_status: PaymentStatus::Paid,
            triage_session_id: None,
        }
    }

    #[test]
    fn no_history_and_idle_is_no_triage() {
        let state = derive(&[], false, &[]);
        assert_eq!(state.current_state, CurrentState::NoTriage);
        assert_eq!(state.next_action, NextAction::StartTriage);
        assert!(state.next_action_deadline.is_none());
        assert!(state.last_triage_risk.is_none());
        assert_eq!(state.triage_count, 0);
        assert!(state.resolution_rate.is_none());
    }

    #[test]
    fn dangling_session_wins_over_everything() {
        let latest = triage_item(RiskLevel::High, RecommendedAction::DoctorNow, 24);
        let consultations = vec![consultation_referencing(&latest, ConsultationStatus::Completed)];
        let state = derive(&[latest], true, &consultations);
        assert_eq!(state.current_state, CurrentState::TriageInProgress);
        assert_eq!(state.next_action, NextAction::ContinueTriage);
        // Prior completed triage still reported as the last one
        assert_eq!(state.last_triage_risk, Some(RiskLevel::High));
    }

    #[test]
    fn dangling_session_with_no_history() {
        let state = derive(&[], true, &[]);
        assert_eq!(state.current_state, CurrentState::TriageInProgress);
        assert!(state.last_triage_risk.is_none());
        assert_eq!(state.triage_count, 0);
    }

    #[test]
    fn completed_triage_without_booking() {
        let latest = triage_item(RiskLevel::High, RecommendedAction::DoctorNow, 1);
        let state = derive(&[latest], false, &[]);
        assert_eq!(state.current_state, CurrentState::TriageCompleted);
        assert_eq!(state.next_action, NextAction::BookConsultation);
        assert_eq!(state.next_action_deadline, Some(ActionDeadline::Today));
        assert_eq!(state.urgency, Some(Urgency::High));
        assert_eq!(state.last_triage_risk, Some(RiskLevel::High));
        assert_eq!(state.last_triage_action, Some(RecommendedAction::DoctorNow));
    }

    #[test]
    fn risk_to_action_table() {
        for (risk, action, urgency, deadline) in [
            (RiskLevel::Urgent, NextAction::GoToEr, Urgency::Critical, None),
            (
                RiskLevel::High,
                NextAction::BookConsultation,
                Urgency::High,
                Some(ActionDeadline::Today),
            ),
            (
                RiskLevel::Medium,
                NextAction::BookConsultation,
                Urgency::Medium,
                Some(ActionDeadline::Within24h),
            ),
            (
                RiskLevel::Low,
                NextAction::SelfCare,
                Urgency::Low,
                Some(ActionDeadline::Whenever),
            ),
        ] {
            let (derived_action, derived_urgency, derived_deadline) = action_for_risk(risk);
            assert_eq!(derived_action, action);
            assert_eq!(derived_urgency, urgency);
            assert_eq!(derived_deadline, deadline);
        }
    }

    #[test]
    fn urgent_risk_has_no_deadline() {
        let latest = triage_item(RiskLevel::Urgent, RecommendedAction::ErNow, 0);
        let state = derive(&[latest], false, &[]);
        assert_eq!(state.next_action, NextAction::GoToEr);
        assert!(state.next_action_deadline.is_none());
        assert_eq!(state.urgency, Some(Urgency::Critical));
    }

    #[test]
    fn active_booking_reference_means_booked() {
        let latest = triage_item(RiskLevel::Medium, RecommendedAction::Doctor24h, 3);
        for status in [
            ConsultationStatus::Requested,
            ConsultationStatus::Scheduled,
            ConsultationStatus::InProgress,
        ] {
            let consultations = vec![consultation_referencing(&latest, status)];
            let state = derive(&[latest.clone()], false, &consultations);
            assert_eq!(
                state.current_state,
                CurrentState::ConsultationBooked,
                "status {status:?} should read as booked"
            );
            assert_eq!(state.next_action, NextAction::None);
        }
    }

    #[test]
    fn completed_booking_reference_means_completed() {
        let latest = triage_item(RiskLevel::High, RecommendedAction::DoctorNow, 48);
        let consultations = vec![consultation_referencing(&latest, ConsultationStatus::Completed)];
        let state = derive(&[latest], false, &consultations);
        assert_eq!(state.current_state, CurrentState::ConsultationCompleted);
        assert_eq!(state.next_action, NextAction::None);
        assert!(state.urgency.is_none());
    }

    #[test]
    fn completed_wins_over_a_second_active_booking() {
        let latest = triage_item(RiskLevel::High, RecommendedAction::DoctorNow, 48);
        let consultations = vec![
            consultation_referencing(&latest, ConsultationStatus::Completed),
            consultation_referencing(&latest, ConsultationStatus::Scheduled),
        ];
        let state = derive(&[latest], false, &consultations);
        assert_eq!(state.current_state, CurrentState::ConsultationCompleted);
    }

    #[test]
    fn cancelled_booking_restores_the_call_to_action() {
        let latest = triage_item(RiskLevel::High, RecommendedAction::DoctorNow, 5);
        let consultations = vec![consultation_referencing(&latest, ConsultationStatus::Cancelled)];
        let state = derive(&[latest], false, &consultations);
        assert_eq!(state.current_state, CurrentState::TriageCompleted);
        assert_eq!(state.next_action, NextAction::BookConsultation);
    }

    #[test]
    fn unrelated_consultations_do_not_address_the_triage() {
        let latest = triage_item(RiskLevel::Medium, RecommendedAction::Doctor24h, 2);
        let consultations = vec![unrelated_consultation(ConsultationStatus::Scheduled)];
        let state = derive(&[latest], false, &consultations);
        assert_eq!(state.current_state, CurrentState::TriageCompleted);
        assert_eq!(state.consultation_count, 1);
    }

    #[test]
    fn latest_triage_is_by_timestamp_not_position() {
        let older = triage_item(RiskLevel::Urgent, RecommendedAction::ErNow, 100);
        let newer = triage_item(RiskLevel::Low, RecommendedAction::SelfCare, 1);
        // Oldest first in the slice; latest must still win
        let state = derive(&[older, newer], false, &[]);
        assert_eq!(state.last_triage_risk, Some(RiskLevel::Low));
        assert_eq!(state.next_action, NextAction::SelfCare);
        assert_eq!(state.triage_count, 2);
    }

    #[test]
    fn resolution_rate_is_none_without_consultations() {
        let state = derive(&[], false, &[]);
        assert!(state.resolution_rate.is_none());
    }

    #[test]
    fn resolution_rate_rounds_to_whole_percent() {
        let consultations = vec![
            unrelated_consultation(ConsultationStatus::Completed),
            unrelated_consultation(ConsultationStatus::Completed),
            unrelated_consultation(ConsultationStatus::Scheduled),
        ];
        let state = derive(&[], false, &consultations);
        // 2 of 3 → 66.67 → 67
        assert_eq!(state.resolution_rate, Some(67));
    }

    #[test]
    fn resolution_rate_bounds() {
        let none_done = vec![unrelated_consultation(ConsultationStatus::Cancelled)];
        assert_eq!(derive(&[], false, &none_done).resolution_rate, Some(0));

        let all_done = vec![
            unrelated_consultation(ConsultationStatus::Completed),
            unrelated_consultation(ConsultationStatus::Completed),
        ];
        assert_eq!(derive(&[], false, &all_done).resolution_rate, Some(100));
    }

    #[test]
    fn derivation_is_total() {
        // Sweep the input space shape: {no record, record} x {idle, in
        // progress} x {none, active, completed, cancelled} references.
        let latest = triage_item(RiskLevel::Medium, RecommendedAction::Doctor24h, 2);
        let reference_sets: Vec<Vec<Consultation>> = vec![
            vec![],
            vec![consultation_referencing(&latest, ConsultationStatus::Scheduled)],
            vec![consultation_referencing(&latest, ConsultationStatus::Completed)],
            vec![consultation_referencing(&latest, ConsultationStatus::NoShow)],
        ];
        for history in [vec![], vec![latest.clone()]] {
            for in_progress in [false, true] {
                for consultations in &reference_sets {
                    let state = derive(&history, in_progress, consultations);
                    // One of the five states, always
                    assert!(matches!(
                        state.current_state,
                        CurrentState::NoTriage
                            | CurrentState::TriageInProgress
                            | CurrentState::TriageCompleted
                            | CurrentState::ConsultationBooked
                            | CurrentState::ConsultationCompleted
                    ));
                    if let Some(rate) = state.resolution_rate {
                        assert!(rate <= 100);
                    }
                }
            }
        }
    }

    #[test]
    fn server_payload_deserializes() {
        let json = r#"{
            "current_state": "triage_completed",
            "last_triage_risk": "HIGH",
            "last_triage_action": "DOCTOR_NOW",
            "next_action": "book_consultation",
            "next_action_deadline": "today",
            "urgency": "high",
            "triage_count": 3,
            "consultation_count": 1,
            "resolution_rate": 100
        }"#;
        let state: PatientState = serde_json::from_str(json).unwrap();
        assert_eq!(state.current_state, CurrentState::TriageCompleted);
        assert_eq!(state.next_action_deadline, Some(ActionDeadline::Today));
        assert_eq!(state.resolution_rate, Some(100));
    }

    #[test]
    fn server_payload_with_nulls_deserializes() {
        let json = r#"{
            "current_state": "no_triage",
            "next_action": "start_triage",
            "triage_count": 0,
            "consultation_count": 0
        }"#;
        let state: PatientState = serde_json::from_str(json).unwrap();
        assert_eq!(state.current_state, CurrentState::NoTriage);
        assert!(state.last_triage_risk.is_none());
        assert!(state.resolution_rate.is_none());
    }
}
