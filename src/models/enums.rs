use crate::models::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Serde goes through `as_str`/`from_str` so the serialized form is
/// always the exact wire string, never the Rust variant name.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(Role {
    Patient => "patient",
    Doctor => "doctor",
    Admin => "admin",
    Support => "support",
    CorporateAdmin => "corporate_admin",
    // Legacy accounts predating the patient/doctor split. Must keep
    // round-tripping byte-for-byte; the API still issues it.
    Cliente => "cliente",
});

str_enum!(RiskLevel {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
    Urgent => "URGENT",
});

str_enum!(RecommendedAction {
    SelfCare => "SELF_CARE",
    Doctor24h => "DOCTOR_24H",
    DoctorNow => "DOCTOR_NOW",
    ErNow => "ER_NOW",
});

str_enum!(ConsultationStatus {
    Requested => "requested",
    Scheduled => "scheduled",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no_show",
});

str_enum!(PaymentStatus {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

str_enum!(Specialty {
    GeneralPractice => "general_practice",
    Pediatrics => "pediatrics",
    Cardiology => "cardiology",
    Dermatology => "dermatology",
    Gynecology => "gynecology",
    Psychiatry => "psychiatry",
    Psychology => "psychology",
    Nutrition => "nutrition",
});

str_enum!(CurrentState {
    NoTriage => "no_triage",
    TriageInProgress => "triage_in_progress",
    TriageCompleted => "triage_completed",
    ConsultationBooked => "consultation_booked",
    ConsultationCompleted => "consultation_completed",
});

str_enum!(NextAction {
    StartTriage => "start_triage",
    ContinueTriage => "continue_triage",
    BookConsultation => "book_consultation",
    GoToEr => "go_to_er",
    SelfCare => "self_care",
    None => "none",
});

str_enum!(Urgency {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

str_enum!(ActionDeadline {
    Today => "today",
    Within24h => "within_24h",
    Whenever => "whenever",
});

str_enum!(ChatRole {
    User => "user",
    Assistant => "assistant",
});

impl ConsultationStatus {
    /// Terminal states: the consultation will not progress further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trip() {
        for (variant, s) in [
            (Role::Patient, "patient"),
            (Role::Doctor, "doctor"),
            (Role::Admin, "admin"),
            (Role::Support, "support"),
            (Role::CorporateAdmin, "corporate_admin"),
            (Role::Cliente, "cliente"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Role::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn risk_level_round_trip() {
        for (variant, s) in [
            (RiskLevel::Low, "LOW"),
            (RiskLevel::Medium, "MEDIUM"),
            (RiskLevel::High, "HIGH"),
            (RiskLevel::Urgent, "URGENT"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(RiskLevel::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn recommended_action_round_trip() {
        for (variant, s) in [
            (RecommendedAction::SelfCare, "SELF_CARE"),
            (RecommendedAction::Doctor24h, "DOCTOR_24H"),
            (RecommendedAction::DoctorNow, "DOCTOR_NOW"),
            (RecommendedAction::ErNow, "ER_NOW"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(RecommendedAction::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn consultation_status_round_trip() {
        for (variant, s) in [
            (ConsultationStatus::Requested, "requested"),
            (ConsultationStatus::Scheduled, "scheduled"),
            (ConsultationStatus::InProgress, "in_progress"),
            (ConsultationStatus::Completed, "completed"),
            (ConsultationStatus::Cancelled, "cancelled"),
            (ConsultationStatus::NoShow, "no_show"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ConsultationStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(ConsultationStatus::Completed.is_terminal());
        assert!(ConsultationStatus::Cancelled.is_terminal());
        assert!(ConsultationStatus::NoShow.is_terminal());
        assert!(!ConsultationStatus::Requested.is_terminal());
        assert!(!ConsultationStatus::Scheduled.is_terminal());
        assert!(!ConsultationStatus::InProgress.is_terminal());
    }

    #[test]
    fn serde_uses_wire_strings_not_variant_names() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
        assert_eq!(
            serde_json::to_string(&RecommendedAction::DoctorNow).unwrap(),
            "\"DOCTOR_NOW\""
        );
        assert_eq!(
            serde_json::to_string(&ConsultationStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&Specialty::GeneralPractice).unwrap(),
            "\"general_practice\""
        );
    }

    #[test]
    fn serde_deserializes_wire_strings() {
        let risk: RiskLevel = serde_json::from_str("\"URGENT\"").unwrap();
        assert_eq!(risk, RiskLevel::Urgent);
        let state: CurrentState = serde_json::from_str("\"triage_in_progress\"").unwrap();
        assert_eq!(state, CurrentState::TriageInProgress);
    }

    #[test]
    fn serde_rejects_unknown_wire_strings() {
        assert!(serde_json::from_str::<RiskLevel>("\"high\"").is_err());
        assert!(serde_json::from_str::<RecommendedAction>("\"CALL_911\"").is_err());
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Role::from_str("invalid").is_err());
        assert!(RiskLevel::from_str("low").is_err(), "risk levels are uppercase on the wire");
        assert!(Specialty::from_str("").is_err());
    }

    #[test]
    fn invalid_enum_error_names_field_and_value() {
        let err = RiskLevel::from_str("SEVERE").unwrap_err();
        match err {
            ModelError::InvalidEnum { field, value } => {
                assert_eq!(field, "RiskLevel");
                assert_eq!(value, "SEVERE");
            }
        }
    }
}
