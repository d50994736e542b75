use serde::{Deserialize, Serialize};

/// Manual vaccine status entered by the user. These are the only two states
/// ever persisted; Upcoming and Pending are always derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverrideStatus {
    Completed,
    Missed,
}

impl OverrideStatus {
    /// Parse a persisted override value. Anything other than the two legal
    /// states is treated as absent so the status falls back to derivation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Completed" => Some(OverrideStatus::Completed),
            "Missed" => Some(OverrideStatus::Missed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideStatus::Completed => "Completed",
            OverrideStatus::Missed => "Missed",
        }
    }
}

/// One entry of the fixed vaccination schedule: which vaccine is due at what
/// age. Immutable reference data, shared read-only by all children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationScheduleEntry {
    pub id: String,
    pub name: String,
    pub age_in_weeks: u32,
    pub age_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_only_the_two_persistable_states() {
        assert_eq!(OverrideStatus::parse("Completed"), Some(OverrideStatus::Completed));
        assert_eq!(OverrideStatus::parse("Missed"), Some(OverrideStatus::Missed));
        assert_eq!(OverrideStatus::parse("Pending"), None);
        assert_eq!(OverrideStatus::parse("Upcoming"), None);
        assert_eq!(OverrideStatus::parse("completed"), None);
        assert_eq!(OverrideStatus::parse(""), None);
    }
}
