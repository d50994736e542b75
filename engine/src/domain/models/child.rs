use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::Gender;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::growth::GrowthRecord;
use super::vaccination::OverrideStatus;

/// Domain model for one tracked child.
///
/// Owns the ordered growth record list and the manual vaccine status
/// overrides. Everything else shown about a child (age, BMI, vaccine states,
/// reference curves) is derived on read and never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub birth_weight_kg: Option<f64>,
    /// Kept sorted ascending by date after every mutation.
    pub growth_records: Vec<GrowthRecord>,
    /// vaccine id -> manual override. Absence means the state is derived.
    pub vaccine_overrides: BTreeMap<String, OverrideStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Child {
    /// Generate a unique child id. Ids are never reused or reassigned.
    pub fn generate_id() -> String {
        format!("child::{}", Uuid::new_v4())
    }

    /// Record a manual override for a vaccine. The only way a vaccine ever
    /// becomes Completed or Missed.
    pub fn set_vaccine_override(&mut self, vaccine_id: &str, status: OverrideStatus) {
        self.vaccine_overrides
            .insert(vaccine_id.to_string(), status);
    }

    /// Clear a manual override, returning the vaccine to its derived state.
    pub fn clear_vaccine_override(&mut self, vaccine_id: &str) {
        self.vaccine_overrides.remove(vaccine_id);
    }
}
