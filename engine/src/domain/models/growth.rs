use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated height/weight observation.
///
/// Either measurement may be absent; incomplete records are accepted and
/// filtered out at read time (plotting, BMI) rather than rejected on entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub date: NaiveDate,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

impl GrowthRecord {
    /// True when both measurements are present, i.e. the record can feed a
    /// BMI computation.
    pub fn is_complete(&self) -> bool {
        self.height_cm.is_some() && self.weight_kg.is_some()
    }
}
