//! Request shapes for the mutating child-service operations. Dates arrive as
//! strings from the edge and are parsed inside the service; measurements are
//! already numeric by the time they get here.

use serde::{Deserialize, Serialize};
use shared::Gender;

/// Input for creating a child. Name and a parseable `YYYY-MM-DD` birth date
/// are required; a supplied birth weight seeds the first growth record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChildRequest {
    pub name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub birth_weight_kg: Option<f64>,
}

/// Input for recording a growth observation for one child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddGrowthRecordRequest {
    pub child_id: String,
    pub date: String,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}
