//! Persisted schema for the child collection and the parse-and-validate
//! boundary between raw store payloads and typed domain models.
//!
//! The store value is a JSON object carrying at least a `children` array.
//! Unrelated sibling keys written by other dashboards are preserved verbatim
//! on save. Dates and measurements are persisted as strings (the external
//! schema); parsing to typed values happens here and nothing unparsed leaks
//! past this module.

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::Gender;
use std::collections::BTreeMap;

use crate::domain::models::{Child, GrowthRecord, OverrideStatus};
use super::traits::StoreError;

/// Fixed store key for the child collection.
pub const STORE_KEY: &str = "health-tracker.children";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredGrowthRecord {
    date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height_cm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight_kg: Option<String>,
}

/// Storage shape of one child, string-typed where the external schema is.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChild {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    date_of_birth: String,
    #[serde(default)]
    gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    birth_weight_kg: Option<f64>,
    #[serde(default)]
    growth_records: Vec<StoredGrowthRecord>,
    #[serde(default)]
    vaccine_overrides: BTreeMap<String, String>,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Accept both plain dates and timestamps, keeping only the date part so
/// derived values can never depend on a time-of-day component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

fn parse_gender(raw: &str) -> Option<Gender> {
    match raw {
        "Male" => Some(Gender::Male),
        "Female" => Some(Gender::Female),
        _ => None,
    }
}

impl StoredChild {
    fn into_domain(self) -> Result<Child, StoreError> {
        if self.id.is_empty() {
            return Err(StoreError::InvalidEntry("missing id".to_string()));
        }
        let date_of_birth = parse_date(&self.date_of_birth).ok_or_else(|| {
            StoreError::InvalidEntry(format!(
                "unparseable date of birth {:?} for {}",
                self.date_of_birth, self.id
            ))
        })?;
        let gender = parse_gender(&self.gender).ok_or_else(|| {
            StoreError::InvalidEntry(format!(
                "unknown gender {:?} for {}",
                self.gender, self.id
            ))
        })?;

        let mut growth_records = Vec::new();
        for stored in self.growth_records {
            match parse_date(&stored.date) {
                Some(date) => growth_records.push(GrowthRecord {
                    date,
                    height_cm: stored.height_cm.as_deref().and_then(|v| v.parse().ok()),
                    weight_kg: stored.weight_kg.as_deref().and_then(|v| v.parse().ok()),
                }),
                None => {
                    warn!(
                        "Dropping growth record with unparseable date {:?} for {}",
                        stored.date, self.id
                    );
                }
            }
        }
        growth_records.sort_by_key(|r| r.date);

        // Only the two persistable override states survive parsing; anything
        // else falls back to derivation.
        let vaccine_overrides = self
            .vaccine_overrides
            .into_iter()
            .filter_map(|(vaccine_id, raw)| {
                OverrideStatus::parse(&raw).map(|status| (vaccine_id, status))
            })
            .collect();

        Ok(Child {
            id: self.id,
            name: self.name,
            date_of_birth,
            gender,
            birth_weight_kg: self.birth_weight_kg,
            growth_records,
            vaccine_overrides,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }

    fn from_domain(child: &Child) -> Self {
        Self {
            id: child.id.clone(),
            name: child.name.clone(),
            date_of_birth: child.date_of_birth.format(DATE_FORMAT).to_string(),
            gender: child.gender.to_string(),
            birth_weight_kg: child.birth_weight_kg,
            growth_records: child
                .growth_records
                .iter()
                .map(|r| StoredGrowthRecord {
                    date: r.date.format(DATE_FORMAT).to_string(),
                    height_cm: r.height_cm.map(|v| v.to_string()),
                    weight_kg: r.weight_kg.map(|v| v.to_string()),
                })
                .collect(),
            vaccine_overrides: child
                .vaccine_overrides
                .iter()
                .map(|(id, status)| (id.clone(), status.as_str().to_string()))
                .collect(),
            created_at: child.created_at.to_rfc3339(),
            updated_at: child.updated_at.to_rfc3339(),
        }
    }
}

/// Decoded store value.
#[derive(Debug, Default, PartialEq)]
pub struct DecodedCollection {
    pub children: Vec<Child>,
    pub active_child_id: Option<String>,
}

/// Decode a raw store value into typed children.
///
/// Recovers to an empty collection on malformed JSON (with a logged
/// diagnostic) and filters out individually malformed entries instead of
/// failing the whole load.
pub fn decode_collection(raw: &str) -> DecodedCollection {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Malformed store payload, recovering to empty collection: {}", e);
            return DecodedCollection::default();
        }
    };

    let mut decoded = DecodedCollection {
        active_child_id: value
            .get("active_child_id")
            .and_then(Value::as_str)
            .map(str::to_string),
        ..DecodedCollection::default()
    };

    let entries = match value.get("children").and_then(Value::as_array) {
        Some(entries) => entries,
        None => {
            warn!("Store payload has no children array, treating as empty");
            return decoded;
        }
    };

    for entry in entries {
        let stored: StoredChild = match serde_json::from_value(entry.clone()) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Skipping malformed child entry: {}", e);
                continue;
            }
        };
        match stored.into_domain() {
            Ok(child) => decoded.children.push(child),
            Err(e) => warn!("Skipping invalid child entry: {}", e),
        }
    }
    decoded
}

/// Encode the collection into the store value, merging over whatever was
/// already persisted so unrelated sibling keys written by other dashboards
/// are never clobbered.
pub fn encode_collection(
    existing_raw: Option<&str>,
    children: &[Child],
    active_child_id: Option<&str>,
) -> Result<String, StoreError> {
    let mut object = existing_raw
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_else(Map::new);

    let stored: Vec<StoredChild> = children.iter().map(StoredChild::from_domain).collect();
    object.insert("children".to_string(), serde_json::to_value(stored)?);
    match active_child_id {
        Some(id) => {
            object.insert("active_child_id".to_string(), Value::String(id.to_string()));
        }
        None => {
            object.remove("active_child_id");
        }
    }

    Ok(serde_json::to_string(&Value::Object(object))?)
}
