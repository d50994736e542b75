//! Child profile repository service.
//!
//! Holds the in-memory child collection, applies all mutations, and moves the
//! collection to and from the key-value store as explicit user-triggered
//! snapshots. Invalid user input never raises: the offending call is a logged
//! no-op, since every consumer of these results is a display surface.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use shared::{ChildSnapshot, GrowthChartPoint, VaccineSummary};
use std::sync::{Arc, Mutex};

use crate::events::{EventBus, DATA_CHANGED_EVENT};
use crate::storage::schema::{self, STORE_KEY};
use crate::storage::RecordStore;

use super::commands::{AddGrowthRecordRequest, NewChildRequest};
use super::models::{Child, GrowthRecord, OverrideStatus};
use super::{age, growth_service, reference_data, vaccination_service};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_NAME_LEN: usize = 100;

/// Service owning the in-memory child collection.
pub struct ChildService<S: RecordStore> {
    store: Arc<S>,
    events: EventBus,
    children: Mutex<Vec<Child>>,
    active_child_id: Mutex<Option<String>>,
}

impl<S: RecordStore> ChildService<S> {
    /// Create a service with an empty collection. Call [`load`] to pull the
    /// persisted state in.
    ///
    /// [`load`]: ChildService::load
    pub fn new(store: Arc<S>, events: EventBus) -> Self {
        Self {
            store,
            events,
            children: Mutex::new(Vec::new()),
            active_child_id: Mutex::new(None),
        }
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Never fails the caller: a missing key, an unreadable backend or a
    /// malformed payload all recover to an empty collection, and malformed
    /// individual entries are filtered during decoding. Returns the number of
    /// children loaded.
    pub fn load(&self) -> usize {
        let decoded = match self.store.read(STORE_KEY) {
            Ok(Some(raw)) => schema::decode_collection(&raw),
            Ok(None) => {
                debug!("No persisted collection yet, starting empty");
                Default::default()
            }
            Err(e) => {
                warn!("Store read failed, starting empty: {}", e);
                Default::default()
            }
        };

        // An active id pointing at a filtered-out child is dropped.
        let active = decoded
            .active_child_id
            .filter(|id| decoded.children.iter().any(|c| &c.id == id));

        let count = decoded.children.len();
        *self.children.lock().unwrap() = decoded.children;
        *self.active_child_id.lock().unwrap() = active;
        info!("Loaded {} children", count);
        count
    }

    /// Persist the full collection, merging over any unrelated sibling keys
    /// already in the store value, then notify observers.
    pub fn save(&self) -> Result<()> {
        let children = self.children.lock().unwrap().clone();
        let active = self.active_child_id.lock().unwrap().clone();

        let existing = match self.store.read(STORE_KEY) {
            Ok(existing) => existing,
            Err(e) => {
                // Nothing recoverable to merge with; write a fresh value.
                warn!("Could not read existing store value before save: {}", e);
                None
            }
        };
        let raw = schema::encode_collection(existing.as_deref(), &children, active.as_deref())
            .context("Failed to encode child collection")?;
        self.store
            .write(STORE_KEY, &raw)
            .context("Failed to write child collection")?;

        info!("Saved {} children", children.len());
        self.events.publish(DATA_CHANGED_EVENT);
        Ok(())
    }

    /// Create a child. Returns `None` (logged, not raised) when the name is
    /// empty or too long, or the birth date doesn't parse. A supplied birth
    /// weight seeds one growth record dated at birth.
    pub fn add_child(&self, request: NewChildRequest) -> Option<Child> {
        let name = request.name.trim();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            warn!("Rejecting child with invalid name");
            return None;
        }
        let date_of_birth = match NaiveDate::parse_from_str(&request.date_of_birth, DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                warn!("Rejecting child with unparseable birth date: {}", e);
                return None;
            }
        };

        let now = Utc::now();
        let mut child = Child {
            id: Child::generate_id(),
            name: name.to_string(),
            date_of_birth,
            gender: request.gender,
            birth_weight_kg: request.birth_weight_kg,
            growth_records: Vec::new(),
            vaccine_overrides: Default::default(),
            created_at: now,
            updated_at: now,
        };
        if let Some(weight) = request.birth_weight_kg {
            growth_service::add_record(
                &mut child,
                GrowthRecord {
                    date: date_of_birth,
                    height_cm: None,
                    weight_kg: Some(weight),
                },
            );
        }

        info!("Created child {} ({})", child.name, child.id);
        self.children.lock().unwrap().push(child.clone());
        Some(child)
    }

    /// Replace the stored child with a matching id. A no-op when the id is
    /// unknown or the replacement carries an invalid name.
    pub fn update_child(&self, mut child: Child) {
        let name = child.name.trim().to_string();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            warn!("Ignoring update with invalid name for {}", child.id);
            return;
        }
        child.name = name;

        let mut children = self.children.lock().unwrap();
        match children.iter_mut().find(|c| c.id == child.id) {
            Some(slot) => {
                child.updated_at = Utc::now();
                info!("Updated child {} ({})", child.name, child.id);
                *slot = child;
            }
            None => warn!("Ignoring update for unknown child {}", child.id),
        }
    }

    /// Delete a child by id; a no-op when absent. Removing the active child
    /// clears the selection.
    pub fn remove_child(&self, child_id: &str) {
        let mut children = self.children.lock().unwrap();
        let before = children.len();
        children.retain(|c| c.id != child_id);
        if children.len() < before {
            info!("Removed child {}", child_id);
            let mut active = self.active_child_id.lock().unwrap();
            if active.as_deref() == Some(child_id) {
                *active = None;
            }
        } else {
            warn!("Ignoring removal of unknown child {}", child_id);
        }
    }

    pub fn get_child(&self, child_id: &str) -> Option<Child> {
        self.children
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == child_id)
            .cloned()
    }

    /// All children, ordered by name.
    pub fn list_children(&self) -> Vec<Child> {
        let mut children = self.children.lock().unwrap().clone();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Select the active child. Returns false when the id is unknown.
    pub fn set_active_child(&self, child_id: &str) -> bool {
        if self.get_child(child_id).is_none() {
            warn!("Cannot activate unknown child {}", child_id);
            return false;
        }
        *self.active_child_id.lock().unwrap() = Some(child_id.to_string());
        true
    }

    pub fn get_active_child(&self) -> Option<Child> {
        let active = self.active_child_id.lock().unwrap().clone()?;
        self.get_child(&active)
    }

    /// Record a growth observation. Returns false (logged) when the date
    /// doesn't parse or the child is unknown.
    pub fn add_growth_record(&self, request: AddGrowthRecordRequest) -> bool {
        let date = match NaiveDate::parse_from_str(&request.date, DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                warn!("Rejecting growth record with unparseable date: {}", e);
                return false;
            }
        };

        let mut children = self.children.lock().unwrap();
        let child = match children.iter_mut().find(|c| c.id == request.child_id) {
            Some(child) => child,
            None => {
                warn!("Ignoring growth record for unknown child {}", request.child_id);
                return false;
            }
        };
        growth_service::add_record(
            child,
            GrowthRecord {
                date,
                height_cm: request.height_cm,
                weight_kg: request.weight_kg,
            },
        );
        child.updated_at = Utc::now();
        true
    }

    /// Record a manual vaccine override (the Pending/Upcoming to
    /// Completed/Missed transition). Returns false when the child or vaccine
    /// id is unknown.
    pub fn mark_vaccine(&self, child_id: &str, vaccine_id: &str, status: OverrideStatus) -> bool {
        if reference_data::schedule_entry(vaccine_id).is_none() {
            warn!("Ignoring mark for unknown vaccine {}", vaccine_id);
            return false;
        }
        let mut children = self.children.lock().unwrap();
        match children.iter_mut().find(|c| c.id == child_id) {
            Some(child) => {
                child.set_vaccine_override(vaccine_id, status);
                child.updated_at = Utc::now();
                true
            }
            None => {
                warn!("Ignoring vaccine mark for unknown child {}", child_id);
                false
            }
        }
    }

    /// Clear a manual override, returning the vaccine to its derived state.
    pub fn reset_vaccine(&self, child_id: &str, vaccine_id: &str) -> bool {
        let mut children = self.children.lock().unwrap();
        match children.iter_mut().find(|c| c.id == child_id) {
            Some(child) => {
                child.clear_vaccine_override(vaccine_id);
                child.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Chart points for one child's growth dashboard.
    pub fn chart_points(&self, child_id: &str) -> Option<Vec<GrowthChartPoint>> {
        let child = self.get_child(child_id)?;
        Some(growth_service::chart_series(&child).collect())
    }

    /// Per-state vaccine counts for one child as of `today`.
    pub fn vaccine_summary(&self, child_id: &str, today: NaiveDate) -> Option<VaccineSummary> {
        let child = self.get_child(child_id)?;
        Some(vaccination_service::summary(&child, today))
    }

    /// Read-only snapshot of one child's full record as of `today`, the
    /// shape handed to the analysis collaborator and to dashboards.
    pub fn snapshot(&self, child_id: &str, today: NaiveDate) -> Option<ChildSnapshot> {
        let child = self.get_child(child_id)?;
        Some(ChildSnapshot {
            id: child.id.clone(),
            name: child.name.clone(),
            gender: child.gender,
            date_of_birth: child.date_of_birth,
            birth_weight_kg: child.birth_weight_kg,
            age: age::age_on(Some(child.date_of_birth), Some(today)),
            records: growth_service::record_views(&child),
            vaccines: vaccination_service::vaccine_cards(&child, today),
            latest_bmi: growth_service::latest_bmi(&child),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use shared::{Gender, VaccineState};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup() -> ChildService<MemoryStore> {
        ChildService::new(Arc::new(MemoryStore::new()), EventBus::new())
    }

    fn new_child(name: &str, dob: &str) -> NewChildRequest {
        NewChildRequest {
            name: name.to_string(),
            date_of_birth: dob.to_string(),
            gender: Gender::Female,
            birth_weight_kg: None,
        }
    }

    #[test]
    fn add_trims_name_and_assigns_fresh_ids() {
        let service = setup();
        let a = service.add_child(new_child("  Ada  ", "2022-04-10")).unwrap();
        let b = service.add_child(new_child("Ada", "2022-04-10")).unwrap();

        assert_eq!(a.name, "Ada");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn invalid_input_is_a_silent_no_op() {
        let service = setup();
        assert!(service.add_child(new_child("  ", "2022-04-10")).is_none());
        assert!(service.add_child(new_child("Ada", "10/04/2022")).is_none());
        assert!(service
            .add_child(new_child(&"x".repeat(101), "2022-04-10"))
            .is_none());
        assert!(service.list_children().is_empty());
    }

    #[test]
    fn birth_weight_seeds_the_first_growth_record() {
        let service = setup();
        let child = service
            .add_child(NewChildRequest {
                name: "Ada".to_string(),
                date_of_birth: "2022-04-10".to_string(),
                gender: Gender::Female,
                birth_weight_kg: Some(3.2),
            })
            .unwrap();

        assert_eq!(child.growth_records.len(), 1);
        let seed = &child.growth_records[0];
        assert_eq!(seed.date, child.date_of_birth);
        assert_eq!(seed.weight_kg, Some(3.2));
        assert_eq!(seed.height_cm, None);
    }

    #[test]
    fn update_replaces_matching_id_and_ignores_unknown() {
        let service = setup();
        let mut child = service.add_child(new_child("Ada", "2022-04-10")).unwrap();
        child.name = "Ada L".to_string();
        service.update_child(child.clone());
        assert_eq!(service.get_child(&child.id).unwrap().name, "Ada L");

        let mut ghost = child.clone();
        ghost.id = "child::ghost".to_string();
        service.update_child(ghost);
        assert!(service.get_child("child::ghost").is_none());
        assert_eq!(service.list_children().len(), 1);
    }

    #[test]
    fn remove_is_a_no_op_for_unknown_ids() {
        let service = setup();
        let child = service.add_child(new_child("Ada", "2022-04-10")).unwrap();
        service.remove_child("child::ghost");
        assert_eq!(service.list_children().len(), 1);
        service.remove_child(&child.id);
        assert!(service.list_children().is_empty());
    }

    #[test]
    fn removing_the_active_child_clears_the_selection() {
        let service = setup();
        let child = service.add_child(new_child("Ada", "2022-04-10")).unwrap();
        assert!(service.set_active_child(&child.id));
        service.remove_child(&child.id);
        assert!(service.get_active_child().is_none());
    }

    #[test]
    fn list_is_ordered_by_name() {
        let service = setup();
        service.add_child(new_child("Zoe", "2021-02-01")).unwrap();
        service.add_child(new_child("Ada", "2022-04-10")).unwrap();
        let names: Vec<_> = service.list_children().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Ada", "Zoe"]);
    }

    #[test]
    fn save_then_load_round_trips_for_zero_one_and_many() {
        for count in [0usize, 1, 3] {
            let store = Arc::new(MemoryStore::new());
            let service = ChildService::new(store.clone(), EventBus::new());
            let mut ids = Vec::new();
            for i in 0..count {
                let child = service
                    .add_child(new_child(&format!("Child {i}"), "2022-04-10"))
                    .unwrap();
                ids.push(child.id);
            }
            service.save().unwrap();

            let reloaded = ChildService::new(store, EventBus::new());
            assert_eq!(reloaded.load(), count);
            for id in ids {
                assert!(reloaded.get_child(&id).is_some());
            }
        }
    }

    #[test]
    fn load_recovers_from_malformed_payload() {
        let store = Arc::new(MemoryStore::new());
        store.seed(STORE_KEY, "{not valid");
        let service = ChildService::new(store, EventBus::new());
        assert_eq!(service.load(), 0);
        assert!(service.list_children().is_empty());
    }

    #[test]
    fn save_preserves_sibling_keys_and_notifies() {
        let store = Arc::new(MemoryStore::new());
        store.seed(STORE_KEY, r#"{"theme":"dark"}"#);

        let events = EventBus::new();
        let notified = Arc::new(AtomicUsize::new(0));
        let notified_clone = notified.clone();
        events.subscribe(DATA_CHANGED_EVENT, move |_| {
            notified_clone.fetch_add(1, Ordering::SeqCst);
        });

        let service = ChildService::new(store.clone(), events);
        service.load();
        service.add_child(new_child("Ada", "2022-04-10")).unwrap();
        service.save().unwrap();

        assert_eq!(notified.load(Ordering::SeqCst), 1);
        let raw = store.read(STORE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["children"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn active_child_survives_save_and_load() {
        let store = Arc::new(MemoryStore::new());
        let service = ChildService::new(store.clone(), EventBus::new());
        let child = service.add_child(new_child("Ada", "2022-04-10")).unwrap();
        service.set_active_child(&child.id);
        service.save().unwrap();

        let reloaded = ChildService::new(store, EventBus::new());
        reloaded.load();
        assert_eq!(reloaded.get_active_child().unwrap().id, child.id);
    }

    #[test]
    fn growth_record_flow_through_the_service() {
        let service = setup();
        let child = service.add_child(new_child("Ada", "2022-04-10")).unwrap();

        assert!(service.add_growth_record(AddGrowthRecordRequest {
            child_id: child.id.clone(),
            date: "2022-10-10".to_string(),
            height_cm: Some(68.0),
            weight_kg: Some(7.8),
        }));
        assert!(!service.add_growth_record(AddGrowthRecordRequest {
            child_id: child.id.clone(),
            date: "bad date".to_string(),
            height_cm: Some(68.0),
            weight_kg: None,
        }));

        let points = service.chart_points(&child.id).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].age_months, 6);
    }

    #[test]
    fn vaccine_mark_and_reset_through_the_service() {
        let service = setup();
        let child = service.add_child(new_child("Ada", "2022-04-10")).unwrap();
        let today = NaiveDate::from_ymd_opt(2022, 8, 1).unwrap();

        assert!(service.mark_vaccine(&child.id, "dtp-1", OverrideStatus::Completed));
        assert!(!service.mark_vaccine(&child.id, "not-a-vaccine", OverrideStatus::Completed));

        let snapshot = service.snapshot(&child.id, today).unwrap();
        let dtp = snapshot
            .vaccines
            .iter()
            .find(|v| v.vaccine_id == "dtp-1")
            .unwrap();
        assert_eq!(dtp.state, VaccineState::Completed);

        assert!(service.reset_vaccine(&child.id, "dtp-1"));
        let snapshot = service.snapshot(&child.id, today).unwrap();
        let dtp = snapshot
            .vaccines
            .iter()
            .find(|v| v.vaccine_id == "dtp-1")
            .unwrap();
        // 6-week vaccine for an April birth is past due by August.
        assert_eq!(dtp.state, VaccineState::Pending);
    }

    #[test]
    fn snapshot_derives_age_and_summary_counts() {
        let service = setup();
        let child = service.add_child(new_child("Ada", "2022-04-10")).unwrap();
        let today = NaiveDate::from_ymd_opt(2023, 6, 20).unwrap();

        let snapshot = service.snapshot(&child.id, today).unwrap();
        assert_eq!(snapshot.age.years, 1);
        assert_eq!(snapshot.age.months, 2);
        assert_eq!(snapshot.age.total_months, 14);

        let summary = service.vaccine_summary(&child.id, today).unwrap();
        assert_eq!(summary.completed + summary.missed, 0);
        assert_eq!(
            summary.pending + summary.upcoming,
            reference_data::vaccination_schedule().len()
        );
    }
}
