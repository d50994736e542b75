//! Vaccine status derivation.
//!
//! A vaccine's state is a function of the fixed schedule, the child's birth
//! date and the manual overrides; it is recomputed on every read. Only an
//! explicit user action moves a vaccine into Completed or Missed, and only an
//! explicit reset moves it back out.

use chrono::{Duration, NaiveDate};
use shared::{VaccineCard, VaccineState, VaccineSummary};

use super::models::{Child, OverrideStatus, VaccinationScheduleEntry};
use super::reference_data;

/// A resolved vaccine status: the state plus the due date it was derived
/// from. `due_date` is absent when no birth date was available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaccineStatus {
    pub state: VaccineState,
    pub due_date: Option<NaiveDate>,
}

/// Due date for a schedule entry given a birth date.
pub fn due_date(entry: &VaccinationScheduleEntry, dob: NaiveDate) -> NaiveDate {
    dob + Duration::weeks(entry.age_in_weeks as i64)
}

/// Resolve the status of one vaccine.
///
/// Precedence: a manual override always wins; without one the due date is
/// compared date-only against `today`: future means Upcoming, today-or-past
/// means Pending. A vaccine is never auto-promoted to Missed. A missing
/// birth date conservatively yields Upcoming with no due date, so malformed
/// data is never flagged as overdue.
pub fn resolve(
    entry: &VaccinationScheduleEntry,
    dob: Option<NaiveDate>,
    override_status: Option<OverrideStatus>,
    today: NaiveDate,
) -> VaccineStatus {
    let due = dob.map(|dob| due_date(entry, dob));

    if let Some(status) = override_status {
        let state = match status {
            OverrideStatus::Completed => VaccineState::Completed,
            OverrideStatus::Missed => VaccineState::Missed,
        };
        return VaccineStatus { state, due_date: due };
    }

    let state = match due {
        Some(due) if due > today => VaccineState::Upcoming,
        Some(_) => VaccineState::Pending,
        None => VaccineState::Upcoming,
    };
    VaccineStatus { state, due_date: due }
}

/// Resolve one vaccine for a child.
pub fn status_for_child(
    entry: &VaccinationScheduleEntry,
    child: &Child,
    today: NaiveDate,
) -> VaccineStatus {
    resolve(
        entry,
        Some(child.date_of_birth),
        child.vaccine_overrides.get(&entry.id).copied(),
        today,
    )
}

/// The full schedule resolved against one child, in schedule order.
pub fn vaccine_cards(child: &Child, today: NaiveDate) -> Vec<VaccineCard> {
    reference_data::vaccination_schedule()
        .iter()
        .map(|entry| {
            let status = status_for_child(entry, child, today);
            VaccineCard {
                vaccine_id: entry.id.clone(),
                name: entry.name.clone(),
                age_description: entry.age_description.clone(),
                state: status.state,
                due_date: status.due_date,
            }
        })
        .collect()
}

/// Per-state counts across the child's schedule, derived on read.
pub fn summary(child: &Child, today: NaiveDate) -> VaccineSummary {
    let mut counts = VaccineSummary::default();
    for card in vaccine_cards(child, today) {
        match card.state {
            VaccineState::Completed => counts.completed += 1,
            VaccineState::Upcoming => counts.upcoming += 1,
            VaccineState::Pending => counts.pending += 1,
            VaccineState::Missed => counts.missed += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(weeks: u32) -> VaccinationScheduleEntry {
        VaccinationScheduleEntry {
            id: "test".to_string(),
            name: "Test Vaccine".to_string(),
            age_in_weeks: weeks,
            age_description: format!("{weeks} weeks"),
        }
    }

    fn child(dob: NaiveDate) -> Child {
        let now = chrono::Utc::now();
        Child {
            id: Child::generate_id(),
            name: "Test".to_string(),
            date_of_birth: dob,
            gender: shared::Gender::Female,
            birth_weight_kg: None,
            growth_records: Vec::new(),
            vaccine_overrides: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn past_due_without_override_is_pending() {
        // ageInWeeks=6, dob=2024-01-01 => due 2024-02-12; today is later.
        let status = resolve(&entry(6), Some(d(2024, 1, 1)), None, d(2024, 2, 20));
        assert_eq!(status.due_date, Some(d(2024, 2, 12)));
        assert_eq!(status.state, VaccineState::Pending);
    }

    #[test]
    fn future_due_is_upcoming() {
        let status = resolve(&entry(6), Some(d(2024, 1, 1)), None, d(2024, 2, 1));
        assert_eq!(status.state, VaccineState::Upcoming);
    }

    #[test]
    fn due_today_is_pending() {
        let status = resolve(&entry(6), Some(d(2024, 1, 1)), None, d(2024, 2, 12));
        assert_eq!(status.state, VaccineState::Pending);
    }

    #[test]
    fn override_wins_regardless_of_due_date() {
        let completed = resolve(
            &entry(6),
            Some(d(2024, 1, 1)),
            Some(OverrideStatus::Completed),
            d(2024, 1, 2),
        );
        assert_eq!(completed.state, VaccineState::Completed);

        let missed = resolve(
            &entry(6),
            Some(d(2024, 1, 1)),
            Some(OverrideStatus::Missed),
            d(2030, 1, 1),
        );
        assert_eq!(missed.state, VaccineState::Missed);
    }

    #[test]
    fn missing_dob_is_upcoming_with_no_due_date() {
        let status = resolve(&entry(6), None, None, d(2024, 2, 20));
        assert_eq!(status.state, VaccineState::Upcoming);
        assert_eq!(status.due_date, None);
    }

    #[test]
    fn cards_cover_the_whole_schedule_and_reset_restores_derivation() {
        let mut child = child(d(2024, 1, 1));
        let today = d(2024, 2, 20);

        let cards = vaccine_cards(&child, today);
        assert_eq!(cards.len(), reference_data::vaccination_schedule().len());

        child.set_vaccine_override("dtp-1", OverrideStatus::Completed);
        let entry = reference_data::schedule_entry("dtp-1").unwrap();
        assert_eq!(
            status_for_child(entry, &child, today).state,
            VaccineState::Completed
        );

        child.clear_vaccine_override("dtp-1");
        assert_eq!(
            status_for_child(entry, &child, today).state,
            VaccineState::Pending
        );
    }

    #[test]
    fn summary_counts_every_state_once() {
        let mut child = child(d(2024, 1, 1));
        let today = d(2024, 2, 20);
        child.set_vaccine_override("bcg", OverrideStatus::Completed);
        child.set_vaccine_override("hepb-1", OverrideStatus::Missed);

        let counts = summary(&child, today);
        let total = reference_data::vaccination_schedule().len();
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.missed, 1);
        assert_eq!(
            counts.completed + counts.upcoming + counts.pending + counts.missed,
            total
        );
    }
}
