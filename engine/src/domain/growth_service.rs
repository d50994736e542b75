//! Per-child growth record operations: sorted insert, BMI derivation and the
//! chart series that overlays actual measurements on the reference curves.

use chrono::NaiveDate;
use log::debug;
use shared::{BmiCategory, BmiReading, GrowthChartPoint, GrowthRecordView};

use super::age;
use super::growth_reference;
use super::models::{Child, GrowthRecord};

/// BMI below this is categorized Underweight. Illustrative constant, not a
/// clinical cutoff.
pub const BMI_UNDERWEIGHT_BELOW: f64 = 14.0;
/// BMI above this is categorized Overweight. Illustrative constant, not a
/// clinical cutoff.
pub const BMI_OVERWEIGHT_ABOVE: f64 = 18.0;

/// Insert a growth observation, keeping the list sorted ascending by date.
///
/// The list is de-duplicated by date: measuring again on an already recorded
/// date updates that record, with supplied measurements overwriting and
/// absent ones leaving the existing value in place. Records with neither
/// measurement are accepted; filtering happens at read time.
pub fn add_record(child: &mut Child, record: GrowthRecord) {
    if let Some(existing) = child
        .growth_records
        .iter_mut()
        .find(|r| r.date == record.date)
    {
        debug!("Merging growth record for existing date {}", record.date);
        if record.height_cm.is_some() {
            existing.height_cm = record.height_cm;
        }
        if record.weight_kg.is_some() {
            existing.weight_kg = record.weight_kg;
        }
    } else {
        child.growth_records.push(record);
    }
    child.growth_records.sort_by_key(|r| r.date);
}

/// Compute BMI from a complete record. kg divided by height in metres
/// squared.
fn bmi_of(record: &GrowthRecord) -> Option<f64> {
    let height_m = record.height_cm? / 100.0;
    let weight_kg = record.weight_kg?;
    if height_m <= 0.0 {
        return None;
    }
    Some(weight_kg / (height_m * height_m))
}

/// Categorize a BMI value against the illustrative thresholds.
pub fn categorize_bmi(bmi: f64) -> BmiCategory {
    if bmi < BMI_UNDERWEIGHT_BELOW {
        BmiCategory::Underweight
    } else if bmi > BMI_OVERWEIGHT_ABOVE {
        BmiCategory::Overweight
    } else {
        BmiCategory::Healthy
    }
}

/// Latest BMI for a child: the most recent record carrying both
/// measurements. Records with only one measurement are skipped even when
/// they are newer.
pub fn latest_bmi(child: &Child) -> Option<BmiReading> {
    child
        .growth_records
        .iter()
        .rev()
        .filter(|record| record.is_complete())
        .find_map(|record| {
            let bmi = bmi_of(record)?;
            Some(BmiReading {
                date: record.date,
                bmi,
                category: categorize_bmi(bmi),
            })
        })
}

/// True when the record falls on or after the child's birth date. Records
/// implying a negative age stay in storage but are excluded from every
/// derived view.
fn is_valid_for_charting(record: &GrowthRecord, dob: NaiveDate) -> bool {
    record.date >= dob
}

/// Chart series for a child: one point per valid record, annotated with the
/// reference curve at that record's age. Lazy and restartable: each call
/// returns a fresh iterator over the current record list.
pub fn chart_series(child: &Child) -> impl Iterator<Item = GrowthChartPoint> + '_ {
    let dob = child.date_of_birth;
    let gender = child.gender;
    child
        .growth_records
        .iter()
        .filter(move |record| is_valid_for_charting(record, dob))
        .map(move |record| {
            let age_months = age::age_on(Some(dob), Some(record.date)).total_months;
            GrowthChartPoint {
                date: record.date,
                age_months,
                height_cm: record.height_cm,
                weight_kg: record.weight_kg,
                reference: growth_reference::reference_curve(gender, age_months),
            }
        })
}

/// The record list as boundary views, in stored (ascending) order.
pub fn record_views(child: &Child) -> Vec<GrowthRecordView> {
    child
        .growth_records
        .iter()
        .map(|record| GrowthRecordView {
            date: record.date,
            height_cm: record.height_cm,
            weight_kg: record.weight_kg,
        })
        .collect()
}
