//! Fixed reference data: the vaccination schedule and the pathology/radiology
//! test catalog. Loaded once, read-only for the lifetime of the process.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::models::VaccinationScheduleEntry;

/// Category of a directory test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestCategory {
    Pathology,
    Radiology,
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestCategory::Pathology => write!(f, "Pathology"),
            TestCategory::Radiology => write!(f, "Radiology"),
        }
    }
}

/// One entry of the test directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCatalogEntry {
    pub id: String,
    pub name: String,
    pub category: TestCategory,
    pub description: String,
}

fn vaccine(id: &str, name: &str, age_in_weeks: u32, age_description: &str) -> VaccinationScheduleEntry {
    VaccinationScheduleEntry {
        id: id.to_string(),
        name: name.to_string(),
        age_in_weeks,
        age_description: age_description.to_string(),
    }
}

static VACCINATION_SCHEDULE: Lazy<Vec<VaccinationScheduleEntry>> = Lazy::new(|| {
    vec![
        vaccine("bcg", "BCG", 0, "At birth"),
        vaccine("hepb-1", "Hepatitis B (1st dose)", 0, "At birth"),
        vaccine("opv-0", "Oral Polio (birth dose)", 0, "At birth"),
        vaccine("dtp-1", "DTP (1st dose)", 6, "6 weeks"),
        vaccine("opv-1", "Oral Polio (1st dose)", 6, "6 weeks"),
        vaccine("pcv-1", "Pneumococcal (1st dose)", 6, "6 weeks"),
        vaccine("rota-1", "Rotavirus (1st dose)", 6, "6 weeks"),
        vaccine("dtp-2", "DTP (2nd dose)", 10, "10 weeks"),
        vaccine("opv-2", "Oral Polio (2nd dose)", 10, "10 weeks"),
        vaccine("pcv-2", "Pneumococcal (2nd dose)", 10, "10 weeks"),
        vaccine("dtp-3", "DTP (3rd dose)", 14, "14 weeks"),
        vaccine("opv-3", "Oral Polio (3rd dose)", 14, "14 weeks"),
        vaccine("pcv-3", "Pneumococcal (3rd dose)", 14, "14 weeks"),
        vaccine("measles-1", "Measles (1st dose)", 39, "9 months"),
        vaccine("mmr-1", "MMR (1st dose)", 52, "12 months"),
        vaccine("varicella-1", "Varicella (1st dose)", 65, "15 months"),
        vaccine("dtp-b1", "DTP booster", 78, "18 months"),
    ]
});

fn test(id: &str, name: &str, category: TestCategory, description: &str) -> TestCatalogEntry {
    TestCatalogEntry {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
    }
}

static TEST_CATALOG: Lazy<Vec<TestCatalogEntry>> = Lazy::new(|| {
    use TestCategory::{Pathology, Radiology};
    vec![
        test("cbc", "Complete Blood Count", Pathology, "Red/white cell and platelet counts"),
        test("lipid", "Lipid Profile", Pathology, "Cholesterol and triglyceride panel"),
        test("lft", "Liver Function Test", Pathology, "Liver enzyme and protein panel"),
        test("tsh", "Thyroid Profile", Pathology, "TSH, T3 and T4 levels"),
        test("hba1c", "HbA1c", Pathology, "Three-month average blood glucose"),
        test("urinalysis", "Urinalysis", Pathology, "Physical and chemical urine examination"),
        test("xray-chest", "Chest X-Ray", Radiology, "Plain radiograph of the chest"),
        test("usg-abdomen", "Ultrasound Abdomen", Radiology, "Abdominal organ ultrasound scan"),
        test("ct-chest", "CT Chest", Radiology, "Computed tomography of the chest"),
        test("mri-brain", "MRI Brain", Radiology, "Magnetic resonance imaging of the brain"),
        test("echo", "Echocardiogram", Radiology, "Ultrasound examination of the heart"),
    ]
});

/// The fixed vaccination schedule, ordered by due age.
pub fn vaccination_schedule() -> &'static [VaccinationScheduleEntry] {
    &VACCINATION_SCHEDULE
}

/// Look up one schedule entry by id.
pub fn schedule_entry(vaccine_id: &str) -> Option<&'static VaccinationScheduleEntry> {
    VACCINATION_SCHEDULE.iter().find(|e| e.id == vaccine_id)
}

/// The fixed pathology/radiology test directory.
pub fn test_catalog() -> &'static [TestCatalogEntry] {
    &TEST_CATALOG
}

/// Catalog entries restricted to one category.
pub fn tests_in_category(category: TestCategory) -> Vec<&'static TestCatalogEntry> {
    TEST_CATALOG.iter().filter(|t| t.category == category).collect()
}
