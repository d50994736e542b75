pub mod child;
pub mod growth;
pub mod vaccination;

pub use child::Child;
pub use growth::GrowthRecord;
pub use vaccination::{OverrideStatus, VaccinationScheduleEntry};
