//! Domain layer: models, derived-value computation, and the services that
//! mutate child records through the storage port.

pub mod age;
pub mod analysis_service;
pub mod child_service;
pub mod commands;
pub mod growth_reference;
pub mod growth_service;
pub mod markdown;
pub mod models;
pub mod reference_data;
pub mod vaccination_service;
