//! # Health Tracker Engine
//!
//! Pure-logic core of the child health tracker: child profiles with growth
//! and vaccination records, derived views (age, BMI, vaccine status, growth
//! reference curves), key-value persistence with defensive parsing, a change
//! notification bus, and the markdown-subset renderer used for analysis
//! reports.
//!
//! All derived values are recomputed from the stored record on every read;
//! nothing derived is ever persisted as a source of truth.

pub mod domain;
pub mod events;
pub mod storage;
