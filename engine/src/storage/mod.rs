//! Storage layer: the key-value record store port, its in-memory and
//! JSON-file implementations, and the persisted schema with its
//! parse-and-validate boundary.

pub mod json_file;
pub mod memory;
pub mod schema;
pub mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::{RecordStore, StoreError};
