//! Batch seeding of the document store.
//!
//! - `SeedKind`, `BatchRecord`: what is loaded and how keys are derived
//! - `source`: reading records from a local JSON file
//! - `BatchLoader`: sequential, size-bounded merge commits
//!
//! A failed batch aborts the load. There is no resume; rerun the whole file.

pub mod batch;
pub mod record;
pub mod source;

pub use batch::{BatchLoader, LoadReport};
pub use record::{BatchRecord, SeedKind};
pub use source::{read_records, records_from_value};
