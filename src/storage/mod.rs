pub mod atomic;
pub mod database;
pub mod manifest;

pub use atomic::{atomic_write, is_within, AtomicFile};
pub use database::{ComponentMetadata, SaveOutcome, SvgDatabase};
pub use manifest::ManifestStore;
