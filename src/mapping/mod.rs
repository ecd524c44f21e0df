//! Mapping of raw device reports onto the standard layout
//!
//! The [`catalog`] holds curated per-device reorderings, the [`normalizer`]
//! applies dead zones and, for non-standard devices, the matching entry.

pub mod catalog;
pub mod error;
pub mod normalizer;

pub use catalog::{MappingCatalog, MappingEntry, MappingEntryConfig, ABSENT};
pub use error::CatalogError;
pub use normalizer::{apply_axis_deadzone, apply_button_deadzone, DeviceNormalizer, GamepadsConfig};
