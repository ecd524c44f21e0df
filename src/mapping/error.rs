//! Error definitions for the mapping module

use thiserror::Error;

/// Errors raised while building a mapping catalog
///
/// Only user supplied entries can fail; the built-in table is static.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Button order does not cover the standard layout
    #[error("Mapping '{name}' lists {got} buttons, expected {expected}")]
    ButtonCount {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Axis order does not cover the standard layout
    #[error("Mapping '{name}' lists {got} axes, expected {expected}")]
    AxisCount {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Order value below -1
    #[error("Mapping '{name}' has invalid source index {index}")]
    InvalidIndex { name: String, index: i16 },

    /// Entry without vendor or product id never matches anything
    #[error("Mapping '{0}' is missing a vendor or product id")]
    MissingIdentity(String),
}
