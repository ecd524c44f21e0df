//! Raw device reports as handed over by the host enumeration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mapping reported by the host for a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MappingHint {
    /// Device already follows the standard layout
    Standard,
    /// Anything else the host reports, usually an empty string
    Other(String),
    #[default]
    Unknown,
}

impl MappingHint {
    pub fn is_standard(&self) -> bool {
        matches!(self, MappingHint::Standard)
    }
}

impl From<&str> for MappingHint {
    fn from(value: &str) -> Self {
        match value {
            "standard" => MappingHint::Standard,
            "" => MappingHint::Unknown,
            other => MappingHint::Other(other.to_string()),
        }
    }
}

impl From<String> for MappingHint {
    fn from(value: String) -> Self {
        MappingHint::from(value.as_str())
    }
}

impl From<MappingHint> for String {
    fn from(value: MappingHint) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MappingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingHint::Standard => f.write_str("standard"),
            MappingHint::Other(other) => f.write_str(other),
            MappingHint::Unknown => Ok(()),
        }
    }
}

/// One button as reported by the host
///
/// Older hosts report a bare float, newer ones a pressed flag plus value.
/// Missing fields are neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawButton {
    Value(f64),
    State {
        #[serde(default)]
        pressed: bool,
        #[serde(default)]
        value: f64,
    },
}

impl Default for RawButton {
    fn default() -> Self {
        RawButton::State {
            pressed: false,
            value: 0.0,
        }
    }
}

/// Snapshot of one enumerated device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDeviceSnapshot {
    /// Host enumeration index, stable while the device stays connected
    pub slot: usize,

    /// Free-form identifier, e.g. `45e-28e-Xbox 360 Wired Controller`
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub mapping: MappingHint,

    /// Host timestamp in milliseconds, if the host has one
    #[serde(default)]
    pub timestamp: Option<f64>,

    #[serde(default)]
    pub buttons: Vec<RawButton>,

    #[serde(default)]
    pub axes: Vec<f64>,
}

impl RawDeviceSnapshot {
    pub fn new(slot: usize, id: impl Into<String>) -> Self {
        Self {
            slot,
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_mapping(mut self, mapping: impl Into<MappingHint>) -> Self {
        self.mapping = mapping.into();
        self
    }

    pub fn with_buttons(mut self, buttons: impl IntoIterator<Item = RawButton>) -> Self {
        self.buttons = buttons.into_iter().collect();
        self
    }

    pub fn with_axes(mut self, axes: impl IntoIterator<Item = f64>) -> Self {
        self.axes = axes.into_iter().collect();
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
