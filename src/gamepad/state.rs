//! Normalized device state in the standard layout

use super::identity::VendorIdentity;
use super::layout::{StandardAxis, StandardButton, AXIS_COUNT, BUTTON_COUNT};
use super::raw::MappingHint;
use serde::{Deserialize, Serialize};

/// Button after dead-zone filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalButton {
    pub pressed: bool,
    pub value: f64,
}

impl CanonicalButton {
    pub const RELEASED: CanonicalButton = CanonicalButton {
        pressed: false,
        value: 0.0,
    };

    pub fn new(pressed: bool, value: f64) -> Self {
        Self { pressed, value }
    }
}

/// One device as seen by consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub slot: usize,

    /// Identifier string as reported by the host
    pub id: String,

    pub identity: VendorIdentity,

    /// `Standard` once a catalog entry has been applied
    pub mapping: MappingHint,

    /// Whether a catalog entry reordered the raw controls
    pub remapped: bool,

    pub buttons: [CanonicalButton; BUTTON_COUNT],
    pub axes: [f64; AXIS_COUNT],

    /// Milliseconds, host supplied or taken from the fallback clock
    pub timestamp: f64,
}

impl DeviceState {
    pub fn button(&self, button: StandardButton) -> CanonicalButton {
        self.buttons[button.index()]
    }

    pub fn axis(&self, axis: StandardAxis) -> f64 {
        self.axes[axis.index()]
    }

    pub fn is_pressed(&self, button: StandardButton) -> bool {
        self.button(button).pressed
    }

    /// Buttons paired with their standard names
    pub fn named_buttons(&self) -> impl Iterator<Item = (StandardButton, CanonicalButton)> + '_ {
        StandardButton::ALL
            .iter()
            .map(move |button| (*button, self.button(*button)))
    }

    /// Axes paired with their standard names
    pub fn named_axes(&self) -> impl Iterator<Item = (StandardAxis, f64)> + '_ {
        StandardAxis::ALL
            .iter()
            .map(move |axis| (*axis, self.axis(*axis)))
    }
}
