//! Raw snapshot to standard layout conversion
//!
//! ```text
//! RawDeviceSnapshot ──► dead zone ──► positional layout ──► catalog remap
//!                       (buttons,     (raw order)          (non-standard
//!                        axes)                              devices only)
//! ```

use crate::gamepad::{
    CanonicalButton, DeviceState, MappingHint, RawButton, RawDeviceSnapshot, VendorIdentity,
    AXIS_COUNT, BUTTON_COUNT,
};
use crate::host::platform::{PlatformIdentity, RuntimeIdentity};
use crate::mapping::catalog::{MappingCatalog, MappingEntry};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dead-zone thresholds
///
/// Unknown keys in the config section are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadsConfig {
    /// Button values below this never count as pressed
    pub button_threshold: f64,

    /// Axis magnitudes below this are reported as 0
    pub axis_threshold: f64,
}

impl Default for GamepadsConfig {
    fn default() -> Self {
        Self {
            button_threshold: 0.15,
            axis_threshold: 0.15,
        }
    }
}

/// Applies an axis dead zone, sign and magnitude pass through otherwise
pub fn apply_axis_deadzone(value: f64, threshold: f64) -> f64 {
    if !value.is_finite() || value.abs() < threshold {
        0.0
    } else {
        value
    }
}

/// Converts a raw button into a canonical one, dropping presses below the
/// threshold. The value itself is never clamped.
pub fn apply_button_deadzone(button: RawButton, threshold: f64) -> CanonicalButton {
    let (pressed, value) = match button {
        // Bare floats come from hosts predating the pressed flag
        RawButton::Value(value) => (value == 1.0, value),
        RawButton::State { pressed, value } => (pressed, value),
    };
    let value = if value.is_finite() { value } else { 0.0 };

    if pressed && value.abs() < threshold {
        return CanonicalButton::new(false, value);
    }
    CanonicalButton::new(pressed, value)
}

/// Turns raw snapshots into [`DeviceState`]s
///
/// Holds everything normalization depends on, so the result only depends on
/// the snapshot and identity passed in.
#[derive(Debug, Clone)]
pub struct DeviceNormalizer {
    config: GamepadsConfig,
    catalog: MappingCatalog,
    platform: PlatformIdentity,
}

impl DeviceNormalizer {
    pub fn new(
        config: GamepadsConfig,
        catalog: MappingCatalog,
        platform: PlatformIdentity,
    ) -> Self {
        Self {
            config,
            catalog,
            platform,
        }
    }

    pub fn config(&self) -> &GamepadsConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MappingCatalog {
        &self.catalog
    }

    pub fn platform(&self) -> &dyn RuntimeIdentity {
        &self.platform
    }

    pub fn normalize(&self, raw: &RawDeviceSnapshot, identity: &VendorIdentity) -> DeviceState {
        let buttons: Vec<CanonicalButton> = raw
            .buttons
            .iter()
            .map(|button| apply_button_deadzone(*button, self.config.button_threshold))
            .collect();
        let axes: Vec<f64> = raw
            .axes
            .iter()
            .map(|axis| apply_axis_deadzone(*axis, self.config.axis_threshold))
            .collect();

        let mut state = DeviceState {
            slot: raw.slot,
            id: raw.id.clone(),
            identity: identity.clone(),
            mapping: raw.mapping.clone(),
            remapped: false,
            buttons: positional(&buttons, CanonicalButton::RELEASED),
            axes: positional(&axes, 0.0),
            timestamp: raw.timestamp.unwrap_or_default(),
        };

        if raw.mapping.is_standard() {
            return state;
        }

        match self.catalog.find_match(identity, &self.platform) {
            Some(entry) => {
                debug!(
                    "Remapping slot {} ({}) with catalog entry '{}'",
                    raw.slot, identity, entry.name
                );
                state.buttons = remap_buttons(entry, &buttons);
                state.axes = remap_axes(entry, &axes);
                state.remapped = true;
                state.mapping = MappingHint::Standard;
            }
            None => {
                debug!(
                    "No catalog entry for slot {} ({}) on {}/{}, keeping raw order",
                    raw.slot,
                    identity,
                    self.platform.engine(),
                    self.platform.runtime()
                );
            }
        }

        state
    }
}

// Copies raw controls in order, padding missing ones with `neutral`
fn positional<T: Copy, const N: usize>(values: &[T], neutral: T) -> [T; N] {
    std::array::from_fn(|idx| values.get(idx).copied().unwrap_or(neutral))
}

fn remap_buttons(
    entry: &MappingEntry,
    buttons: &[CanonicalButton],
) -> [CanonicalButton; BUTTON_COUNT] {
    std::array::from_fn(|idx| {
        entry
            .button_source(idx)
            .and_then(|source| buttons.get(source).copied())
            .unwrap_or(CanonicalButton::RELEASED)
    })
}

fn remap_axes(entry: &MappingEntry, axes: &[f64]) -> [f64; AXIS_COUNT] {
    std::array::from_fn(|idx| {
        entry
            .axis_source(idx)
            .and_then(|source| axes.get(source).copied())
            .unwrap_or(0.0)
    })
}
