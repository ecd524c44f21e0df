//! Native host enumeration through gilrs

use crate::gamepad::{MappingHint, RawButton, RawDeviceSnapshot};
use crate::host::enumerator::DeviceEnumerator;
use crate::tracker::ConnectionKind;
use gilrs::{Axis, Button, Event, EventType, Gamepad, Gilrs, MappingSource};
use tracing::{debug, error, info};

// Buttons in standard layout order
const BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

// Axes in standard layout order
const AXES: [Axis; 4] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
];

#[derive(Debug, thiserror::Error)]
pub enum EnumeratorError {
    #[error("Failed to initialize gilrs: {0}")]
    InitializationError(String),
}

/// Enumerates gamepads known to gilrs
///
/// Gamepads gilrs maps itself (SDL database or driver) are reported as
/// standard. Unmapped ones keep their raw order so catalog entries can apply.
pub struct GilrsEnumerator {
    gilrs: Gilrs,
    native: Vec<(usize, ConnectionKind)>,
}

impl GilrsEnumerator {
    pub fn new() -> Result<Self, EnumeratorError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(EnumeratorError::InitializationError(e.to_string()));
            }
        };

        for (id, gamepad) in gilrs.gamepads() {
            info!(
                "  [{}] Name: {}, UUID: {:?}, mapping: {:?}",
                id,
                gamepad.name(),
                gamepad.uuid(),
                gamepad.mapping_source()
            );
        }

        Ok(Self {
            gilrs,
            native: Vec::new(),
        })
    }

    // Drains pending gilrs events so gamepad state is current
    fn pump_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            let slot = usize::from(id);
            match event {
                EventType::Connected => {
                    debug!("gilrs reports slot {} connected", slot);
                    self.native.push((slot, ConnectionKind::Connected));
                }
                EventType::Disconnected => {
                    debug!("gilrs reports slot {} disconnected", slot);
                    self.native.push((slot, ConnectionKind::Disconnected));
                }
                _ => {}
            }
        }
    }
}

impl DeviceEnumerator for GilrsEnumerator {
    fn snapshots(&mut self) -> Vec<Option<RawDeviceSnapshot>> {
        self.pump_events();

        let mut frame: Vec<Option<RawDeviceSnapshot>> = Vec::new();
        for (id, gamepad) in self.gilrs.gamepads() {
            let slot = usize::from(id);
            if frame.len() <= slot {
                frame.resize(slot + 1, None);
            }
            frame[slot] = Some(snapshot(slot, &gamepad));
        }
        frame
    }

    fn native_events(&mut self) -> Vec<(usize, ConnectionKind)> {
        std::mem::take(&mut self.native)
    }
}

// Identifier in the dash separated `vvvv-pppp-Name` shape
fn identifier(gamepad: &Gamepad<'_>) -> String {
    match (gamepad.vendor_id(), gamepad.product_id()) {
        (Some(vendor), Some(product)) => {
            format!("{:04x}-{:04x}-{}", vendor, product, gamepad.name())
        }
        _ => gamepad.name().to_string(),
    }
}

fn snapshot(slot: usize, gamepad: &Gamepad<'_>) -> RawDeviceSnapshot {
    let mapping = if gamepad.mapping_source() == MappingSource::None {
        MappingHint::Unknown
    } else {
        MappingHint::Standard
    };

    let buttons = BUTTONS.iter().map(|button| match gamepad.button_data(*button) {
        Some(data) => RawButton::State {
            pressed: data.is_pressed(),
            value: f64::from(data.value()),
        },
        None => RawButton::default(),
    });

    let axes = AXES.iter().map(|axis| {
        let value = gamepad
            .axis_data(*axis)
            .map(|data| f64::from(data.value()))
            .unwrap_or_default();
        // gilrs reports up as positive, the standard layout as negative
        match axis {
            Axis::LeftStickY | Axis::RightStickY => -value,
            _ => value,
        }
    });

    RawDeviceSnapshot::new(slot, identifier(gamepad))
        .with_mapping(mapping)
        .with_buttons(buttons)
        .with_axes(axes)
}
