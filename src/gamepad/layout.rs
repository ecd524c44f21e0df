//! Standard gamepad layout
//!
//! Every device is presented through the same 17 buttons and 4 axes, in the
//! order below, whatever the physical controller actually has.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const BUTTON_COUNT: usize = 17;
pub const AXIS_COUNT: usize = 4;

// Standard buttons, discriminant is the canonical index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardButton {
    // Face buttons
    Face1,
    Face2,
    Face3,
    Face4,

    // Shoulder buttons
    LeftShoulder1,
    RightShoulder1,
    LeftShoulder2,
    RightShoulder2,

    // Other buttons
    Select,
    Start,
    LeftStickButton,
    RightStickButton,

    // D Pad
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,

    // Vendor-specific button
    Vendor,
}

// Standard axes, discriminant is the canonical index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

impl StandardButton {
    pub const ALL: [StandardButton; BUTTON_COUNT] = [
        StandardButton::Face1,
        StandardButton::Face2,
        StandardButton::Face3,
        StandardButton::Face4,
        StandardButton::LeftShoulder1,
        StandardButton::RightShoulder1,
        StandardButton::LeftShoulder2,
        StandardButton::RightShoulder2,
        StandardButton::Select,
        StandardButton::Start,
        StandardButton::LeftStickButton,
        StandardButton::RightStickButton,
        StandardButton::DPadUp,
        StandardButton::DPadDown,
        StandardButton::DPadLeft,
        StandardButton::DPadRight,
        StandardButton::Vendor,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Name as used by the standard mapping tables
    pub fn name(self) -> &'static str {
        match self {
            StandardButton::Face1 => "FACE_1",
            StandardButton::Face2 => "FACE_2",
            StandardButton::Face3 => "FACE_3",
            StandardButton::Face4 => "FACE_4",
            StandardButton::LeftShoulder1 => "L_SHOULDER_1",
            StandardButton::RightShoulder1 => "R_SHOULDER_1",
            StandardButton::LeftShoulder2 => "L_SHOULDER_2",
            StandardButton::RightShoulder2 => "R_SHOULDER_2",
            StandardButton::Select => "SELECT",
            StandardButton::Start => "START",
            StandardButton::LeftStickButton => "L_STICK_BUTTON",
            StandardButton::RightStickButton => "R_STICK_BUTTON",
            StandardButton::DPadUp => "DPAD_UP",
            StandardButton::DPadDown => "DPAD_DOWN",
            StandardButton::DPadLeft => "DPAD_LEFT",
            StandardButton::DPadRight => "DPAD_RIGHT",
            StandardButton::Vendor => "VENDOR",
        }
    }
}

impl StandardAxis {
    pub const ALL: [StandardAxis; AXIS_COUNT] = [
        StandardAxis::LeftStickX,
        StandardAxis::LeftStickY,
        StandardAxis::RightStickX,
        StandardAxis::RightStickY,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            StandardAxis::LeftStickX => "L_STICK_X",
            StandardAxis::LeftStickY => "L_STICK_Y",
            StandardAxis::RightStickX => "R_STICK_X",
            StandardAxis::RightStickY => "R_STICK_Y",
        }
    }
}

impl fmt::Display for StandardButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for StandardAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
