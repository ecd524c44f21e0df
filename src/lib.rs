//! Gamepad normalization engine
//!
//! Polls raw device snapshots from the host, maps them onto the standard
//! 17 button / 4 axis layout and turns slot changes into deduplicated
//! `connected` / `disconnected` notifications.

pub mod config;
pub mod error;
pub mod gamepad;
pub mod gamepads;
pub mod host;
pub mod mapping;
pub mod tracker;

pub use config::{AppConfig, ConfigError};
pub use error::GamepadsError;
pub use gamepad::{DeviceState, RawDeviceSnapshot, StandardAxis, StandardButton};
pub use gamepads::{Gamepads, UpdateOutcome};
pub use mapping::{DeviceNormalizer, GamepadsConfig, MappingCatalog};
pub use tracker::{ConnectionEvent, ConnectionKind};
