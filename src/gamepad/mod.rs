//! Device data model
//!
//! ```text
//! RawDeviceSnapshot ──► VendorIdentity ──► DeviceState
//!  (host report)        (parsed id)       (standard layout)
//! ```

pub mod identity;
pub mod layout;
pub mod raw;
pub mod state;

pub use identity::{parse_vendor_product, strip_leading_zeros, VendorIdentity};
pub use layout::{StandardAxis, StandardButton, AXIS_COUNT, BUTTON_COUNT};
pub use raw::{MappingHint, RawButton, RawDeviceSnapshot};
pub use state::{CanonicalButton, DeviceState};
