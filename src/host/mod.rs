//! Host boundary: where snapshots come from, where notifications go, and
//! what drives the ticks

pub mod clock;
pub mod driver;
pub mod enumerator;
pub mod gilrs_enumerator;
pub mod notifier;
pub mod platform;

pub use clock::{Clock, MonotonicClock};
pub use driver::{DriverSettings, DynGamepads, Probing, Running, TickDriver};
pub use enumerator::{DeviceEnumerator, ScriptedEnumerator};
pub use gilrs_enumerator::{EnumeratorError, GilrsEnumerator};
pub use notifier::{LoggingNotifier, NotificationSink};
pub use platform::{PlatformIdentity, PlatformOverride, RuntimeIdentity};
