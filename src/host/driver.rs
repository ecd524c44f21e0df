//! Tick driver with statum state machine
//!
//! Drives [`Gamepads::update`] from a tokio interval. Many hosts only expose
//! devices after the first input, so the driver first probes at a slow rate
//! and switches to the per-frame rate once a device shows up.
//!
//! # State Machine
//!
//! ```text
//! Probing ──(first device polled)──► Running ──(shutdown)──► done
//!    │
//!    └──(shutdown)──► done
//! ```
//!
//! Stopping is external: cancel the [`CancellationToken`] and the driver
//! returns after the current tick.

use crate::gamepads::{Gamepads, UpdateOutcome};
use crate::host::enumerator::DeviceEnumerator;
use crate::host::notifier::NotificationSink;
use serde::{Deserialize, Serialize};
use statum::{machine, state};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Enumerator type the driver works with
pub type DynGamepads = Gamepads<Box<dyn DeviceEnumerator>>;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct DriverSettings {
    /// Poll interval while waiting for the first device
    pub probe_interval_ms: u64,

    /// Update interval once a device is connected, ~60 Hz by default
    pub tick_interval_ms: u64,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            probe_interval_ms: 100,
            tick_interval_ms: 16,
        }
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum DriverState {
    Probing, // Waiting for the first device
    Running, // Updating every tick
}

#[machine]
pub struct TickDriver<S: DriverState> {
    gamepads: DynGamepads,
    sink: Box<dyn NotificationSink>,
    settings: DriverSettings,
    shutdown: CancellationToken,
    ticks: u64,
}

impl<S: DriverState> TickDriver<S> {
    pub fn gamepads(&self) -> &DynGamepads {
        &self.gamepads
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// Updates run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl TickDriver<Probing> {
    pub fn create(
        gamepads: DynGamepads,
        sink: Box<dyn NotificationSink>,
        settings: DriverSettings,
        shutdown: CancellationToken,
    ) -> Self {
        debug!("Creating tick driver with settings: {:?}", settings);
        Self::new(gamepads, sink, settings, shutdown, 0)
    }

    /// Polls every probe interval until a device shows up
    ///
    /// Returns `None` when shut down before any device appeared.
    pub async fn wait_for_device(self) -> Option<TickDriver<Running>> {
        info!(
            "Probing for gamepads every {}ms",
            self.settings.probe_interval_ms
        );
        let mut probe = interval(Duration::from_millis(self.settings.probe_interval_ms.max(1)));
        probe.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let found = loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break false,
                _ = probe.tick() => {
                    // Reads a frame from the host like a tick does but commits
                    // nothing. Native notifications stay queued for `update`.
                    let devices = self.gamepads.poll();
                    if !devices.is_empty() {
                        info!("Found {} gamepad(s), starting updates", devices.len());
                        break true;
                    }
                }
            }
        };

        if found {
            Some(self.transition())
        } else {
            info!("Shutdown requested while probing");
            None
        }
    }
}

impl TickDriver<Running> {
    /// Runs a single update
    pub fn tick(&mut self) -> UpdateOutcome {
        let outcome = self.gamepads.update(self.sink.as_mut());
        if let UpdateOutcome::Updated { notifications, .. } = outcome {
            self.ticks += 1;
            if notifications > 0 {
                debug!(
                    "Tick {} delivered {} notification(s)",
                    self.ticks, notifications
                );
            }
        }
        outcome
    }

    /// Updates every tick interval until shutdown, returns the tick count
    pub async fn run_until_shutdown(mut self) -> u64 {
        info!(
            "Starting update loop every {}ms",
            self.settings.tick_interval_ms
        );
        let mut ticker = interval(Duration::from_millis(self.settings.tick_interval_ms.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        info!("Update loop stopped after {} ticks", self.ticks);
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::RawDeviceSnapshot;
    use crate::host::enumerator::ScriptedEnumerator;
    use crate::host::platform::PlatformIdentity;
    use crate::mapping::GamepadsConfig;
    use crate::tracker::{ConnectionEvent, ConnectionKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fast() -> DriverSettings {
        DriverSettings {
            probe_interval_ms: 1,
            tick_interval_ms: 1,
        }
    }

    fn driver(
        enumerator: ScriptedEnumerator,
        shutdown: CancellationToken,
    ) -> (TickDriver<Probing>, Rc<RefCell<Vec<ConnectionEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink_events = Rc::clone(&events);
        let sink = move |event: &ConnectionEvent| sink_events.borrow_mut().push(event.clone());

        let gamepads = Gamepads::new(
            Box::new(enumerator) as Box<dyn DeviceEnumerator>,
            GamepadsConfig::default(),
            PlatformIdentity::native(),
        );
        (
            TickDriver::create(gamepads, Box::new(sink), fast(), shutdown),
            events,
        )
    }

    #[tokio::test]
    async fn probing_waits_for_first_device() {
        let mut enumerator = ScriptedEnumerator::new();
        enumerator.push_devices(Vec::new());
        enumerator.push_devices(Vec::new());
        enumerator.push_devices([RawDeviceSnapshot::new(0, "79-6-N64")]);
        let (probing, events) = driver(enumerator, CancellationToken::new());

        let mut running = probing.wait_for_device().await.expect("device found");
        // All three frames were read while probing but none was committed,
        // the first tick sees the repeated last frame
        assert!(events.borrow().is_empty());
        assert!(running.gamepads().state(0).is_none());
        assert_eq!(running.ticks(), 0);

        running.tick();
        assert_eq!(running.ticks(), 1);
        assert_eq!(
            events
                .borrow()
                .iter()
                .map(|event| event.kind)
                .collect::<Vec<_>>(),
            vec![ConnectionKind::Connected]
        );
        assert!(running.gamepads().state(0).is_some());
    }

    #[tokio::test]
    async fn shutdown_stops_probing() {
        let shutdown = CancellationToken::new();
        let (probing, _) = driver(ScriptedEnumerator::new(), shutdown.clone());
        shutdown.cancel();

        assert!(probing.wait_for_device().await.is_none());
    }

    #[tokio::test]
    async fn run_loop_stops_on_shutdown() {
        let mut enumerator = ScriptedEnumerator::new();
        enumerator.push_devices([RawDeviceSnapshot::new(0, "79-6-N64")]);
        let shutdown = CancellationToken::new();
        let (probing, events) = driver(enumerator, shutdown.clone());

        let running = probing.wait_for_device().await.expect("device found");
        let canceller = shutdown.clone();
        let stop = async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        };
        let (ticks, _) = tokio::join!(running.run_until_shutdown(), stop);

        assert!(ticks >= 1);
        // Scripted device stays connected, so exactly one notification
        assert_eq!(events.borrow().len(), 1);
    }
}
