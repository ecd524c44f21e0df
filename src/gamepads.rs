//! Gamepads context - polling, normalization and connection tracking
//!
//! One [`Gamepads`] instance owns everything a tick touches: the host
//! enumerator, the normalizer with its catalog and thresholds, the
//! two-generation state store and the seen-events ledger. Instances share
//! nothing, so several can run side by side.
//!
//! # Tick
//!
//! ```text
//! update()
//!   ├─ poll()          enumerator ─► parse ids ─► normalize
//!   ├─ native events   host notifications ─► ledger ─► notify
//!   ├─ commit          current generation rebuilt, previous kept
//!   ├─ diff            appeared / removed / replaced slots
//!   └─ notify          deduplicated connected / disconnected
//! ```
//!
//! `update` takes `&self`. A sink that calls back into `update` while a tick
//! is running gets [`UpdateOutcome::Skipped`] instead of corrupting the
//! generation swap.

use crate::gamepad::{parse_vendor_product, DeviceState, StandardButton};
use crate::host::clock::{Clock, MonotonicClock};
use crate::host::enumerator::DeviceEnumerator;
use crate::host::notifier::NotificationSink;
use crate::host::platform::PlatformIdentity;
use crate::mapping::{DeviceNormalizer, GamepadsConfig, MappingCatalog};
use crate::tracker::{ConnectionEvent, ConnectionKind, ConnectionTracker, StateStore};
use std::cell::{Cell, RefCell};
use tracing::{debug, info};

/// Result of one [`Gamepads::update`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated {
        /// Devices present after the tick
        devices: usize,
        /// Notifications handed to the sink
        notifications: usize,
    },
    /// Another update was already running
    Skipped,
}

// Resets the updating flag however the tick ends
struct UpdateGuard<'a>(&'a Cell<bool>);

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct Gamepads<E: DeviceEnumerator> {
    enumerator: RefCell<E>,
    normalizer: DeviceNormalizer,
    clock: Box<dyn Clock>,
    store: RefCell<StateStore>,
    tracker: RefCell<ConnectionTracker>,
    pending_native: RefCell<Vec<(usize, ConnectionKind)>>,
    updating: Cell<bool>,
}

impl<E: DeviceEnumerator> Gamepads<E> {
    /// Creates a context with the built-in catalog
    pub fn new(enumerator: E, config: GamepadsConfig, platform: PlatformIdentity) -> Self {
        Self::with_normalizer(
            enumerator,
            DeviceNormalizer::new(config, MappingCatalog::builtin(), platform),
        )
    }

    pub fn with_normalizer(enumerator: E, normalizer: DeviceNormalizer) -> Self {
        info!(
            "Initializing gamepads with thresholds button={} axis={} on {}/{}",
            normalizer.config().button_threshold,
            normalizer.config().axis_threshold,
            normalizer.platform().engine(),
            normalizer.platform().runtime()
        );

        Self {
            enumerator: RefCell::new(enumerator),
            normalizer,
            clock: Box::new(MonotonicClock::new()),
            store: RefCell::new(StateStore::new()),
            tracker: RefCell::new(ConnectionTracker::new()),
            pending_native: RefCell::new(Vec::new()),
            updating: Cell::new(false),
        }
    }

    /// Replaces the fallback clock used for snapshots without a timestamp
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &GamepadsConfig {
        self.normalizer.config()
    }

    /// Reads the host snapshots and normalizes them, without touching the
    /// stored generations
    pub fn poll(&self) -> Vec<DeviceState> {
        let snapshots = self.enumerator.borrow_mut().snapshots();

        snapshots
            .into_iter()
            .flatten()
            .map(|raw| {
                let identity = parse_vendor_product(&raw.id);
                let mut state = self.normalizer.normalize(&raw, &identity);
                // Hosts report 0 or nothing when they have no timing
                if !raw.timestamp.is_some_and(|timestamp| timestamp > 0.0) {
                    state.timestamp = self.clock.now_ms();
                }
                state
            })
            .collect()
    }

    /// Runs one tick and hands the resulting notifications to `sink`
    ///
    /// A call made while another update is in progress does nothing.
    pub fn update<S>(&self, sink: &mut S) -> UpdateOutcome
    where
        S: NotificationSink + ?Sized,
    {
        if self.updating.replace(true) {
            debug!("Update already in progress, skipping");
            return UpdateOutcome::Skipped;
        }
        let _guard = UpdateGuard(&self.updating);

        let states = self.poll();
        let mut native = self.pending_native.take();
        native.extend(self.enumerator.borrow_mut().native_events());

        // Borrows end before the sink runs so it may read state
        let (devices, events) = {
            let mut tracker = self.tracker.borrow_mut();
            let mut store = self.store.borrow_mut();
            let mut events: Vec<ConnectionEvent> = Vec::new();

            for (slot, kind) in native {
                match native_state(&store, &states, slot, kind) {
                    Some(state) => events.extend(tracker.observe_native(kind, state)),
                    None => debug!(
                        "No state known for native {} at slot {}, left to polling",
                        kind, slot
                    ),
                }
            }

            store.begin_tick();
            for state in states {
                store.commit(state);
            }
            let changes = store.diff();
            events.extend(tracker.reconcile(changes));
            (store.current_generation().len(), events)
        };

        for event in &events {
            sink.notify(event);
        }

        UpdateOutcome::Updated {
            devices,
            notifications: events.len(),
        }
    }

    /// Queues a notification the host delivered itself
    ///
    /// The next `update` dispatches it unless the slot's occupancy already
    /// produced that kind, and the polled detection does not repeat it.
    pub fn record_native_event(&self, slot: usize, kind: ConnectionKind) {
        self.pending_native.borrow_mut().push((slot, kind));
    }

    pub fn is_updating(&self) -> bool {
        self.updating.get()
    }

    /// State of `slot` after the last tick
    pub fn state(&self, slot: usize) -> Option<DeviceState> {
        self.store.borrow().current(slot).cloned()
    }

    /// State of `slot` one tick earlier
    pub fn previous_state(&self, slot: usize) -> Option<DeviceState> {
        self.store.borrow().previous(slot).cloned()
    }

    /// All devices present after the last tick, in slot order
    pub fn states(&self) -> Vec<DeviceState> {
        self.store
            .borrow()
            .current_generation()
            .values()
            .cloned()
            .collect()
    }

    pub fn connected_slots(&self) -> Vec<usize> {
        self.store.borrow().slots().collect()
    }

    /// Whether `button` went down during the last tick
    pub fn was_pressed(&self, slot: usize, button: StandardButton) -> bool {
        let store = self.store.borrow();
        let now = store
            .current(slot)
            .is_some_and(|state| state.is_pressed(button));
        let before = store
            .previous(slot)
            .is_some_and(|state| state.is_pressed(button));
        now && !before
    }

    /// Whether the ledger holds `kind` for the slot's current occupancy
    pub fn has_seen_event(&self, slot: usize, kind: ConnectionKind) -> bool {
        self.tracker.borrow().ledger().has_seen(slot, kind)
    }
}

// Connect reports the fresh state, disconnect the last committed one
fn native_state(
    store: &StateStore,
    polled: &[DeviceState],
    slot: usize,
    kind: ConnectionKind,
) -> Option<DeviceState> {
    let fresh = || polled.iter().find(|state| state.slot == slot).cloned();
    let committed = || store.current(slot).cloned();

    match kind {
        ConnectionKind::Connected => fresh().or_else(committed),
        ConnectionKind::Disconnected => committed().or_else(fresh),
    }
}
