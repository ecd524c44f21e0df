//! Connection lifecycle tracking
//!
//! Per slot, every tick:
//!
//! ```text
//! Absent ──(slot in snapshot)──► Present ──(slot missing)──► Absent
//!                                  │  ▲
//!                                  └──┘ (still in snapshot)
//! ```
//!
//! Transitions are turned into `connected` / `disconnected` notifications,
//! at most once per occupancy, even when the host also delivers its own
//! native notifications for the same slot.

pub mod ledger;
pub mod store;

pub use ledger::SeenEventsLedger;
pub use store::{SlotChange, StateStore};

use crate::gamepad::DeviceState;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    Connected,
    Disconnected,
}

impl ConnectionKind {
    pub fn opposite(self) -> Self {
        match self {
            ConnectionKind::Connected => ConnectionKind::Disconnected,
            ConnectionKind::Disconnected => ConnectionKind::Connected,
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionKind::Connected => f.write_str("connected"),
            ConnectionKind::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// Notification handed to the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub kind: ConnectionKind,
    pub slot: usize,
    /// Last known state of the device: the new one on connect, the final
    /// one on disconnect
    pub state: DeviceState,
}

/// Turns slot changes into deduplicated connection events
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    ledger: SeenEventsLedger,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &SeenEventsLedger {
        &self.ledger
    }

    /// Records a notification the host delivered on its own
    ///
    /// Returns the event to dispatch when `kind` is new for the slot's
    /// occupancy. The polled detection then skips it.
    pub fn observe_native(
        &mut self,
        kind: ConnectionKind,
        state: DeviceState,
    ) -> Option<ConnectionEvent> {
        let slot = state.slot;

        if !self.ledger.record(slot, kind) {
            debug!("Native {} for slot {} already delivered", kind, slot);
            return None;
        }

        info!("Gamepad {} at slot {} (native): {}", kind, slot, state.id);
        Some(ConnectionEvent { kind, slot, state })
    }

    pub fn reconcile(&mut self, changes: Vec<SlotChange>) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();

        for change in changes {
            match change {
                SlotChange::Appeared(state) => {
                    self.emit(ConnectionKind::Connected, state, &mut events);
                }
                SlotChange::Removed(state) => {
                    self.emit(ConnectionKind::Disconnected, state, &mut events);
                }
                SlotChange::Replaced { old, new } => {
                    info!(
                        "Slot {} changed device within one tick: '{}' -> '{}'",
                        new.slot, old.id, new.id
                    );
                    self.emit(ConnectionKind::Disconnected, old, &mut events);
                    self.emit(ConnectionKind::Connected, new, &mut events);
                }
            }
        }

        events
    }

    fn emit(
        &mut self,
        kind: ConnectionKind,
        state: DeviceState,
        events: &mut Vec<ConnectionEvent>,
    ) {
        let slot = state.slot;

        if self.ledger.has_seen(slot, kind) {
            debug!("Suppressing duplicate {} for slot {}", kind, slot);
            return;
        }

        self.ledger.record(slot, kind);
        info!("Gamepad {} at slot {}: {}", kind, slot, state.id);
        events.push(ConnectionEvent { kind, slot, state });
    }
}
