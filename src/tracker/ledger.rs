//! Per-slot record of connection notifications already delivered

use super::ConnectionKind;
use std::collections::{HashMap, HashSet};

/// Which connection kinds have been seen for each slot's current occupancy
///
/// Recording a kind clears the opposite one: a `Disconnected` ends the
/// occupancy so the next `Connected` fires again, and vice versa.
#[derive(Debug, Clone, Default)]
pub struct SeenEventsLedger {
    seen: HashMap<usize, HashSet<ConnectionKind>>,
}

impl SeenEventsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, slot: usize, kind: ConnectionKind) -> bool {
        self.seen
            .get(&slot)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Records `kind` for `slot`, returns false if it was already recorded
    pub fn record(&mut self, slot: usize, kind: ConnectionKind) -> bool {
        let kinds = self.seen.entry(slot).or_default();
        kinds.remove(&kind.opposite());
        kinds.insert(kind)
    }
}
