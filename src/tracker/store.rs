//! Two-generation per-slot device store

use crate::gamepad::DeviceState;
use std::collections::BTreeMap;
use tracing::debug;

/// Slot level difference between the previous and current generation
#[derive(Debug, Clone, PartialEq)]
pub enum SlotChange {
    /// Slot absent last tick, present now
    Appeared(DeviceState),
    /// Slot present last tick, absent now
    Removed(DeviceState),
    /// Slot present in both ticks but held by a different device
    Replaced { old: DeviceState, new: DeviceState },
}

impl SlotChange {
    pub fn slot(&self) -> usize {
        match self {
            SlotChange::Appeared(state) | SlotChange::Removed(state) => state.slot,
            SlotChange::Replaced { new, .. } => new.slot,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StateStore {
    previous: BTreeMap<usize, DeviceState>,
    current: BTreeMap<usize, DeviceState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a tick: the current generation becomes the previous one and
    /// the current generation is rebuilt from the commits that follow
    pub fn begin_tick(&mut self) {
        self.previous = std::mem::take(&mut self.current);
    }

    pub fn commit(&mut self, state: DeviceState) {
        if let Some(replaced) = self.current.insert(state.slot, state) {
            debug!("Slot {} committed twice in one tick", replaced.slot);
        }
    }

    /// Changes between the previous and current generation, in slot order
    pub fn diff(&self) -> Vec<SlotChange> {
        let mut changes = Vec::new();

        for (slot, previous) in &self.previous {
            match self.current.get(slot) {
                None => changes.push(SlotChange::Removed(previous.clone())),
                Some(current) if current.id != previous.id => {
                    changes.push(SlotChange::Replaced {
                        old: previous.clone(),
                        new: current.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        for (slot, current) in &self.current {
            if !self.previous.contains_key(slot) {
                changes.push(SlotChange::Appeared(current.clone()));
            }
        }

        changes.sort_by_key(SlotChange::slot);
        changes
    }

    pub fn current(&self, slot: usize) -> Option<&DeviceState> {
        self.current.get(&slot)
    }

    pub fn previous(&self, slot: usize) -> Option<&DeviceState> {
        self.previous.get(&slot)
    }

    pub fn current_generation(&self) -> &BTreeMap<usize, DeviceState> {
        &self.current
    }

    pub fn previous_generation(&self) -> &BTreeMap<usize, DeviceState> {
        &self.previous
    }

    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.current.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::{CanonicalButton, MappingHint, VendorIdentity};

    fn device(slot: usize, id: &str) -> DeviceState {
        DeviceState {
            slot,
            id: id.to_string(),
            identity: VendorIdentity::parse(id),
            mapping: MappingHint::Unknown,
            remapped: false,
            buttons: [CanonicalButton::RELEASED; 17],
            axes: [0.0; 4],
            timestamp: 0.0,
        }
    }

    #[test]
    fn first_tick_reports_appearances() {
        let mut store = StateStore::new();
        store.begin_tick();
        store.commit(device(1, "a"));
        store.commit(device(0, "b"));

        assert_eq!(
            store.diff(),
            vec![
                SlotChange::Appeared(device(0, "b")),
                SlotChange::Appeared(device(1, "a")),
            ]
        );
    }

    #[test]
    fn steady_slots_produce_no_changes() {
        let mut store = StateStore::new();
        store.begin_tick();
        store.commit(device(0, "a"));
        store.begin_tick();
        store.commit(device(0, "a"));

        assert!(store.diff().is_empty());
        assert_eq!(store.previous(0), Some(&device(0, "a")));
    }

    #[test]
    fn missing_slots_are_removed() {
        let mut store = StateStore::new();
        store.begin_tick();
        store.commit(device(0, "a"));
        store.commit(device(2, "c"));
        store.begin_tick();
        store.commit(device(2, "c"));

        assert_eq!(store.diff(), vec![SlotChange::Removed(device(0, "a"))]);
        assert!(store.current(0).is_none());
        assert_eq!(store.slots().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn reused_slot_with_new_device_is_replaced() {
        let mut store = StateStore::new();
        store.begin_tick();
        store.commit(device(0, "45e-28e-Xbox"));
        store.begin_tick();
        store.commit(device(0, "79-6-N64"));

        assert_eq!(
            store.diff(),
            vec![SlotChange::Replaced {
                old: device(0, "45e-28e-Xbox"),
                new: device(0, "79-6-N64"),
            }]
        );
    }
}
