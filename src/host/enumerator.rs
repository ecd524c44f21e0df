//! Host device enumeration seam

use crate::gamepad::RawDeviceSnapshot;
use crate::tracker::ConnectionKind;
use std::collections::VecDeque;
use tracing::debug;

/// Source of raw device snapshots
///
/// The returned list is indexed by slot and may be sparse: `None` marks an
/// empty slot.
pub trait DeviceEnumerator {
    fn snapshots(&mut self) -> Vec<Option<RawDeviceSnapshot>>;

    /// Connection notifications the host delivered by itself since the last
    /// call. Hosts without native notifications return nothing.
    fn native_events(&mut self) -> Vec<(usize, ConnectionKind)> {
        Vec::new()
    }
}

impl<T: DeviceEnumerator + ?Sized> DeviceEnumerator for Box<T> {
    fn snapshots(&mut self) -> Vec<Option<RawDeviceSnapshot>> {
        (**self).snapshots()
    }

    fn native_events(&mut self) -> Vec<(usize, ConnectionKind)> {
        (**self).native_events()
    }
}

/// Enumerator replaying prepared frames, one per call
///
/// Once the frames run out the last one is repeated, so a scripted device
/// stays connected. Native notifications are delivered together with the
/// frame queued after them.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEnumerator {
    frames: VecDeque<Vec<Option<RawDeviceSnapshot>>>,
    last: Vec<Option<RawDeviceSnapshot>>,
    // (frame number, slot, kind)
    native: VecDeque<(usize, usize, ConnectionKind)>,
    served: usize,
}

impl ScriptedEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: impl IntoIterator<Item = Vec<Option<RawDeviceSnapshot>>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Queues a frame holding the given devices at their slots
    pub fn push_devices(&mut self, devices: impl IntoIterator<Item = RawDeviceSnapshot>) {
        let mut frame: Vec<Option<RawDeviceSnapshot>> = Vec::new();
        for device in devices {
            if frame.len() <= device.slot {
                frame.resize(device.slot + 1, None);
            }
            let slot = device.slot;
            frame[slot] = Some(device);
        }
        self.frames.push_back(frame);
    }

    /// Queues a native notification, delivered with the next frame pushed
    /// or, when none follows, on the next call
    pub fn push_native(&mut self, slot: usize, kind: ConnectionKind) {
        let frame = self.served + self.frames.len();
        self.native.push_back((frame, slot, kind));
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DeviceEnumerator for ScriptedEnumerator {
    fn snapshots(&mut self) -> Vec<Option<RawDeviceSnapshot>> {
        if let Some(frame) = self.frames.pop_front() {
            debug!("Replaying scripted frame, {} left", self.frames.len());
            self.last = frame;
            self.served += 1;
        }
        self.last.clone()
    }

    fn native_events(&mut self) -> Vec<(usize, ConnectionKind)> {
        let mut due = Vec::new();
        while let Some((frame, slot, kind)) = self.native.front().copied() {
            if frame >= self.served && !self.frames.is_empty() {
                break;
            }
            self.native.pop_front();
            due.push((slot, kind));
        }
        due
    }
}
