//! Notification boundary for connection events

use crate::tracker::{ConnectionEvent, ConnectionKind};
use chrono::Local;
use tracing::{info, warn};

/// Receiver of connection notifications
pub trait NotificationSink {
    fn notify(&mut self, event: &ConnectionEvent);
}

impl<F> NotificationSink for F
where
    F: FnMut(&ConnectionEvent),
{
    fn notify(&mut self, event: &ConnectionEvent) {
        self(event)
    }
}

/// Collects events, handy when the caller wants to dispatch them later
impl NotificationSink for Vec<ConnectionEvent> {
    fn notify(&mut self, event: &ConnectionEvent) {
        self.push(event.clone());
    }
}

/// Sink writing one log line per notification
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl NotificationSink for LoggingNotifier {
    fn notify(&mut self, event: &ConnectionEvent) {
        let now = Local::now().format("%H:%M:%S.%3f");
        let state = &event.state;
        match event.kind {
            ConnectionKind::Connected => info!(
                "Gamepad connected at index {}: {} ({}, mapping '{}', remapped: {}) at {}",
                event.slot, state.id, state.identity, state.mapping, state.remapped, now
            ),
            ConnectionKind::Disconnected => warn!(
                "Gamepad removed at index {}: {} at {}",
                event.slot, state.id, now
            ),
        }
    }
}
