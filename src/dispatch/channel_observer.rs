//! Channel-forwarding observer.
//!
//! Forwards every event it declares into a bounded crossbeam channel so a
//! different thread can consume button events. Sends never block the
//! dispatch pass; a full or closed channel is reported as a handler failure.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::dispatch::{ButtonEvent, EventSet, HandlerResult, Observer, ObserverError};

/// Default channel capacity
const CHANNEL_CAPACITY: usize = 100;

/// Observer that forwards button events to a channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    capabilities: EventSet,
    sender: Sender<ButtonEvent>,
}

impl ChannelObserver {
    /// Create an observer for `capabilities` and the receiving end of its channel
    pub fn new(capabilities: EventSet) -> (Self, Receiver<ButtonEvent>) {
        Self::with_capacity(capabilities, CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capabilities: EventSet, capacity: usize) -> (Self, Receiver<ButtonEvent>) {
        let (sender, receiver) = bounded(capacity);
        (Self { capabilities, sender }, receiver)
    }
}

impl Observer for ChannelObserver {
    fn capabilities(&self) -> EventSet {
        self.capabilities
    }

    fn on_event(&self, event: ButtonEvent) -> HandlerResult {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => ObserverError::Handler(format!("event channel full, dropped {}", event)),
            TrySendError::Disconnected(_) => ObserverError::ChannelClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_events_in_order() {
        let (observer, receiver) = ChannelObserver::new(EventSet::all());
        observer.on_event(ButtonEvent::Y).unwrap();
        observer.on_event(ButtonEvent::Rb).unwrap();

        assert_eq!(receiver.try_recv().unwrap(), ButtonEvent::Y);
        assert_eq!(receiver.try_recv().unwrap(), ButtonEvent::Rb);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn full_and_closed_channels_fail() {
        let (observer, receiver) = ChannelObserver::with_capacity(EventSet::X, 1);
        assert!(observer.on_event(ButtonEvent::X).is_ok());
        assert!(matches!(observer.on_event(ButtonEvent::X), Err(ObserverError::Handler(_))));

        drop(receiver);
        assert!(matches!(observer.on_event(ButtonEvent::X), Err(ObserverError::ChannelClosed)));
    }
}
