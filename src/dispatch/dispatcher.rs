//! Observer registry and event delivery
//!
//! The registry is copy-on-write: each dispatch pass takes a cheap snapshot
//! (an `Arc` clone) and iterates it without holding the lock, so observers
//! may be attached or detached from other threads while a pass is running.
//! Observers attached mid-pass are not guaranteed that pass's events, and
//! observers detached mid-pass may still receive them.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace, warn};

use crate::dispatch::event::{ButtonEvent, EventSet};
use crate::dispatch::Observer;

#[derive(Clone)]
struct Registration {
    observer: Arc<dyn Observer>,
    capabilities: EventSet,
}

impl Registration {
    fn is<O: ?Sized>(&self, observer: &Arc<O>) -> bool {
        Arc::as_ptr(&self.observer).cast::<()>() == Arc::as_ptr(observer).cast::<()>()
    }
}

/// Ordered set of observers receiving button events
#[derive(Default)]
pub struct EventDispatcher {
    registry: Mutex<Arc<Vec<Registration>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Arc<Vec<Registration>>> {
        // Handlers never run under the lock, so a poisoned registry is still consistent
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an observer; duplicates are allowed and each receives events
    pub fn attach(&self, observer: Arc<dyn Observer>) {
        let capabilities = observer.capabilities();
        Arc::make_mut(&mut *self.registry()).push(Registration {
            observer,
            capabilities,
        });
        debug!("Attached an observer ({:?})", capabilities);
    }

    /// Remove the first registration of `observer`.
    ///
    /// Returns `false` if it wasn't attached.
    pub fn detach<O: ?Sized>(&self, observer: &Arc<O>) -> bool {
        let mut registry = self.registry();
        match registry.iter().position(|r| r.is(observer)) {
            Some(index) => {
                Arc::make_mut(&mut *registry).remove(index);
                debug!("Detached an observer");
                true
            }
            None => {
                trace!("Detach ignored: observer not attached");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// Deliver `events` to every observer in registration order.
    ///
    /// For each observer, its handlers run in `events` order; observers that
    /// don't declare an event are skipped. A handler that fails or panics is
    /// logged and does not stop delivery to the rest. Returns the number of
    /// handlers that completed successfully.
    pub fn dispatch(&self, events: &[ButtonEvent]) -> usize {
        if events.is_empty() {
            return 0;
        }

        let snapshot = Arc::clone(&self.registry());
        let mut delivered = 0;

        for registration in snapshot.iter() {
            for &event in events {
                if !registration.capabilities.has(event) {
                    continue;
                }

                let observer = &registration.observer;
                match panic::catch_unwind(AssertUnwindSafe(|| observer.on_event(event))) {
                    Ok(Ok(())) => delivered += 1,
                    Ok(Err(e)) => warn!("Observer failed to handle {}: {}", event, e),
                    Err(_) => warn!("Observer panicked while handling {}", event),
                }
            }
        }

        trace!("Dispatched {:?} ({} handlers ran)", events, delivered);
        delivered
    }

    /// Dispatch events given by handler name; unknown names match no observer
    pub fn dispatch_names<S: AsRef<str>>(&self, names: &[S]) -> usize {
        let events: Vec<ButtonEvent> = names
            .iter()
            .filter_map(|name| match name.as_ref().parse::<ButtonEvent>() {
                Ok(event) => Some(event),
                Err(e) => {
                    trace!("{}", e);
                    None
                }
            })
            .collect();
        self.dispatch(&events)
    }
}
