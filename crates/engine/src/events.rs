//! Synchronous segment-event dispatch.
//!
//! Listeners are invoked in registration order when an event is emitted.
//! A panicking listener is caught and logged, never aborting the emission
//! to the remaining listeners.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use paperstage_domain::SegmentEvent;

type Listener = Arc<dyn Fn(&SegmentEvent) + Send + Sync>;
type ListenerSlot = (u64, Listener);

/// Synchronous listener registry for segment lifecycle events.
///
/// One bus per generation run; the orchestrator emits, callers subscribe.
#[derive(Default)]
pub struct SegmentEventBus {
    listeners: Arc<Mutex<Vec<ListenerSlot>>>,
    next_id: AtomicU64,
}

impl SegmentEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns a handle that removes the listener when
    /// `unsubscribe` is called; dropping the handle leaves the listener
    /// registered.
    pub fn subscribe(
        &self,
        listener: impl Fn(&SegmentEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Arc::new(listener)));
        }
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Invoke every listener with the event, in registration order.
    pub fn emit(&self, event: &SegmentEvent) {
        // Snapshot outside the lock so a listener can subscribe/unsubscribe
        // without deadlocking.
        let snapshot: Vec<Listener> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, l)| l.clone()).collect(),
            Err(_) => return,
        };

        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::error!(
                    segment = %event.segment_id,
                    "segment event listener panicked; continuing emission"
                );
            }
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

/// Handle returned by [`SegmentEventBus::subscribe`].
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Vec<ListenerSlot>>>,
}

impl Subscription {
    /// Remove the listener from the bus. No-op if the bus is gone.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut listeners) = listeners.lock() {
                listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
