//! Event delivery from the platform to an observer.
//!
//! A [`NetworkEventSink`] holds a weak reference to the observer and a
//! liveness flag. All deliveries and the deactivation go through one
//! re-entrant gate, which gives three guarantees:
//!
//! - events reach the observer one at a time, in gate order;
//! - once [`NetworkEventSink::deactivate`] returns, no delivery is in flight
//!   and none will start;
//! - an observer may deactivate from inside its own callback without
//!   deadlocking, since the gate is re-entrant on the dispatching thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use log::trace;
use parking_lot::ReentrantMutex;

use super::observer::{NetworkChangeObserver, NetworkEvent};

struct Dispatcher {
    observer: Weak<dyn NetworkChangeObserver>,
    active: AtomicBool,
    gate: ReentrantMutex<()>,
    delivered: AtomicU64,
}

/// Where a platform source pushes events for one detector.
///
/// Cheap to clone; every clone feeds the same observer.
#[derive(Clone)]
pub struct NetworkEventSink {
    inner: Arc<Dispatcher>,
}

impl NetworkEventSink {
    pub(crate) fn new(observer: Weak<dyn NetworkChangeObserver>) -> Self {
        Self {
            inner: Arc::new(Dispatcher {
                observer,
                active: AtomicBool::new(true),
                gate: ReentrantMutex::new(()),
                delivered: AtomicU64::new(0),
            }),
        }
    }

    /// Deliver one event.
    ///
    /// Returns `false`, without touching the observer, once the sink is
    /// inactive or the observer is gone. Sources may drop the sink then.
    pub fn deliver(&self, event: NetworkEvent) -> bool {
        let _gate = self.inner.gate.lock();
        if !self.inner.active.load(Ordering::Acquire) {
            trace!("dropping {:?}: detector stopped", event);
            return false;
        }
        let Some(observer) = self.inner.observer.upgrade() else {
            trace!("dropping {:?}: observer gone", event);
            self.inner.active.store(false, Ordering::Release);
            return false;
        };
        event.dispatch(&*observer);
        self.inner.delivered.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Whether events still reach the observer.
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Number of events handed to the observer so far.
    pub fn delivered(&self) -> u64 {
        self.inner.delivered.load(Ordering::Relaxed)
    }

    /// Stop delivery. Waits for an in-flight delivery on another thread.
    pub(crate) fn deactivate(&self) {
        let _gate = self.inner.gate.lock();
        self.inner.active.store(false, Ordering::Release);
    }
}
