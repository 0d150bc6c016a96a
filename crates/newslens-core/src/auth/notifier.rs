//! Process-wide authentication notifier.
//!
//! Carries exactly two signals, login and logout, decoupling the login and
//! registration flow from the main session view: the emitter does not know
//! who is listening. Signals carry no payload; listeners re-derive whatever
//! they need (typically by re-reading the credential holder).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// The two authentication signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSignal {
    Login,
    Logout,
}

/// A subscribed listener. Takes no payload; see the module docs.
pub type AuthListener = Box<dyn Fn() + Send + Sync>;

/// Publish/subscribe channel for authentication signals.
///
/// Injectable so the session controller can be constructed and tested
/// without a real process-wide channel.
pub trait AuthBus: Send + Sync {
    /// Delivers the signal synchronously to all currently subscribed
    /// listeners, in subscription order.
    fn emit(&self, signal: AuthSignal);

    /// Registers a listener for the signal and returns the capability to
    /// remove exactly that listener again.
    fn subscribe(&self, signal: AuthSignal, listener: AuthListener) -> Subscription;
}

/// Capability to remove a single listener from a bus.
///
/// Holders must release their subscriptions on teardown to avoid leaking
/// listeners across remounts of the session view.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps a release action provided by a bus implementation.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Removes the listener this subscription was created for.
    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

struct ListenerSlot {
    id: u64,
    listener: Arc<dyn Fn() + Send + Sync>,
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    login: Mutex<Vec<ListenerSlot>>,
    logout: Mutex<Vec<ListenerSlot>>,
}

impl BusInner {
    fn slots(&self, signal: AuthSignal) -> &Mutex<Vec<ListenerSlot>> {
        match signal {
            AuthSignal::Login => &self.login,
            AuthSignal::Logout => &self.logout,
        }
    }
}

/// The in-process [`AuthBus`] used by the real application.
#[derive(Default)]
pub struct ProcessAuthBus {
    inner: Arc<BusInner>,
}

impl ProcessAuthBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthBus for ProcessAuthBus {
    fn emit(&self, signal: AuthSignal) {
        // Snapshot the listeners before delivering so a listener that
        // subscribes or unsubscribes during delivery cannot deadlock.
        let snapshot: Vec<Arc<dyn Fn() + Send + Sync>> = self
            .inner
            .slots(signal)
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|slot| slot.listener.clone())
            .collect();

        for listener in snapshot {
            listener();
        }
    }

    fn subscribe(&self, signal: AuthSignal, listener: AuthListener) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .slots(signal)
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ListenerSlot {
                id,
                listener: Arc::from(listener),
            });

        let weak: Weak<BusInner> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .slots(signal)
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|slot| slot.id != id);
            }
        })
    }
}
