//! Change notifier owned by the translation store.
//!
//! Subscribers are registered as `Weak` references; the strong `Rc` lives
//! in the [`Subscription`] handle returned to the caller, so the registry
//! never keeps a consumer alive past its unmount.
//!
//! # Invariants
//!
//! 1. One `dispatch()` calls every live subscriber at most once.
//! 2. A subscriber removed during a dispatch is not called afterwards in
//!    that dispatch; one added during a dispatch waits for the next.
//! 3. No `RefCell` borrow is held while a callback runs.
//! 4. The dispatching flag is cleared even if a callback panics.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{
    Rc,
    Weak,
};

/// Callback invoked on every language change. Consumers re-read the store themselves.
pub(crate) type Callback = dyn Fn();

/// Identifies one registration within a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mutable notifier state
#[derive(Default)]
struct NotifierState {
    /// Next id to hand out
    next_id: u64,
    /// Registration order doubles as (unspecified) fan-out order
    subscribers: BTreeMap<SubscriberId, Weak<Callback>>,
    /// True while `dispatch` is running
    dispatching: bool,
}

/// Publish/subscribe registry with synchronous fan-out.
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    /// Registry and dispatch flag
    state: RefCell<NotifierState>,
}

impl ChangeNotifier {
    /// Registers `callback` and returns the handle that owns it.
    pub(crate) fn register(self: &Rc<Self>, callback: impl Fn() + 'static) -> Subscription {
        let callback: Rc<Callback> = Rc::new(callback);
        let id = {
            let mut state = self.state.borrow_mut();
            let id = SubscriberId(state.next_id);
            state.next_id += 1;
            state.subscribers.insert(id, Rc::downgrade(&callback));
            id
        };
        tracing::debug!(subscriber = %id, total = self.len(), "Subscriber registered");

        Subscription { id, notifier: Rc::downgrade(self), _callback: callback }
    }

    /// Removes a registration. Returns `false` if it was already gone.
    pub(crate) fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.state.borrow_mut().subscribers.remove(&id).is_some();
        if removed {
            tracing::debug!(subscriber = %id, total = self.len(), "Subscriber removed");
        }
        removed
    }

    /// Number of live registrations.
    pub(crate) fn len(&self) -> usize {
        self.state.borrow().subscribers.values().filter(|w| w.strong_count() > 0).count()
    }

    pub(crate) fn is_dispatching(&self) -> bool {
        self.state.borrow().dispatching
    }

    /// Calls every live subscriber once. Returns how many were called.
    pub(crate) fn dispatch(&self) -> usize {
        let ids: Vec<SubscriberId> = {
            let mut state = self.state.borrow_mut();
            state.dispatching = true;
            state.subscribers.retain(|_, weak| weak.strong_count() > 0);
            state.subscribers.keys().copied().collect()
        };
        let _guard = DispatchGuard { notifier: self };

        let mut delivered = 0;
        for id in ids {
            let callback = self.state.borrow().subscribers.get(&id).and_then(Weak::upgrade);
            if let Some(callback) = callback {
                callback();
                delivered += 1;
            }
        }
        delivered
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &state.subscribers.len())
            .field("dispatching", &state.dispatching)
            .finish_non_exhaustive()
    }
}

/// Clears the dispatching flag on every exit path.
struct DispatchGuard<'a> {
    /// Notifier being dispatched
    notifier: &'a ChangeNotifier,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.notifier.state.try_borrow_mut() {
            state.dispatching = false;
        }
    }
}

/// Handle for one registration.
///
/// Owns the callback. Dropping the handle removes the registration, so a
/// consumer that goes away (including by unwinding) cannot leave a dangling
/// subscriber behind.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    /// Registration id
    id: SubscriberId,
    /// Issuing notifier; `Weak` so a handle can outlive the store
    notifier: Weak<ChangeNotifier>,
    /// Keeps the callback alive; the notifier only holds a `Weak`.
    _callback: Rc<Callback>,
}

impl Subscription {
    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether this handle was issued by `notifier`.
    pub(crate) fn belongs_to(&self, notifier: &Rc<ChangeNotifier>) -> bool {
        std::ptr::eq(self.notifier.as_ptr(), Rc::as_ptr(notifier))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(notifier) = self.notifier.upgrade() {
            notifier.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}
