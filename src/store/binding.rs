//! Binding adapter between the store and one mounted component.
//!
//! A [`Binding`] turns the store's push notification into a pull-style
//! re-evaluation: a notification only marks the binding stale and asks the
//! host for a render; the next [`Binding::render`] re-reads the store once.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::notifier::Subscription;
use super::state::TranslationStore;

/// A component whose output depends on the active language.
pub trait Localized {
    type Output;

    /// Reads whatever the component needs from the store.
    fn evaluate(&self, store: &TranslationStore) -> Self::Output;
}

/// The host's re-render primitive.
pub trait RenderTrigger {
    /// Requests that the next paint reflect re-evaluated translations.
    fn request_render(&self);
}

impl<F: Fn()> RenderTrigger for F {
    fn request_render(&self) {
        self();
    }
}

/// Counts render requests. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RedrawRequests {
    /// Shared counter
    count: Rc<Cell<usize>>,
}

impl RedrawRequests {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests since the last `take`.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.count.get()
    }

    /// Returns and resets the number of pending requests.
    pub fn take(&self) -> usize {
        self.count.replace(0)
    }
}

impl RenderTrigger for RedrawRequests {
    fn request_render(&self) {
        self.count.set(self.count.get() + 1);
    }
}

/// Subscription of one component for its mounted lifetime.
///
/// Dropping the binding unmounts it: the subscription is released on every
/// exit path, unwinding included.
pub struct Binding<C: Localized> {
    /// Store the component reads from
    store: TranslationStore,
    /// Mounted component
    component: C,
    /// Result of the last evaluation
    output: C::Output,
    /// Set by the subscription, cleared by `render`
    stale: Rc<Cell<bool>>,
    /// Evaluation count
    evaluations: usize,
    /// Released on drop
    subscription: Subscription,
}

impl<C: Localized> Binding<C> {
    /// Subscribes `component` and evaluates it once.
    pub fn mount(
        store: &TranslationStore,
        component: C,
        trigger: impl RenderTrigger + 'static,
    ) -> Self {
        let stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&stale);
        let subscription = store.subscribe(move || {
            // Coalesce: only the first notification since the last render asks for a paint.
            if !flag.replace(true) {
                trigger.request_render();
            }
        });

        let output = component.evaluate(store);
        tracing::debug!(subscriber = %subscription.id(), "Binding mounted");

        Self {
            store: store.clone(),
            component,
            output,
            stale,
            evaluations: 1,
            subscription,
        }
    }

    /// Re-evaluates if a notification arrived since the last render.
    pub fn render(&mut self) -> &C::Output {
        if self.stale.replace(false) {
            self.output = self.component.evaluate(&self.store);
            self.evaluations += 1;
        }
        &self.output
    }

    /// Output of the last evaluation, without re-evaluating.
    #[must_use]
    pub const fn output(&self) -> &C::Output {
        &self.output
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// Number of evaluation passes, the one at mount included.
    #[must_use]
    pub const fn evaluations(&self) -> usize {
        self.evaluations
    }

    #[must_use]
    pub const fn component(&self) -> &C {
        &self.component
    }

    #[must_use]
    pub const fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Unsubscribes and returns the component.
    pub fn unmount(self) -> C {
        tracing::debug!(subscriber = %self.subscription.id(), "Binding unmounted");
        self.component
    }
}

impl<C> fmt::Debug for Binding<C>
where
    C: Localized + fmt::Debug,
    C::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("component", &self.component)
            .field("output", &self.output)
            .field("stale", &self.stale.get())
            .field("evaluations", &self.evaluations)
            .finish_non_exhaustive()
    }
}

/// Reads a fixed list of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedLabels {
    /// Keys in display order
    keys: Vec<String>,
}

impl TranslatedLabels {
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { keys: keys.into_iter().map(Into::into).collect() }
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Localized for TranslatedLabels {
    /// `(key, translated text)` in key order.
    type Output = Vec<(String, String)>;

    fn evaluate(&self, store: &TranslationStore) -> Self::Output {
        self.keys.iter().map(|key| (key.clone(), store.translate(key))).collect()
    }
}
