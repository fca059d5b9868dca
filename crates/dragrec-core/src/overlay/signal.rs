//! A minimal observer list.
//!
//! [`Signal<T>`] stores subscriber callbacks and calls them in subscription
//! order on [`Signal::emit`].  Delivery is synchronous: when `emit` returns,
//! every subscriber has run.  The overlays rely on this to guarantee that a
//! result reaches the shell before the close notification does, and that
//! both have been delivered before the overlay is torn down.

use std::fmt;

/// Handle returned by [`Signal::subscribe`]; pass it to
/// [`Signal::unsubscribe`] to detach the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

type Slot<T> = Box<dyn FnMut(&T)>;

/// An ordered list of callbacks that all receive each emitted value.
pub struct Signal<T> {
    next_id: u64,
    slots: Vec<(SubscriptionId, Slot<T>)>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            slots: Vec::new(),
        }
    }

    /// Attaches `callback`; it runs on every subsequent [`emit`](Self::emit).
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, Box::new(callback)));
        id
    }

    /// Attaches `callback` under an id chosen by the owner.  Used when several
    /// signals share one id space.
    pub(crate) fn subscribe_as(&mut self, id: SubscriptionId, callback: impl FnMut(&T) + 'static) {
        self.slots.push((id, Box::new(callback)));
    }

    /// Detaches a callback.  Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != before
    }

    /// Calls every subscriber with `value`, in subscription order.
    pub fn emit(&mut self, value: &T) {
        for (_, slot) in &mut self.slots {
            slot(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.slots.len())
            .finish()
    }
}
