//! Single-threaded notification channel.
//!
//! A `Signal<A>` keeps an ordered list of handlers.  Subscribing returns a
//! [`SignalHandle`]; the same handle is the only way to unsubscribe, so the
//! subscriber must keep it around.  Handlers run synchronously inside
//! [`Signal::dispatch`], in subscription order.
//!
//! ```rust,ignore
//! let mut ready: Signal<()> = Signal::new();
//! let handle = ready.add(|_| log::info!("loaded"));
//! ready.dispatch(&());
//! ready.remove(handle);
//! ```

/// Stable identity of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalHandle(u64);

type Handler<A> = Box<dyn FnMut(&A)>;

pub struct Signal<A> {
    next: u64,
    handlers: Vec<(SignalHandle, Handler<A>)>,
    dispatched: u64,
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handlers.len())
            .field("dispatched", &self.dispatched)
            .finish()
    }
}

impl<A> Signal<A> {
    pub fn new() -> Self {
        Self {
            next: 1,
            handlers: Vec::new(),
            dispatched: 0,
        }
    }

    /// Subscribe `handler`; returns the handle needed to remove it again.
    pub fn add(&mut self, handler: impl FnMut(&A) + 'static) -> SignalHandle {
        let handle = SignalHandle(self.next);
        self.next += 1;
        self.handlers.push((handle, Box::new(handler)));
        handle
    }

    /// Unsubscribe.  Returns `false` if the handle was not (or no longer)
    /// subscribed.
    pub fn remove(&mut self, handle: SignalHandle) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != handle);
        self.handlers.len() != before
    }

    pub fn has(&self, handle: SignalHandle) -> bool {
        self.handlers.iter().any(|(h, _)| *h == handle)
    }

    /// Invoke every handler with `args`.
    pub fn dispatch(&mut self, args: &A) {
        self.dispatched += 1;
        for (_, handler) in &mut self.handlers {
            handler(args);
        }
    }

    /// Number of times `dispatch` has been called.
    pub fn dispatch_count(&self) -> u64 {
        self.dispatched
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drop every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
