use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::decorate::RenderMode;
use crate::document::Document;

/// A host-delivered change notification.
#[derive(Debug, Clone)]
pub enum Signal {
    /// The document now has this content.
    ContentChanged(Document),
    /// The visible byte range of the edit surface moved.
    ViewportChanged { from: usize, to: usize },
    /// The view switched between editing and preview.
    ViewModeChanged(RenderMode),
    /// The preview tree was mutated.
    DomMutated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    ContentChanged,
    ViewportChanged,
    ViewModeChanged,
    DomMutated,
}

impl SignalKind {
    pub const ALL: [SignalKind; 4] = [
        SignalKind::ContentChanged,
        SignalKind::ViewportChanged,
        SignalKind::ViewModeChanged,
        SignalKind::DomMutated,
    ];
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::ContentChanged(_) => SignalKind::ContentChanged,
            Signal::ViewportChanged { .. } => SignalKind::ViewportChanged,
            Signal::ViewModeChanged(_) => SignalKind::ViewModeChanged,
            Signal::DomMutated => SignalKind::DomMutated,
        }
    }
}

/// A registered callback plus the signals emitted to it while it was running.
struct ListenerCell {
    callback: RefCell<Box<dyn FnMut(&Signal)>>,
    backlog: RefCell<VecDeque<Signal>>,
}

impl ListenerCell {
    fn next_queued(&self) -> Option<Signal> {
        self.backlog.borrow_mut().pop_front()
    }
}

type Listener = Rc<ListenerCell>;

struct Entry {
    id: u64,
    kind: SignalKind,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Registry {
    fn is_live(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

/// Single-threaded signal dispatch.
///
/// Listeners run synchronously inside [`SignalHub::emit`]. A listener that is
/// already running is not re-entered: a nested emit queues the signal, and the
/// outer call delivers it, in order, once the listener returns.
#[derive(Clone, Default)]
pub struct SignalHub {
    registry: Rc<RefCell<Registry>>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for one signal kind until the returned
    /// [`Subscription`] is dropped or cancelled.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        kind: SignalKind,
        listener: impl FnMut(&Signal) + 'static,
    ) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Rc::new(ListenerCell {
            callback: RefCell::new(Box::new(listener)),
            backlog: RefCell::new(VecDeque::new()),
        });
        registry.entries.push(Entry { id, kind, listener });

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Delivers `signal` to every live listener of its kind.
    ///
    /// Returns how many listeners ran or had the signal queued.
    pub fn emit(&self, signal: &Signal) -> usize {
        let kind = signal.kind();
        let targets: Vec<(u64, Listener)> = self
            .registry
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e.id, Rc::clone(&e.listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in targets {
            // An earlier listener may have unsubscribed this one.
            if !self.registry.borrow().is_live(id) {
                continue;
            }
            match listener.callback.try_borrow_mut() {
                Ok(mut f) => {
                    (&mut *f)(signal);
                    while let Some(queued) = listener.next_queued() {
                        (&mut *f)(&queued);
                    }
                }
                Err(_) => {
                    log::trace!("listener {id} is running; queueing nested {kind:?}");
                    listener.backlog.borrow_mut().push_back(signal.clone());
                }
            }
            delivered += 1;
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// A live registration on a [`SignalHub`]. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Unsubscribes now.
    pub fn cancel(self) {}

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.try_borrow().map_or(true, |r| r.is_live(self.id)))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match registry.try_borrow_mut() {
            Ok(mut r) => r.entries.retain(|e| e.id != self.id),
            Err(_) => log::warn!("signal registry busy; subscription {} leaked", self.id),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
