//! Synchronous notifications for editor subscribers.
//!
//! Handlers run in subscription order, on the thread that produced the event,
//! before the producing call returns. A handler must not mutate the
//! [`ConnectorStore`](crate::ConnectorStore) while a `redraw_all` or
//! `delete_all` pass is delivering events; doing so is unsupported (with the
//! usual `Rc<RefCell<_>>` sharing it panics on the re-entrant borrow).

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Discriminant of an [`EditorEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DragBegin,
    Drag,
    DragEnd,
    ConnectorCreated,
    Delete,
    ClearAll,
}

/// A domain event emitted by the editor core.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    DragBegin { node_id: i32, x: f32, y: f32 },
    /// A move tick changed the node position
    Drag { node_id: i32, x: f32, y: f32 },
    /// Fired once per gesture, whether or not the node moved
    DragEnd { node_id: i32, x: f32, y: f32 },
    ConnectorCreated {
        connector_id: i32,
        start_pin: i32,
        end_pin: i32,
    },
    Delete { connector_id: i32 },
    /// All connectors were removed; follows one `Delete` per connector
    ClearAll,
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DragBegin { .. } => EventKind::DragBegin,
            Self::Drag { .. } => EventKind::Drag,
            Self::DragEnd { .. } => EventKind::DragEnd,
            Self::ConnectorCreated { .. } => EventKind::ConnectorCreated,
            Self::Delete { .. } => EventKind::Delete,
            Self::ClearAll => EventKind::ClearAll,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&EditorEvent)>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler)>,
}

/// Fan-out of [`EditorEvent`]s to subscribers.
///
/// Clone this bus to share it; all clones deliver to the same subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&EditorEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.handlers.push((id, Rc::new(handler)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let len_before = inner.handlers.len();
        inner.handlers.retain(|(sid, _)| *sid != id);
        inner.handlers.len() != len_before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    /// Deliver an event to every current subscriber.
    ///
    /// A panicking handler is logged and skipped; the remaining handlers still
    /// run and the panic does not propagate to the caller.
    pub fn emit(&self, event: EditorEvent) {
        // Snapshot so handlers may (un)subscribe while being called
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .handlers
            .iter()
            .map(|(_, h)| h.clone())
            .collect();

        log::trace!("emit {:?} to {} subscriber(s)", event.kind(), handlers.len());

        for handler in handlers {
            if panic::catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                log::error!("event handler panicked while handling {:?}", event.kind());
            }
        }
    }
}
