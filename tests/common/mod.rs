//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_joint_editor::{EditorEvent, EventBus, EventKind};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every event delivered on a bus, in order.
#[derive(Default, Clone)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl EventRecorder {
    /// Create a recorder subscribed to `bus`.
    pub fn attach(bus: &EventBus) -> Self {
        let recorder = Self::default();
        bus.subscribe({
            let events = recorder.events.clone();
            move |e| events.borrow_mut().push(e.clone())
        });
        recorder
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.borrow().iter().map(|e| e.kind()).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn last(&self) -> Option<EditorEvent> {
        self.events.borrow().last().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
