//! Move-node gesture.
//!
//! ```text
//! Idle --begin--> Armed --update--> Dragging --end--> Idle
//!                   \------------------end-----------/
//! ```
//!
//! The node position is recomputed from the gesture start on every tick, so
//! the final position depends only on where the pointer ended up, never on
//! how many move ticks were delivered.

use slint::LogicalPosition;

use crate::connectors::ConnectorStore;
use crate::error::EditorError;
use crate::events::{EditorEvent, EventBus};
use crate::scene::SceneProvider;
use crate::session::{DragSession, GestureKind, GestureSubject};
use crate::transform::{CoordinateTransformer, PanZoomState};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pressed on a node, no move tick yet
    Armed(DragSession),
    Dragging(DragSession),
}

/// State machine moving one node at a time.
pub struct DragController {
    state: DragState,
    bus: EventBus,
}

impl DragController {
    pub fn new(bus: EventBus) -> Self {
        Self {
            state: DragState::Idle,
            bus,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed(session) | DragState::Dragging(session) => Some(session),
        }
    }

    /// Arm a move gesture on `node_id`.
    ///
    /// `pointer` is canvas-relative, i.e. already in pan/zoom space. Ignored
    /// while another move gesture is in flight.
    pub fn begin(
        &mut self,
        node_id: i32,
        pointer: LogicalPosition,
        pan_zoom: &PanZoomState,
        transformer: &CoordinateTransformer,
        scene: &dyn SceneProvider,
    ) -> Result<(), EditorError> {
        if self.is_active() {
            log::debug!("drag begin on node {} ignored, gesture in flight", node_id);
            return Ok(());
        }

        let node = scene.node(node_id).ok_or(EditorError::NodeNotFound(node_id))?;
        if !node.draggable {
            log::debug!("node {} is not draggable", node_id);
            return Ok(());
        }

        let start_canvas = transformer.pan_zoom_to_canvas_space(pointer, pan_zoom)?;
        let session = DragSession::new(
            GestureKind::MoveNode,
            GestureSubject::Node(node_id),
            node.position(),
            start_canvas,
            pointer,
        );
        self.state = DragState::Armed(session);

        log::debug!("drag armed on node {} at ({}, {})", node_id, node.x, node.y);
        self.bus.emit(EditorEvent::DragBegin {
            node_id,
            x: node.x,
            y: node.y,
        });
        Ok(())
    }

    /// Apply one move tick.
    ///
    /// Returns the node's new position, or `None` when the tick was a no-op
    /// (no gesture, or the pointer is outside the canvas).
    pub fn update(
        &mut self,
        pointer: LogicalPosition,
        pan_zoom: &PanZoomState,
        transformer: &CoordinateTransformer,
        scene: &mut dyn SceneProvider,
        store: &mut ConnectorStore,
    ) -> Result<Option<LogicalPosition>, EditorError> {
        let mut session = match self.state {
            DragState::Idle => return Ok(None),
            DragState::Armed(session) | DragState::Dragging(session) => session,
        };

        if !transformer.contains(pointer) {
            log::trace!("move tick outside canvas ignored");
            return Ok(None);
        }

        let pz = pan_zoom.validate()?;
        let GestureSubject::Node(node_id) = session.subject else {
            return Ok(None);
        };

        let raw_dx = (pointer.x - session.start_pan_zoom.x) / pz.scale;
        let raw_dy = (pointer.y - session.start_pan_zoom.y) / pz.scale;
        let new_x = (session.start_position.x + raw_dx).round();
        let new_y = (session.start_position.y + raw_dy).round();

        if !scene.set_node_position(node_id, new_x, new_y) {
            return Err(EditorError::NodeNotFound(node_id));
        }

        session.delta = (
            new_x - session.start_position.x,
            new_y - session.start_position.y,
        );
        self.state = DragState::Dragging(session);

        store.redraw_for_node(node_id, &*scene);

        self.bus.emit(EditorEvent::Drag {
            node_id,
            x: new_x,
            y: new_y,
        });
        Ok(Some(LogicalPosition::new(new_x, new_y)))
    }

    /// Finish the gesture. Always returns to `Idle`.
    ///
    /// Emits [`EditorEvent::DragEnd`] with the last applied position, even if
    /// the node never moved.
    pub fn end(&mut self) -> Option<DragSession> {
        let session = match std::mem::take(&mut self.state) {
            DragState::Idle => return None,
            DragState::Armed(session) | DragState::Dragging(session) => session,
        };

        if let GestureSubject::Node(node_id) = session.subject {
            let pos = session.current_position();
            log::debug!("drag ended on node {} at ({}, {})", node_id, pos.x, pos.y);
            self.bus.emit(EditorEvent::DragEnd {
                node_id,
                x: pos.x,
                y: pos.y,
            });
        }
        Some(session)
    }
}
