//! Test harness driving an editor through Slint window events.
//!
//! The default scene has three nodes, 150x100 each:
//!
//! | node | position   | joints (absolute position)                   |
//! |------|------------|----------------------------------------------|
//! | 1    | (100, 100) | 10 (100, 150), 11 (250, 150)                 |
//! | 2    | (400, 200) | 20 (400, 250), 21 (550, 250)                 |
//! | 3    | (400, 400) | 30 (400, 450), 31 (550, 450) not connectable |

#![allow(dead_code)]

use super::EventRecorder;
use slint::{
    platform::{Key, PointerEventButton, WindowEvent},
    LogicalPosition, Model,
};
use slint_joint_editor::{
    CanvasLayout, ConnectorPath, EditorConfig, InputDispatcher, InputResult, PanZoomState,
    RawInput, SceneGraph, SceneProvider, TouchPhase,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Build the default scene.
pub fn default_scene() -> SceneGraph {
    let mut scene = SceneGraph::new(CanvasLayout::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT));
    scene
        .add_node(1, 100.0, 100.0, 150.0, 100.0)
        .add_node(2, 400.0, 200.0, 150.0, 100.0)
        .add_node(3, 400.0, 400.0, 150.0, 100.0)
        .add_joint(10, 1, 0.0, 50.0)
        .add_joint(11, 1, 150.0, 50.0)
        .add_joint(20, 2, 0.0, 50.0)
        .add_joint(21, 2, 150.0, 50.0)
        .add_joint(30, 3, 0.0, 50.0)
        .add_joint(31, 3, 150.0, 50.0);
    scene.set_connectable(31, false);
    scene
}

/// Test harness owning one editor instance.
pub struct EditorHarness {
    pub editor: InputDispatcher<SceneGraph>,
    pub events: EventRecorder,
    pub viewport: Rc<Cell<PanZoomState>>,
    /// Pin ids received by the host delete handler, if one is installed
    pub deleted_pins: Rc<RefCell<Vec<i32>>>,
}

impl EditorHarness {
    /// Default scene, default config, identity viewport.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::build(default_scene(), config, false)
    }

    pub fn with_scene(scene: SceneGraph) -> Self {
        Self::build(scene, EditorConfig::default(), false)
    }

    /// Editor whose delete key is routed to a host handler.
    pub fn with_delete_handler() -> Self {
        Self::build(default_scene(), EditorConfig::default(), true)
    }

    fn build(scene: SceneGraph, config: EditorConfig, host_delete: bool) -> Self {
        let viewport = Rc::new(Cell::new(PanZoomState::default()));
        let deleted_pins = Rc::new(RefCell::new(Vec::new()));
        let provider = {
            let viewport = viewport.clone();
            move || Some(viewport.get())
        };

        let editor = if host_delete {
            let deleted_pins = deleted_pins.clone();
            InputDispatcher::with_delete_handler(scene, provider, config, move |pin| {
                deleted_pins.borrow_mut().push(pin)
            })
        } else {
            InputDispatcher::new(scene, provider, config)
        }
        .unwrap();

        let events = EventRecorder::attach(editor.bus());
        Self {
            editor,
            events,
            viewport,
            deleted_pins,
        }
    }

    pub fn set_viewport(&self, scale: f32, translate_x: f32, translate_y: f32) {
        self.viewport
            .set(PanZoomState::new(scale, translate_x, translate_y));
    }

    /// Screen position at which a local canvas point is drawn.
    pub fn screen_of(&self, x: f32, y: f32) -> (f32, f32) {
        let layout = self.editor.transformer().layout();
        let pz = self.viewport.get();
        (
            layout.origin.x + x * pz.scale + pz.translate_x,
            layout.origin.y + y * pz.scale + pz.translate_y,
        )
    }

    pub fn node_position(&self, node_id: i32) -> Option<LogicalPosition> {
        self.editor.scene().node(node_id).map(|n| n.position())
    }

    pub fn joint_position(&self, pin_id: i32) -> LogicalPosition {
        self.editor.scene().joint_position(pin_id).unwrap()
    }

    /// Create a connector directly and forget the creation event.
    pub fn connect(&mut self, start_pin: i32, end_pin: i32) -> i32 {
        let id = self.editor.connect_joints(start_pin, end_pin).unwrap();
        self.events.clear();
        id
    }

    /// Snapshot of the drawable rows.
    pub fn paths(&self) -> Vec<ConnectorPath> {
        let model = self.editor.paths_model();
        (0..model.row_count()).filter_map(|i| model.row_data(i)).collect()
    }

    pub fn path_of(&self, connector_id: i32) -> Option<ConnectorPath> {
        self.paths().into_iter().find(|p| p.id == connector_id)
    }

    pub fn connector_ids(&self) -> Vec<i32> {
        self.editor.store().ids().collect()
    }

    // === Mouse event helpers ===

    fn dispatch(&mut self, event: WindowEvent) -> InputResult {
        self.editor.handle_window_event(&event)
    }

    /// Simulate mouse down at the given screen position.
    pub fn mouse_down(&mut self, x: f32, y: f32) -> InputResult {
        self.dispatch(WindowEvent::PointerPressed {
            position: LogicalPosition::new(x, y),
            button: PointerEventButton::Left,
        })
    }

    /// Simulate mouse down with a specific button.
    pub fn mouse_down_button(&mut self, x: f32, y: f32, button: PointerEventButton) -> InputResult {
        self.dispatch(WindowEvent::PointerPressed {
            position: LogicalPosition::new(x, y),
            button,
        })
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) -> InputResult {
        self.dispatch(WindowEvent::PointerMoved {
            position: LogicalPosition::new(x, y),
        })
    }

    pub fn mouse_up(&mut self, x: f32, y: f32) -> InputResult {
        self.dispatch(WindowEvent::PointerReleased {
            position: LogicalPosition::new(x, y),
            button: PointerEventButton::Left,
        })
    }

    /// Simulate a complete click (down + up) at the given position.
    pub fn click(&mut self, x: f32, y: f32) {
        self.mouse_down(x, y);
        self.mouse_up(x, y);
    }

    /// Simulate a complete drag from start to end.
    pub fn drag(&mut self, start_x: f32, start_y: f32, end_x: f32, end_y: f32) {
        self.mouse_down(start_x, start_y);
        self.mouse_move(end_x, end_y);
        self.mouse_up(end_x, end_y);
    }

    // === Touch event helpers ===

    pub fn touch(&mut self, phase: TouchPhase, x: f32, y: f32) -> InputResult {
        self.editor.handle(&RawInput::touch(phase, x, y))
    }

    /// Touch event whose touch list is empty.
    pub fn touch_without_point(&mut self, phase: TouchPhase) -> InputResult {
        self.editor.handle(&RawInput::Touch {
            phase,
            touches: Vec::new(),
        })
    }

    // === Keyboard event helpers ===

    pub fn key_press(&mut self, key: Key) -> InputResult {
        self.dispatch(WindowEvent::KeyPressed { text: key.into() })
    }

    pub fn key_release(&mut self, key: Key) -> InputResult {
        self.dispatch(WindowEvent::KeyReleased { text: key.into() })
    }

    /// Simulate a complete key press and release.
    pub fn key_tap(&mut self, key: Key) {
        self.key_press(key);
        self.key_release(key);
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}
