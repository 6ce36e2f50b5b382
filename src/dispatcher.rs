//! Entry point for host input.
//!
//! [`InputDispatcher`] owns one editor instance: the connector store, both
//! gesture controllers, the connector selection and the event bus. Hosts feed
//! it [`RawInput`] (or Slint [`WindowEvent`]s) and bind its drawable model.
//!
//! # Example
//!
//! ```ignore
//! use slint_joint_editor::{EditorConfig, InputDispatcher, PanZoomState, RawInput, SceneGraph};
//!
//! let mut editor = InputDispatcher::new(scene, PanZoomState::default(), EditorConfig::default())?;
//! window.set_connector_paths(editor.paths_model());
//!
//! editor.bus().subscribe(|event| log::info!("{:?}", event));
//! editor.handle_window_event(&event);
//! ```

use slint::platform::WindowEvent;
use slint::{LogicalPosition, ModelRc};

use crate::config::EditorConfig;
use crate::connect::PathDragController;
use crate::connectors::{Connector, ConnectorPath, ConnectorStore};
use crate::drag::DragController;
use crate::error::EditorError;
use crate::events::{EditorEvent, EventBus};
use crate::hit_test::{find_connector_at, find_joint_at, find_node_at};
use crate::input::{normalize, Phase, RawInput};
use crate::scene::SceneProvider;
use crate::selection::ConnectorSelection;
use crate::transform::{CanvasLayout, CoordinateTransformer, PanZoomState, ViewportProvider};
use crate::validation::Rejection;

/// Outcome of [`InputDispatcher::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Consumed, no gesture in flight
    Accepted,
    /// Not relevant to the editor
    Ignored,
    /// Consumed and a gesture now owns the pointer
    Captured,
}

/// What a delete-key press does to the active connector.
pub trait DeleteStrategy {
    /// Returns `true` if the request was handled.
    fn delete(&self, connector: &Connector, store: &mut ConnectorStore) -> bool;
}

/// Delete the connector from the store, which emits [`EditorEvent::Delete`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalDelete;

impl DeleteStrategy for InternalDelete {
    fn delete(&self, connector: &Connector, store: &mut ConnectorStore) -> bool {
        store.delete_by_id(connector.id)
    }
}

/// Hand the decision to the host, passing the connector's first endpoint pin.
///
/// The handler runs while the dispatcher is mutably borrowed; it must not
/// call back into the dispatcher synchronously.
pub struct HostDelete<F> {
    handler: F,
}

impl<F: Fn(i32)> HostDelete<F> {
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F: Fn(i32)> DeleteStrategy for HostDelete<F> {
    fn delete(&self, connector: &Connector, _store: &mut ConnectorStore) -> bool {
        (self.handler)(connector.endpoint_a);
        true
    }
}

pub struct InputDispatcher<S: SceneProvider> {
    scene: S,
    viewport: Box<dyn ViewportProvider>,
    config: EditorConfig,
    transformer: CoordinateTransformer,
    store: ConnectorStore,
    drag: DragController,
    connect: PathDragController,
    selection: ConnectorSelection,
    delete: Box<dyn DeleteStrategy>,
    bus: EventBus,
    draggable: Vec<i32>,
    interactive: Vec<i32>,
    last_pointer: Option<(f32, f32)>,
}

impl<S: SceneProvider> InputDispatcher<S> {
    /// Build an editor that deletes selected connectors itself.
    ///
    /// Fails if the scene has no canvas root or the root's layout is unusable.
    pub fn new<V>(scene: S, viewport: V, config: EditorConfig) -> Result<Self, EditorError>
    where
        V: ViewportProvider + 'static,
    {
        Self::with_delete_strategy(scene, viewport, config, InternalDelete)
    }

    /// Build an editor whose delete key is routed to `handler(pin_id)`.
    pub fn with_delete_handler<V, F>(
        scene: S,
        viewport: V,
        config: EditorConfig,
        handler: F,
    ) -> Result<Self, EditorError>
    where
        V: ViewportProvider + 'static,
        F: Fn(i32) + 'static,
    {
        Self::with_delete_strategy(scene, viewport, config, HostDelete::new(handler))
    }

    pub fn with_delete_strategy<V, D>(
        scene: S,
        viewport: V,
        config: EditorConfig,
        strategy: D,
    ) -> Result<Self, EditorError>
    where
        V: ViewportProvider + 'static,
        D: DeleteStrategy + 'static,
    {
        let layout = scene
            .canvas_layout()
            .ok_or(EditorError::MissingSceneRoot)?
            .validate()?;

        let bus = EventBus::new();
        let mut dispatcher = Self {
            scene,
            viewport: Box::new(viewport),
            config,
            transformer: CoordinateTransformer::new(layout),
            store: ConnectorStore::new(&config, bus.clone()),
            drag: DragController::new(bus.clone()),
            connect: PathDragController::new(&config, bus.clone()),
            selection: ConnectorSelection::new(),
            delete: Box::new(strategy),
            bus,
            draggable: Vec::new(),
            interactive: Vec::new(),
            last_pointer: None,
        };
        dispatcher.enumerate();

        log::debug!(
            "editor ready: {} draggable node(s), {} interactive joint(s)",
            dispatcher.draggable.len(),
            dispatcher.interactive.len()
        );
        Ok(dispatcher)
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable scene access. Call [`rescan_scene`](Self::rescan_scene) after
    /// adding or removing nodes and joints.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn store(&self) -> &ConnectorStore {
        &self.store
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn transformer(&self) -> &CoordinateTransformer {
        &self.transformer
    }

    pub fn drag_controller(&self) -> &DragController {
        &self.drag
    }

    pub fn connect_controller(&self) -> &PathDragController {
        &self.connect
    }

    pub fn selection(&self) -> &ConnectorSelection {
        &self.selection
    }

    pub fn paths_model(&self) -> ModelRc<ConnectorPath> {
        self.store.paths_model()
    }

    /// Whether a move or connect gesture is in flight.
    pub fn has_active_gesture(&self) -> bool {
        self.drag.is_active() || self.connect.is_active()
    }

    /// Re-read the canvas layout, draggable nodes and interactive joints, then
    /// redraw all connectors.
    pub fn rescan_scene(&mut self) -> Result<(), EditorError> {
        let layout = self
            .scene
            .canvas_layout()
            .ok_or(EditorError::MissingSceneRoot)?
            .validate()?;
        self.transformer.set_layout(layout);
        self.enumerate();
        self.store.redraw_all(&self.scene);
        self.sync_selection();
        Ok(())
    }

    /// Update the canvas placement after the host re-laid out the page.
    pub fn set_canvas_layout(&mut self, layout: CanvasLayout) -> Result<(), EditorError> {
        self.transformer.set_layout(layout.validate()?);
        Ok(())
    }

    /// Create a connector outside of a gesture, e.g. when loading a document.
    pub fn connect_joints(&mut self, start_pin: i32, end_pin: i32) -> Result<i32, Rejection> {
        let connector_id = self
            .store
            .create(start_pin, end_pin, self.config.path_type, &self.scene)?;
        self.bus.emit(EditorEvent::ConnectorCreated {
            connector_id,
            start_pin,
            end_pin,
        });
        Ok(connector_id)
    }

    pub fn delete_connector(&mut self, connector_id: i32) -> bool {
        let deleted = self.store.delete_by_id(connector_id);
        self.sync_selection();
        deleted
    }

    pub fn delete_all_connectors(&mut self) {
        self.store.delete_all();
        self.sync_selection();
    }

    /// Delete the connectors of a node about to be removed by the host.
    pub fn detach_node(&mut self, node_id: i32) -> usize {
        let removed = self.store.delete_for_node(node_id, &self.scene);
        self.sync_selection();
        removed
    }

    pub fn redraw_all(&mut self) -> usize {
        self.store.redraw_all(&self.scene)
    }

    /// Delete connectors whose joints vanished, see [`ConnectorStore::stale`].
    pub fn purge_stale(&mut self) -> usize {
        let removed = self.store.purge_stale();
        self.sync_selection();
        removed
    }

    /// Feed a Slint window event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> InputResult {
        match RawInput::from_window_event(event) {
            Some(input) => self.handle(&input),
            None => InputResult::Ignored,
        }
    }

    /// Route one input event to the gesture controllers.
    ///
    /// Never fails: problems are logged and the event becomes a no-op.
    pub fn handle(&mut self, input: &RawInput) -> InputResult {
        if let RawInput::Key { .. } = input {
            return if input.is_delete_key() {
                self.delete_selected()
            } else {
                InputResult::Ignored
            };
        }

        let Some(sample) = normalize(input, self.last_pointer) else {
            log::debug!("input without a pointer position ignored");
            return InputResult::Ignored;
        };
        self.last_pointer = Some((sample.x, sample.y));

        match sample.phase {
            Phase::Begin => self.pointer_down(sample.x, sample.y),
            Phase::Move => self.pointer_move(sample.x, sample.y),
            Phase::End => self.pointer_up(sample.x, sample.y),
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32) -> InputResult {
        if self.has_active_gesture() {
            log::debug!("press ignored, gesture in flight");
            return InputResult::Ignored;
        }

        let pointer = self.transformer.screen_to_canvas(x, y);
        if !self.transformer.contains(pointer) {
            return InputResult::Ignored;
        }
        let (pz, local) = match self.locate(pointer) {
            Ok(located) => located,
            Err(err) => {
                log::warn!("press ignored: {}", err);
                return InputResult::Ignored;
            }
        };

        let joint = self.joint_at(local);
        let connector = match joint {
            Some(_) => None,
            None => self.connector_at(local),
        };

        // Anything but a connector press drops the active connector
        self.selection.click(connector);
        self.sync_selection();

        if let Some(pin) = joint {
            let result = self
                .connect
                .begin(pin, pointer, &pz, &self.transformer, &self.scene);
            return self.captured_if(result, self.connect.is_active());
        }
        if connector.is_some() {
            return InputResult::Accepted;
        }

        if let Some(node_id) = self.node_at(local) {
            let result = self
                .drag
                .begin(node_id, pointer, &pz, &self.transformer, &self.scene);
            return self.captured_if(result, self.drag.is_active());
        }

        InputResult::Accepted
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> InputResult {
        let pointer = self.transformer.screen_to_canvas(x, y);

        if self.drag.is_active() {
            let result = self.locate(pointer).and_then(|(pz, _)| {
                self.drag.update(
                    pointer,
                    &pz,
                    &self.transformer,
                    &mut self.scene,
                    &mut self.store,
                )
            });
            if let Err(err) = result {
                log::warn!("move tick skipped: {}", err);
            }
            return InputResult::Captured;
        }

        if self.connect.is_active() {
            let result = self.locate(pointer).and_then(|(pz, _)| {
                self.connect
                    .update(pointer, &pz, &self.transformer, &self.scene)
            });
            if let Err(err) = result {
                log::warn!("preview tick skipped: {}", err);
            }
            return InputResult::Captured;
        }

        let hovered = if self.transformer.contains(pointer) {
            self.locate(pointer)
                .ok()
                .and_then(|(_, local)| self.connector_at(local))
        } else {
            None
        };
        if self.selection.hover(hovered) {
            self.sync_selection();
            InputResult::Accepted
        } else {
            InputResult::Ignored
        }
    }

    fn pointer_up(&mut self, x: f32, y: f32) -> InputResult {
        if self.drag.is_active() {
            self.drag.end();
            return InputResult::Accepted;
        }

        if self.connect.is_active() {
            let pointer = self.transformer.screen_to_canvas(x, y);
            match self.transformer.pan_zoom(&*self.viewport) {
                Ok(pz) => {
                    self.connect.finish(
                        pointer,
                        &pz,
                        &self.transformer,
                        &self.scene,
                        &mut self.store,
                    );
                }
                Err(err) => {
                    log::warn!("connect gesture dropped: {}", err);
                    self.connect.cancel();
                }
            }
            return InputResult::Accepted;
        }

        InputResult::Ignored
    }

    fn delete_selected(&mut self) -> InputResult {
        let Some(id) = self.selection.active() else {
            return InputResult::Ignored;
        };
        let Some(connector) = self.store.find_by_id(id).copied() else {
            self.sync_selection();
            return InputResult::Ignored;
        };

        if !self.delete.delete(&connector, &mut self.store) {
            return InputResult::Ignored;
        }
        self.sync_selection();
        InputResult::Accepted
    }

    /// Pan/zoom state for this tick and the pointer in local canvas space.
    fn locate(&self, pointer: LogicalPosition) -> Result<(PanZoomState, LogicalPosition), EditorError> {
        let pz = self.transformer.pan_zoom(&*self.viewport)?;
        let local = self.transformer.pan_zoom_to_canvas_space(pointer, &pz)?;
        Ok((pz, local))
    }

    fn joint_at(&self, local: LogicalPosition) -> Option<i32> {
        if !self.config.interactive_joints {
            return None;
        }
        let joints = self
            .interactive
            .iter()
            .filter(|&&pin| self.scene.joint(pin).is_some_and(|j| j.connectable))
            .filter_map(|&pin| Some((pin, self.scene.joint_position(pin)?)));
        find_joint_at(local, joints, self.config.joint_hit_radius)
    }

    fn connector_at(&self, local: LogicalPosition) -> Option<i32> {
        find_connector_at(
            local,
            self.store.geometries(&self.scene),
            self.config.connector_hover_distance,
            self.store.style(),
        )
    }

    fn node_at(&self, local: LogicalPosition) -> Option<i32> {
        let nodes = self
            .draggable
            .iter()
            .filter_map(|&id| self.scene.node(id));
        find_node_at(local, nodes)
    }

    fn captured_if(&self, result: Result<(), EditorError>, active: bool) -> InputResult {
        match result {
            Ok(()) if active => InputResult::Captured,
            Ok(()) => InputResult::Accepted,
            Err(err) => {
                log::warn!("gesture not started: {}", err);
                InputResult::Ignored
            }
        }
    }

    fn enumerate(&mut self) {
        self.draggable = self.scene.draggable_nodes();
        self.interactive = self.scene.interactive_joints();
    }

    /// Drop selection entries for deleted connectors and refresh highlights.
    fn sync_selection(&mut self) {
        let store = &self.store;
        self.selection.retain(|id| store.find_by_id(id).is_some());
        self.store
            .set_highlight(self.selection.hovered(), self.selection.active());
    }
}
