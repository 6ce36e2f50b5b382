//! Draw-connector gesture.
//!
//! A press on a connectable joint starts a preview path that follows the
//! pointer. Releasing over a different connectable joint asks the
//! [`ConnectorStore`] to create the connector; releasing anywhere else drops
//! the preview without any notification.

use slint::{LogicalPosition, SharedString};

use crate::config::EditorConfig;
use crate::connectors::ConnectorStore;
use crate::error::EditorError;
use crate::events::{EditorEvent, EventBus};
use crate::hit_test::find_joint_at;
use crate::path::{generate_path, PathStyle, PathType};
use crate::scene::SceneProvider;
use crate::session::{DragSession, GestureKind, GestureSubject};
use crate::transform::{CoordinateTransformer, PanZoomState};

/// In-flight connector preview.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub session: DragSession,
    /// Candidate target joint under the pointer
    pub hovered: Option<i32>,
    /// Path commands from the origin joint to the pointer
    pub path: SharedString,
}

impl Preview {
    pub fn origin(&self) -> Option<i32> {
        match self.session.subject {
            GestureSubject::Joint(pin) => Some(pin),
            GestureSubject::Node(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectState {
    #[default]
    Idle,
    Previewing(Preview),
}

pub struct PathDragController {
    state: ConnectState,
    bus: EventBus,
    path_type: PathType,
    style: PathStyle,
    hit_radius: f32,
}

impl PathDragController {
    pub fn new(config: &EditorConfig, bus: EventBus) -> Self {
        Self {
            state: ConnectState::Idle,
            bus,
            path_type: config.path_type,
            style: config.path_style(),
            hit_radius: config.joint_hit_radius,
        }
    }

    pub fn state(&self) -> &ConnectState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ConnectState::Previewing(_))
    }

    /// Joint currently highlighted as a connection target.
    pub fn hovered_joint(&self) -> Option<i32> {
        match &self.state {
            ConnectState::Previewing(preview) => preview.hovered,
            ConnectState::Idle => None,
        }
    }

    /// Path commands of the live preview, if a gesture is in flight.
    pub fn preview_path(&self) -> Option<SharedString> {
        match &self.state {
            ConnectState::Previewing(preview) => Some(preview.path.clone()),
            ConnectState::Idle => None,
        }
    }

    /// Start a preview from `pin_id`. `pointer` is in pan/zoom space.
    pub fn begin(
        &mut self,
        pin_id: i32,
        pointer: LogicalPosition,
        pan_zoom: &PanZoomState,
        transformer: &CoordinateTransformer,
        scene: &dyn SceneProvider,
    ) -> Result<(), EditorError> {
        if self.is_active() {
            log::debug!("connect begin on joint {} ignored, gesture in flight", pin_id);
            return Ok(());
        }

        let joint = scene.joint(pin_id).ok_or(EditorError::JointNotFound(pin_id))?;
        if !joint.connectable {
            log::debug!("joint {} is not connectable", pin_id);
            return Ok(());
        }
        let start = scene
            .joint_position(pin_id)
            .ok_or(EditorError::JointNotFound(pin_id))?;
        let start_canvas = transformer.pan_zoom_to_canvas_space(pointer, pan_zoom)?;

        let session = DragSession::new(
            GestureKind::DrawPath,
            GestureSubject::Joint(pin_id),
            start,
            start_canvas,
            pointer,
        );
        let path = generate_path(self.path_type, start, start_canvas, &self.style).into();
        self.state = ConnectState::Previewing(Preview {
            session,
            hovered: None,
            path,
        });

        log::debug!("connect preview started from joint {}", pin_id);
        Ok(())
    }

    /// Move the preview end to the pointer and refresh the hovered joint.
    ///
    /// A tick outside the canvas leaves the preview unchanged.
    pub fn update(
        &mut self,
        pointer: LogicalPosition,
        pan_zoom: &PanZoomState,
        transformer: &CoordinateTransformer,
        scene: &dyn SceneProvider,
    ) -> Result<(), EditorError> {
        let ConnectState::Previewing(preview) = &self.state else {
            return Ok(());
        };
        if !transformer.contains(pointer) {
            return Ok(());
        }
        let Some(origin) = preview.origin() else {
            return Ok(());
        };

        let local = transformer.pan_zoom_to_canvas_space(pointer, pan_zoom)?;
        let start = preview.session.start_position;
        let hovered = self.target_at(origin, local, scene);
        let path = generate_path(self.path_type, start, local, &self.style).into();

        if let ConnectState::Previewing(preview) = &mut self.state {
            preview.session.delta = (
                local.x - preview.session.start_canvas.x,
                local.y - preview.session.start_canvas.y,
            );
            preview.hovered = hovered;
            preview.path = path;
        }
        Ok(())
    }

    /// End the gesture at `pointer`, creating a connector if it rests on a
    /// valid target. Returns the new connector id.
    pub fn finish(
        &mut self,
        pointer: LogicalPosition,
        pan_zoom: &PanZoomState,
        transformer: &CoordinateTransformer,
        scene: &dyn SceneProvider,
        store: &mut ConnectorStore,
    ) -> Option<i32> {
        let ConnectState::Previewing(preview) = std::mem::take(&mut self.state) else {
            return None;
        };
        let origin = preview.origin()?;

        if !transformer.contains(pointer) {
            log::debug!("connect from joint {} released outside canvas", origin);
            return None;
        }
        let local = match transformer.pan_zoom_to_canvas_space(pointer, pan_zoom) {
            Ok(local) => local,
            Err(err) => {
                log::warn!("connect from joint {} dropped: {}", origin, err);
                return None;
            }
        };

        let Some(target) = self.target_at(origin, local, scene) else {
            log::debug!("connect from joint {} released over no target", origin);
            return None;
        };

        match store.create(origin, target, self.path_type, scene) {
            Ok(connector_id) => {
                self.bus.emit(EditorEvent::ConnectorCreated {
                    connector_id,
                    start_pin: origin,
                    end_pin: target,
                });
                Some(connector_id)
            }
            Err(rejection) => {
                log::debug!("connector {} -> {} rejected: {}", origin, target, rejection);
                None
            }
        }
    }

    /// Drop the preview without creating anything.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = ConnectState::Idle;
        was_active
    }

    fn target_at(
        &self,
        origin: i32,
        point: LogicalPosition,
        scene: &dyn SceneProvider,
    ) -> Option<i32> {
        let candidates = scene
            .joints()
            .into_iter()
            .filter(|j| j.pin_id != origin && j.connectable)
            .filter_map(|j| Some((j.pin_id, scene.joint_position(j.pin_id)?)));
        find_joint_at(point, candidates, self.hit_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::scene::SceneGraph;
    use crate::transform::CanvasLayout;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixture {
        scene: SceneGraph,
        store: ConnectorStore,
        transformer: CoordinateTransformer,
        connect: PathDragController,
        events: Rc<RefCell<Vec<EditorEvent>>>,
    }

    fn fixture_with(config: EditorConfig) -> Fixture {
        let layout = CanvasLayout::new(0.0, 0.0, 800.0, 600.0);
        let mut scene = SceneGraph::new(layout);
        scene
            .add_node(1, 0.0, 0.0, 100.0, 50.0)
            .add_node(2, 300.0, 0.0, 100.0, 50.0)
            .add_node(3, 300.0, 200.0, 100.0, 50.0)
            .add_joint(1001, 1, 100.0, 25.0)
            .add_joint(2001, 2, 0.0, 25.0)
            .add_joint(3001, 3, 0.0, 25.0);
        scene.set_connectable(3001, false);

        let bus = EventBus::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe({
            let events = events.clone();
            move |e| events.borrow_mut().push(e.clone())
        });

        Fixture {
            scene,
            store: ConnectorStore::new(&config, bus.clone()),
            transformer: CoordinateTransformer::new(layout),
            connect: PathDragController::new(&config, bus),
            events,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(EditorConfig::default().with_path_type(PathType::Line))
    }

    fn p(x: f32, y: f32) -> LogicalPosition {
        LogicalPosition::new(x, y)
    }

    impl Fixture {
        fn begin(&mut self, pin: i32, at: LogicalPosition) {
            self.connect
                .begin(pin, at, &PanZoomState::default(), &self.transformer, &self.scene)
                .unwrap();
        }

        fn update(&mut self, at: LogicalPosition) {
            self.connect
                .update(at, &PanZoomState::default(), &self.transformer, &self.scene)
                .unwrap();
        }

        fn finish(&mut self, at: LogicalPosition) -> Option<i32> {
            self.connect.finish(
                at,
                &PanZoomState::default(),
                &self.transformer,
                &self.scene,
                &mut self.store,
            )
        }
    }

    #[test]
    fn test_connect_two_joints() {
        let mut f = fixture();
        f.begin(1001, p(100.0, 25.0));
        assert!(f.connect.is_active());

        f.update(p(200.0, 25.0));
        assert_eq!(f.connect.hovered_joint(), None);
        f.update(p(298.0, 27.0));
        assert_eq!(f.connect.hovered_joint(), Some(2001));

        let id = f.finish(p(298.0, 27.0)).unwrap();
        assert_eq!(f.connect.state(), &ConnectState::Idle);

        let connector = f.store.find_by_id(id).unwrap();
        assert_eq!((connector.endpoint_a, connector.endpoint_b), (1001, 2001));
        assert_eq!(connector.path_type, PathType::Line);
        assert_eq!(
            *f.events.borrow(),
            vec![EditorEvent::ConnectorCreated {
                connector_id: id,
                start_pin: 1001,
                end_pin: 2001,
            }]
        );
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut f = fixture();
        f.begin(1001, p(100.0, 25.0));
        f.update(p(150.0, 80.0));
        assert_eq!(
            f.connect.preview_path().as_deref(),
            Some("M 100 25 L 150 80")
        );
    }

    #[test]
    fn test_preview_uses_pan_zoom_pipeline() {
        let mut f = fixture();
        let pz = PanZoomState::new(2.0, 10.0, 10.0);
        // Joint 1001 drawn at 100 * 2 + 10 = 210, 25 * 2 + 10 = 60
        f.connect
            .begin(1001, p(210.0, 60.0), &pz, &f.transformer, &f.scene)
            .unwrap();
        f.connect
            .update(p(610.0, 60.0), &pz, &f.transformer, &f.scene)
            .unwrap();

        assert_eq!(f.connect.preview_path().as_deref(), Some("M 100 25 L 300 25"));
        assert_eq!(f.connect.hovered_joint(), Some(2001));
    }

    #[test]
    fn test_origin_is_never_hovered() {
        let mut f = fixture();
        f.begin(1001, p(100.0, 25.0));
        f.update(p(101.0, 25.0));
        assert_eq!(f.connect.hovered_joint(), None);

        assert_eq!(f.finish(p(101.0, 25.0)), None);
        assert!(f.store.is_empty());
        assert!(f.events.borrow().is_empty());
    }

    #[test]
    fn test_release_over_non_connectable_joint_is_silent() {
        let mut f = fixture();
        f.begin(1001, p(100.0, 25.0));
        f.update(p(300.0, 225.0));
        assert_eq!(f.connect.hovered_joint(), None);

        assert_eq!(f.finish(p(300.0, 225.0)), None);
        assert!(f.store.is_empty());
        assert!(f.events.borrow().is_empty());
        assert!(!f.connect.is_active());
    }

    #[test]
    fn test_release_over_empty_canvas_is_silent() {
        let mut f = fixture();
        f.begin(1001, p(100.0, 25.0));
        f.update(p(500.0, 500.0));
        assert_eq!(f.finish(p(500.0, 500.0)), None);
        assert!(f.events.borrow().is_empty());
    }

    #[test]
    fn test_release_outside_canvas_aborts() {
        let mut f = fixture();
        f.begin(1001, p(100.0, 25.0));
        assert_eq!(f.finish(p(900.0, 25.0)), None);
        assert!(!f.connect.is_active());
    }

    #[test]
    fn test_duplicate_is_rejected_silently() {
        let mut f = fixture();
        f.begin(1001, p(100.0, 25.0));
        assert!(f.finish(p(300.0, 25.0)).is_some());

        f.begin(2001, p(300.0, 25.0));
        assert_eq!(f.finish(p(100.0, 25.0)), None);

        assert_eq!(f.store.len(), 1);
        let created = f
            .events
            .borrow()
            .iter()
            .filter(|e| e.kind() == EventKind::ConnectorCreated)
            .count();
        assert_eq!(created, 1);
    }

    #[test]
    fn test_begin_on_non_connectable_joint() {
        let mut f = fixture();
        f.begin(3001, p(300.0, 225.0));
        assert!(!f.connect.is_active());
    }

    #[test]
    fn test_begin_on_missing_joint() {
        let mut f = fixture();
        let result = f.connect.begin(
            42,
            p(0.0, 0.0),
            &PanZoomState::default(),
            &f.transformer,
            &f.scene,
        );
        assert_eq!(result, Err(EditorError::JointNotFound(42)));
    }

    #[test]
    fn test_triple_line_preview() {
        let mut f = fixture_with(EditorConfig::default());
        f.begin(1001, p(100.0, 25.0));
        f.update(p(200.0, 25.0));
        assert_eq!(
            f.connect.preview_path().as_deref(),
            Some("M 100 25 L 200 25 M 100 30 L 200 30 M 100 20 L 200 20")
        );
    }

    #[test]
    fn test_cancel() {
        let mut f = fixture();
        f.begin(1001, p(100.0, 25.0));
        assert!(f.connect.cancel());
        assert!(!f.connect.cancel());
        assert!(f.connect.preview_path().is_none());
    }
}
