//! # Slint Joint Editor
//!
//! The interaction engine of a node-and-connector editor drawn on a pannable,
//! zoomable canvas. Users drag nodes around and draw connectors between the
//! joints on those nodes; this crate owns the gesture state machines, the
//! coordinate pipeline and the connector bookkeeping. Rendering stays in Slint.
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_joint_editor::{CanvasLayout, EditorConfig, InputDispatcher, SceneGraph};
//!
//! let mut scene = SceneGraph::new(CanvasLayout::new(0.0, 0.0, 800.0, 600.0));
//! scene.add_node(1, 40.0, 40.0, 120.0, 60.0).add_joint(10, 1, 120.0, 30.0);
//!
//! let viewport = move || Some(window.get_pan_zoom());
//! let mut editor = InputDispatcher::new(scene, viewport, EditorConfig::default())?;
//! window.set_connector_paths(editor.paths_model());
//! ```
//!
//! ## Core Components
//!
//! - [`CoordinateTransformer`] - screen, canvas and pan/zoom space conversions
//! - [`ConnectorStore`] - ordered connectors and their drawables
//! - [`DragController`] - move-node gesture
//! - [`PathDragController`] - draw-connector gesture
//! - [`InputDispatcher`] - routes pointer, touch and key input
//! - [`EventBus`] - synchronous domain notifications
//!
//! ## Rust Helpers
//!
//! - [`triple_line_segments`] - geometry of an offset-triple connector
//! - [`generate_path`] - SVG path commands for any [`PathType`]
//! - [`find_joint_at`], [`find_node_at`], [`find_connector_at`] - hit testing

pub mod config;
pub mod connect;
pub mod connectors;
pub mod dispatcher;
pub mod drag;
pub mod error;
pub mod events;
pub mod input;
pub mod path;
pub mod scene;
pub mod selection;
pub mod session;
pub mod transform;
pub mod validation;

pub use config::EditorConfig;
pub use connect::{ConnectState, PathDragController, Preview};
pub use connectors::{Connector, ConnectorPath, ConnectorStore};
pub use dispatcher::{DeleteStrategy, HostDelete, InputDispatcher, InputResult, InternalDelete};
pub use drag::{DragController, DragState};
pub use error::EditorError;
pub use events::{EditorEvent, EventBus, EventKind, SubscriptionId};
pub use hit_test::{find_connector_at, find_joint_at, find_node_at, ConnectorGeometry};
pub use input::{normalize, Phase, PointerPhase, PointerSample, RawInput, TouchPhase, TouchPoint};
pub use path::{
    distance_to_path, distance_to_segment, generate_bezier_path, generate_line_path,
    generate_path, generate_triple_path, path_segments, triple_line_segments, BezierCurve,
    PathStyle, PathType, Segment,
};
pub use scene::{JointInfo, NodeInfo, SceneGraph, SceneProvider};
pub use selection::ConnectorSelection;
pub use session::{DragSession, GestureKind, GestureSubject};
pub use transform::{CanvasLayout, CoordinateTransformer, PanZoomState, ViewportProvider};
pub use validation::{
    BasicConnectorValidator, CompositeValidator, ConnectorValidator, Rejection,
    UniquePairValidator,
};
