//! Error types shared by the editor core.

use thiserror::Error;

/// Errors reported by the coordinate pipeline, scene lookups and initialization.
///
/// None of these ever escape [`InputDispatcher::handle`](crate::InputDispatcher::handle):
/// the dispatcher logs them and treats the tick as a no-op.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// The viewport reported a scale that cannot be inverted.
    #[error("invalid viewport state: scale {scale} is not a usable zoom factor")]
    InvalidViewport { scale: f32 },
    /// The viewport provider had no pan/zoom state to offer.
    #[error("viewport provider unavailable")]
    ViewportUnavailable,
    /// The scene has no canvas root to attach to.
    #[error("scene root is missing")]
    MissingSceneRoot,
    /// The scene root exists but its layout is unusable.
    #[error("scene root is malformed: {0}")]
    MalformedSceneRoot(String),
    #[error("node {0} not found")]
    NodeNotFound(i32),
    #[error("joint {0} not found")]
    JointNotFound(i32),
    #[error("connector {0} not found")]
    ConnectorNotFound(i32),
}
