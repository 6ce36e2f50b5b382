use slint::LogicalPosition;

/// What a gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    MoveNode,
    DrawPath,
}

/// The element a gesture acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSubject {
    Node(i32),
    Joint(i32),
}

/// State of one in-flight gesture, alive from begin to end only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub kind: GestureKind,
    pub subject: GestureSubject,
    /// Subject position (node translation or joint position) at gesture start
    pub start_position: LogicalPosition,
    /// Pointer at gesture start in local canvas space
    pub start_canvas: LogicalPosition,
    /// Pointer at gesture start in pan/zoom space
    pub start_pan_zoom: LogicalPosition,
    /// Last computed pointer delta in local canvas units
    pub delta: (f32, f32),
}

impl DragSession {
    pub fn new(
        kind: GestureKind,
        subject: GestureSubject,
        start_position: LogicalPosition,
        start_canvas: LogicalPosition,
        start_pan_zoom: LogicalPosition,
    ) -> Self {
        Self {
            kind,
            subject,
            start_position,
            start_canvas,
            start_pan_zoom,
            delta: (0.0, 0.0),
        }
    }

    /// `start_position + delta`, the subject's position for the latest tick.
    pub fn current_position(&self) -> LogicalPosition {
        LogicalPosition::new(
            self.start_position.x + self.delta.0,
            self.start_position.y + self.delta.1,
        )
    }
}
