//! Coordinate pipeline between screen, canvas and pan/zoom space.
//!
//! Three spaces are involved:
//!
//! - **screen**: raw pointer coordinates as reported by the window.
//! - **canvas**: local canvas coordinates, the space node translations and
//!   joint offsets live in.
//! - **pan/zoom**: canvas coordinates after the viewport's scale and
//!   translation, `x' = x * scale + translate_x`. This is where content
//!   actually appears relative to the canvas element's origin.
//!
//! A pointer position is first made relative to the canvas element with
//! [`CoordinateTransformer::screen_to_canvas`]. Because the canvas content is
//! drawn through the viewport transform, that point is a pan/zoom space
//! position; [`CoordinateTransformer::pan_zoom_to_canvas_space`] brings it back
//! to the local canvas space used for hit testing and node placement.

use crate::error::EditorError;
use slint::{LogicalPosition, LogicalSize};

/// Snapshot of the external viewport's pan and zoom.
///
/// Queried fresh on every gesture tick and never cached across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanZoomState {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for PanZoomState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl PanZoomState {
    pub fn new(scale: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Reject states whose scale cannot be divided by.
    pub fn validate(self) -> Result<Self, EditorError> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return Err(EditorError::InvalidViewport { scale: self.scale });
        }
        Ok(self)
    }
}

/// Source of the current pan/zoom state, owned by the host.
///
/// Returning `None` means the viewport is not available right now.
pub trait ViewportProvider {
    fn pan_zoom_state(&self) -> Option<PanZoomState>;
}

/// A fixed viewport.
impl ViewportProvider for PanZoomState {
    fn pan_zoom_state(&self) -> Option<PanZoomState> {
        Some(*self)
    }
}

impl<F> ViewportProvider for F
where
    F: Fn() -> Option<PanZoomState>,
{
    fn pan_zoom_state(&self) -> Option<PanZoomState> {
        self()
    }
}

/// Screen-space placement of the canvas element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    /// Top-left corner of the canvas in screen coordinates
    pub origin: LogicalPosition,
    pub size: LogicalSize,
}

impl CanvasLayout {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: LogicalPosition::new(x, y),
            size: LogicalSize::new(width, height),
        }
    }

    /// Check that the layout describes a usable canvas.
    pub fn validate(self) -> Result<Self, EditorError> {
        let values = [self.origin.x, self.origin.y, self.size.width, self.size.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EditorError::MalformedSceneRoot(
                "canvas layout contains non-finite values".into(),
            ));
        }
        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return Err(EditorError::MalformedSceneRoot(format!(
                "canvas size {}x{} is empty",
                self.size.width, self.size.height
            )));
        }
        Ok(self)
    }
}

/// Converts pointer coordinates between the three coordinate spaces.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTransformer {
    layout: CanvasLayout,
}

impl CoordinateTransformer {
    pub fn new(layout: CanvasLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> CanvasLayout {
        self.layout
    }

    /// Update the canvas placement after the host re-laid out the page.
    pub fn set_layout(&mut self, layout: CanvasLayout) {
        self.layout = layout;
    }

    /// Make a screen position relative to the canvas element.
    pub fn screen_to_canvas(&self, client_x: f32, client_y: f32) -> LogicalPosition {
        LogicalPosition::new(client_x - self.layout.origin.x, client_y - self.layout.origin.y)
    }

    /// Whether a canvas-relative point lies inside the canvas bounding box.
    pub fn contains(&self, point: LogicalPosition) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x <= self.layout.size.width
            && point.y <= self.layout.size.height
    }

    /// Fetch and validate the viewport state for the current tick.
    pub fn pan_zoom(&self, provider: &dyn ViewportProvider) -> Result<PanZoomState, EditorError> {
        provider
            .pan_zoom_state()
            .ok_or(EditorError::ViewportUnavailable)?
            .validate()
    }

    /// `x' = x * scale + translate_x`, `y' = y * scale + translate_y`.
    pub fn canvas_to_pan_zoom_space(
        &self,
        point: LogicalPosition,
        pan_zoom: &PanZoomState,
    ) -> Result<LogicalPosition, EditorError> {
        let pz = pan_zoom.validate()?;
        Ok(LogicalPosition::new(
            point.x * pz.scale + pz.translate_x,
            point.y * pz.scale + pz.translate_y,
        ))
    }

    /// Inverse of [`canvas_to_pan_zoom_space`](Self::canvas_to_pan_zoom_space).
    pub fn pan_zoom_to_canvas_space(
        &self,
        point: LogicalPosition,
        pan_zoom: &PanZoomState,
    ) -> Result<LogicalPosition, EditorError> {
        let pz = pan_zoom.validate()?;
        Ok(LogicalPosition::new(
            (point.x - pz.translate_x) / pz.scale,
            (point.y - pz.translate_y) / pz.scale,
        ))
    }

    /// Screen position straight to local canvas space.
    pub fn screen_to_local(
        &self,
        client_x: f32,
        client_y: f32,
        pan_zoom: &PanZoomState,
    ) -> Result<LogicalPosition, EditorError> {
        self.pan_zoom_to_canvas_space(self.screen_to_canvas(client_x, client_y), pan_zoom)
    }
}
