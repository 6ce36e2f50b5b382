//! Connector path geometry.
//!
//! Every function here is pure: given two endpoint positions in local canvas
//! space and a [`PathStyle`], it produces SVG path commands (or segment
//! descriptions) for the renderer. Zoom is applied by the viewport transform
//! of the container, not here.

use slint::LogicalPosition;

/// Shape used to draw a connector between its two joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathType {
    /// A single straight segment
    Line,
    /// Three parallel straight segments, see [`triple_line_segments`]
    #[default]
    TripleLine,
    /// Horizontal-biased cubic bezier
    Bezier,
}

/// Styling constants that influence path geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub stroke_width: f32,
    /// Perpendicular distance of the outer segments of a triple line
    pub triple_offset: f32,
    /// Minimum control point offset of bezier paths
    pub bezier_offset: f32,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroke_width: 5.0,
            triple_offset: 5.0,
            bezier_offset: 50.0,
        }
    }
}

/// One straight stroke of a connector drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: LogicalPosition,
    pub end: LogicalPosition,
    pub stroke_width: f32,
}

impl Segment {
    /// SVG path command for this segment, e.g. `"M 0 0 L 10 0"`
    pub fn to_commands(&self) -> String {
        format!(
            "M {} {} L {} {}",
            self.start.x, self.start.y, self.end.x, self.end.y
        )
    }
}

/// Build the three parallel segments of an offset-triple connector.
///
/// The first segment runs along the straight line between `start` and `end`.
/// The second and third are shifted by `offset` along the line's normal, one
/// on each side. All three share `stroke_width`. For coincident endpoints the
/// normal is undefined and all three segments collapse onto the center.
pub fn triple_line_segments(
    start: LogicalPosition,
    end: LogicalPosition,
    offset: f32,
    stroke_width: f32,
) -> [Segment; 3] {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = (dx * dx + dy * dy).sqrt();

    let (nx, ny) = if len < f32::EPSILON {
        (0.0, 0.0)
    } else {
        (-dy / len * offset, dx / len * offset)
    };

    let shifted = |sign: f32| Segment {
        start: LogicalPosition::new(start.x + sign * nx, start.y + sign * ny),
        end: LogicalPosition::new(end.x + sign * nx, end.y + sign * ny),
        stroke_width,
    };

    [shifted(0.0), shifted(1.0), shifted(-1.0)]
}

/// SVG path command for a straight connector.
pub fn generate_line_path(start: LogicalPosition, end: LogicalPosition) -> String {
    Segment {
        start,
        end,
        stroke_width: 0.0,
    }
    .to_commands()
}

/// SVG path command for an offset-triple connector (three subpaths).
pub fn generate_triple_path(start: LogicalPosition, end: LogicalPosition, offset: f32) -> String {
    triple_line_segments(start, end, offset, 0.0)
        .iter()
        .map(Segment::to_commands)
        .collect::<Vec<_>>()
        .join(" ")
}

/// SVG path command for a bezier connector.
///
/// Joints closer than [`STRAIGHT_THRESHOLD`] are joined with a straight line.
pub fn generate_bezier_path(start: LogicalPosition, end: LogicalPosition, min_offset: f32) -> String {
    BezierCurve::between(start, end, min_offset).to_commands()
}

/// Path commands for the given path type.
pub fn generate_path(
    path_type: PathType,
    start: LogicalPosition,
    end: LogicalPosition,
    style: &PathStyle,
) -> String {
    match path_type {
        PathType::Line => generate_line_path(start, end),
        PathType::TripleLine => generate_triple_path(start, end, style.triple_offset),
        PathType::Bezier => generate_bezier_path(start, end, style.bezier_offset),
    }
}

/// Joints closer than this are connected without curvature.
pub const STRAIGHT_THRESHOLD: f32 = 10.0;

/// Number of straight strokes a bezier connector is flattened into for hit
/// testing.
const BEZIER_STEPS: usize = 20;

fn lerp(a: LogicalPosition, b: LogicalPosition, t: f32) -> LogicalPosition {
    LogicalPosition::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Cubic curve of a bezier connector.
///
/// The handles leave the start joint to the right and enter the end joint
/// from the left, so connectors read left to right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    pub start: LogicalPosition,
    pub out_handle: LogicalPosition,
    pub in_handle: LogicalPosition,
    pub end: LogicalPosition,
}

impl BezierCurve {
    /// Curve between two joints with handles `max(|dx| / 2, min_offset)` long.
    pub fn between(start: LogicalPosition, end: LogicalPosition, min_offset: f32) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        if (dx * dx + dy * dy).sqrt() < STRAIGHT_THRESHOLD {
            return Self {
                start,
                out_handle: start,
                in_handle: end,
                end,
            };
        }

        let reach = (dx.abs() / 2.0).max(min_offset);
        Self {
            start,
            out_handle: LogicalPosition::new(start.x + reach, start.y),
            in_handle: LogicalPosition::new(end.x - reach, end.y),
            end,
        }
    }

    /// True when the handles sit on the endpoints and the curve is a line.
    pub fn is_straight(&self) -> bool {
        self.out_handle == self.start && self.in_handle == self.end
    }

    /// Point on the curve at `t` in `0.0..=1.0` (de Casteljau).
    pub fn point_at(&self, t: f32) -> LogicalPosition {
        let a = lerp(self.start, self.out_handle, t);
        let b = lerp(self.out_handle, self.in_handle, t);
        let c = lerp(self.in_handle, self.end, t);
        lerp(lerp(a, b, t), lerp(b, c, t), t)
    }

    pub fn to_commands(&self) -> String {
        if self.is_straight() {
            return generate_line_path(self.start, self.end);
        }
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.start.x,
            self.start.y,
            self.out_handle.x,
            self.out_handle.y,
            self.in_handle.x,
            self.in_handle.y,
            self.end.x,
            self.end.y
        )
    }

    /// Approximate the curve with `steps` straight segments.
    pub fn flatten(&self, steps: usize, stroke_width: f32) -> Vec<Segment> {
        if self.is_straight() || steps == 0 {
            return vec![Segment {
                start: self.start,
                end: self.end,
                stroke_width,
            }];
        }
        (0..steps)
            .map(|i| Segment {
                start: self.point_at(i as f32 / steps as f32),
                end: self.point_at((i + 1) as f32 / steps as f32),
                stroke_width,
            })
            .collect()
    }
}

/// Distance from a point to a straight segment.
pub fn distance_to_segment(point: LogicalPosition, a: LogicalPosition, b: LogicalPosition) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq < f32::EPSILON {
        0.0
    } else {
        (((point.x - a.x) * abx + (point.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let closest = lerp(a, b, t);
    (point.x - closest.x).hypot(point.y - closest.y)
}

/// Straight strokes that make up a connector's drawn geometry.
///
/// Bezier connectors are flattened, so every path type hit-tests the same way.
pub fn path_segments(
    path_type: PathType,
    start: LogicalPosition,
    end: LogicalPosition,
    style: &PathStyle,
) -> Vec<Segment> {
    match path_type {
        PathType::Line => vec![Segment {
            start,
            end,
            stroke_width: style.stroke_width,
        }],
        PathType::TripleLine => {
            triple_line_segments(start, end, style.triple_offset, style.stroke_width).to_vec()
        }
        PathType::Bezier => BezierCurve::between(start, end, style.bezier_offset)
            .flatten(BEZIER_STEPS, style.stroke_width),
    }
}

/// Distance from a point to the drawn geometry of a connector.
pub fn distance_to_path(
    path_type: PathType,
    point: LogicalPosition,
    start: LogicalPosition,
    end: LogicalPosition,
    style: &PathStyle,
) -> f32 {
    path_segments(path_type, start, end, style)
        .iter()
        .map(|s| distance_to_segment(point, s.start, s.end))
        .fold(f32::MAX, f32::min)
}
