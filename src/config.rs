use crate::path::{PathStyle, PathType};

/// Editor settings, fixed when the [`InputDispatcher`](crate::InputDispatcher) is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Enable joint hover and connect interactions
    pub interactive_joints: bool,
    pub connector_stroke_width: f32,
    /// Perpendicular offset of the outer lines of a triple-line connector
    pub connector_triple_offset: f32,
    pub path_type: PathType,
    /// Reject a connector whose unordered joint pair is already connected
    pub unique_connectors: bool,
    /// Pointer distance within which a joint counts as hit
    pub joint_hit_radius: f32,
    /// Pointer distance within which a connector counts as hovered
    pub connector_hover_distance: f32,
    pub bezier_offset: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            interactive_joints: true,
            connector_stroke_width: 5.0,
            connector_triple_offset: 5.0,
            path_type: PathType::TripleLine,
            unique_connectors: true,
            joint_hit_radius: 10.0,
            connector_hover_distance: 6.0,
            bezier_offset: 50.0,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interactive_joints(mut self, enabled: bool) -> Self {
        self.interactive_joints = enabled;
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.connector_stroke_width = width;
        self
    }

    pub fn with_triple_offset(mut self, offset: f32) -> Self {
        self.connector_triple_offset = offset;
        self
    }

    pub fn with_path_type(mut self, path_type: PathType) -> Self {
        self.path_type = path_type;
        self
    }

    pub fn with_unique_connectors(mut self, unique: bool) -> Self {
        self.unique_connectors = unique;
        self
    }

    pub fn with_joint_hit_radius(mut self, radius: f32) -> Self {
        self.joint_hit_radius = radius;
        self
    }

    pub fn with_connector_hover_distance(mut self, distance: f32) -> Self {
        self.connector_hover_distance = distance;
        self
    }

    pub fn with_bezier_offset(mut self, offset: f32) -> Self {
        self.bezier_offset = offset;
        self
    }

    /// Geometry constants handed to the path functions.
    pub fn path_style(&self) -> PathStyle {
        PathStyle {
            stroke_width: self.connector_stroke_width,
            triple_offset: self.connector_triple_offset,
            bezier_offset: self.bezier_offset,
        }
    }
}
