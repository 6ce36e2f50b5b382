use std::collections::BTreeMap;

use slint::LogicalPosition;

use crate::transform::CanvasLayout;

/// A positioned element on the canvas, in local canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeInfo {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub draggable: bool,
}

impl NodeInfo {
    pub fn position(&self) -> LogicalPosition {
        LogicalPosition::new(self.x, self.y)
    }

    /// Whether the point lies inside the node's grab region (its whole rect).
    pub fn contains(&self, point: LogicalPosition) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// An attachment point owned by a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointInfo {
    pub pin_id: i32,
    pub node_id: i32,
    /// Fixed offset from the owning node's position
    pub offset_x: f32,
    pub offset_y: f32,
    pub connectable: bool,
}

/// Host-side view of the editor's scene.
///
/// The core never owns nodes or joints; it resolves them by id through this
/// trait and writes node translations back through it.
pub trait SceneProvider {
    /// Placement of the canvas root, or `None` if there is no root.
    fn canvas_layout(&self) -> Option<CanvasLayout>;

    fn node(&self, id: i32) -> Option<NodeInfo>;

    fn joint(&self, pin_id: i32) -> Option<JointInfo>;

    /// Write a node's translation. Returns `false` if the node is unknown.
    fn set_node_position(&mut self, id: i32, x: f32, y: f32) -> bool;

    fn nodes(&self) -> Vec<NodeInfo>;

    fn joints(&self) -> Vec<JointInfo>;

    fn draggable_nodes(&self) -> Vec<i32> {
        self.nodes()
            .into_iter()
            .filter(|n| n.draggable)
            .map(|n| n.id)
            .collect()
    }

    fn interactive_joints(&self) -> Vec<i32> {
        self.joints()
            .into_iter()
            .filter(|j| j.connectable)
            .map(|j| j.pin_id)
            .collect()
    }

    /// Absolute joint position: owning node position plus the joint's offset.
    fn joint_position(&self, pin_id: i32) -> Option<LogicalPosition> {
        let joint = self.joint(pin_id)?;
        let node = self.node(joint.node_id)?;
        Some(LogicalPosition::new(
            node.x + joint.offset_x,
            node.y + joint.offset_y,
        ))
    }

    /// Joints owned by a node.
    fn joints_of(&self, node_id: i32) -> Vec<i32> {
        self.joints()
            .into_iter()
            .filter(|j| j.node_id == node_id)
            .map(|j| j.pin_id)
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct StoredNode {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    draggable: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct StoredJoint {
    pub node_id: i32,
    pub rel_x: f32,
    pub rel_y: f32,
    pub connectable: bool,
}

/// In-memory [`SceneProvider`] for hosts that keep the scene in Rust.
///
/// Nodes and joints are kept in id order so hit testing is deterministic.
#[derive(Default)]
pub struct SceneGraph {
    layout: Option<CanvasLayout>,
    nodes: BTreeMap<i32, StoredNode>,
    joints: BTreeMap<i32, StoredJoint>,
}

impl SceneGraph {
    pub fn new(layout: CanvasLayout) -> Self {
        Self {
            layout: Some(layout),
            ..Default::default()
        }
    }

    /// A scene without a canvas root, mostly useful for testing initialization.
    pub fn without_root() -> Self {
        Self::default()
    }

    pub fn set_layout(&mut self, layout: CanvasLayout) {
        self.layout = Some(layout);
    }

    /// Insert or replace a draggable node.
    pub fn add_node(&mut self, id: i32, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.nodes.insert(
            id,
            StoredNode {
                x,
                y,
                width,
                height,
                draggable: true,
            },
        );
        self
    }

    /// Insert or replace a connectable joint on a node.
    pub fn add_joint(&mut self, pin_id: i32, node_id: i32, rel_x: f32, rel_y: f32) -> &mut Self {
        self.joints.insert(
            pin_id,
            StoredJoint {
                node_id,
                rel_x,
                rel_y,
                connectable: true,
            },
        );
        self
    }

    pub fn set_draggable(&mut self, id: i32, draggable: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.draggable = draggable;
                true
            }
            None => false,
        }
    }

    pub fn set_connectable(&mut self, pin_id: i32, connectable: bool) -> bool {
        match self.joints.get_mut(&pin_id) {
            Some(joint) => {
                joint.connectable = connectable;
                true
            }
            None => false,
        }
    }

    /// Remove a node together with its joints. Returns the removed pin ids.
    ///
    /// Connectors referencing those joints must be deleted beforehand, see
    /// [`ConnectorStore::delete_for_node`](crate::ConnectorStore::delete_for_node).
    pub fn remove_node(&mut self, id: i32) -> Vec<i32> {
        self.nodes.remove(&id);
        let pins: Vec<i32> = self
            .joints
            .iter()
            .filter(|(_, j)| j.node_id == id)
            .map(|(&pin, _)| pin)
            .collect();
        for pin in &pins {
            self.joints.remove(pin);
        }
        pins
    }

    pub fn remove_joint(&mut self, pin_id: i32) -> Option<StoredJoint> {
        self.joints.remove(&pin_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

impl SceneProvider for SceneGraph {
    fn canvas_layout(&self) -> Option<CanvasLayout> {
        self.layout
    }

    fn node(&self, id: i32) -> Option<NodeInfo> {
        self.nodes.get(&id).map(|n| NodeInfo {
            id,
            x: n.x,
            y: n.y,
            width: n.width,
            height: n.height,
            draggable: n.draggable,
        })
    }

    fn joint(&self, pin_id: i32) -> Option<JointInfo> {
        self.joints.get(&pin_id).map(|j| JointInfo {
            pin_id,
            node_id: j.node_id,
            offset_x: j.rel_x,
            offset_y: j.rel_y,
            connectable: j.connectable,
        })
    }

    fn set_node_position(&mut self, id: i32, x: f32, y: f32) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.x = x;
                node.y = y;
                true
            }
            None => false,
        }
    }

    fn nodes(&self) -> Vec<NodeInfo> {
        self.nodes.keys().filter_map(|&id| self.node(id)).collect()
    }

    fn joints(&self) -> Vec<JointInfo> {
        self.joints.keys().filter_map(|&pin| self.joint(pin)).collect()
    }
}
