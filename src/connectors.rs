//! Connector bookkeeping.
//!
//! [`ConnectorStore`] owns the ordered list of connectors and, row for row,
//! their drawables in a Slint model. Endpoints are stored as joint ids and
//! resolved through the [`SceneProvider`] on every redraw.
//!
//! Path commands are in local canvas space, the same space node positions
//! live in. Pan and zoom are not baked in: the host must draw the connector
//! layer inside the same viewport transform as the nodes, and must not apply
//! [`CoordinateTransformer::canvas_to_pan_zoom_space`] to the commands again.
//!
//! [`CoordinateTransformer::canvas_to_pan_zoom_space`]: crate::CoordinateTransformer::canvas_to_pan_zoom_space
//!
//! # Example
//!
//! ```ignore
//! use slint_joint_editor::{ConnectorStore, EditorConfig, EventBus, PathType};
//!
//! let bus = EventBus::new();
//! let mut store = ConnectorStore::new(&EditorConfig::default(), bus.clone());
//! window.set_connector_paths(store.paths_model());
//!
//! let id = store.create(output_pin, input_pin, PathType::TripleLine, &scene)?;
//! store.redraw_all(&scene);
//! ```

use std::rc::Rc;

use slint::{Model, ModelRc, SharedString, VecModel};

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::events::{EditorEvent, EventBus};
use crate::hit_test::ConnectorGeometry;
use crate::path::{generate_path, PathStyle, PathType};
use crate::scene::SceneProvider;
use crate::validation::{CompositeValidator, ConnectorValidator, Rejection};

/// A link between two joints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connector {
    pub id: i32,
    pub endpoint_a: i32,
    pub endpoint_b: i32,
    pub path_type: PathType,
}

impl Connector {
    /// Whether this connector joins the two pins, in either direction.
    pub fn connects(&self, pin_a: i32, pin_b: i32) -> bool {
        (self.endpoint_a == pin_a && self.endpoint_b == pin_b)
            || (self.endpoint_a == pin_b && self.endpoint_b == pin_a)
    }

    /// Whether either endpoint is the given pin.
    pub fn touches(&self, pin_id: i32) -> bool {
        self.endpoint_a == pin_id || self.endpoint_b == pin_id
    }
}

/// Drawable row for one connector, ready to bind to a Slint `Path`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorPath {
    pub id: i32,
    /// SVG path commands in local canvas space
    pub commands: SharedString,
    pub stroke_width: f32,
    pub hovered: bool,
    /// Selected for deletion
    pub active: bool,
}

/// Ordered collection of connectors and their drawables.
pub struct ConnectorStore {
    connectors: Vec<Connector>,
    paths: Rc<VecModel<ConnectorPath>>,
    next_id: i32,
    style: PathStyle,
    validator: Box<dyn ConnectorValidator>,
    bus: EventBus,
    stale: Vec<i32>,
}

impl ConnectorStore {
    /// Create an empty store using the standard validation rules for `config`.
    pub fn new(config: &EditorConfig, bus: EventBus) -> Self {
        Self::with_validator(config, bus, CompositeValidator::standard(config.unique_connectors))
    }

    /// Create an empty store with a custom validator.
    pub fn with_validator<V>(config: &EditorConfig, bus: EventBus, validator: V) -> Self
    where
        V: ConnectorValidator + 'static,
    {
        Self {
            connectors: Vec::new(),
            paths: Rc::new(VecModel::default()),
            next_id: 1,
            style: config.path_style(),
            validator: Box::new(validator),
            bus,
            stale: Vec::new(),
        }
    }

    /// The drawable container, one row per connector in store order.
    pub fn paths_model(&self) -> ModelRc<ConnectorPath> {
        ModelRc::from(self.paths.clone())
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    /// Validate and append a new connector, mounting its drawable.
    pub fn create(
        &mut self,
        endpoint_a: i32,
        endpoint_b: i32,
        path_type: PathType,
        scene: &dyn SceneProvider,
    ) -> Result<i32, Rejection> {
        self.validator
            .validate(endpoint_a, endpoint_b, scene, &self.connectors)?;

        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(Rejection::IdsExhausted)?;
        let connector = Connector {
            id,
            endpoint_a,
            endpoint_b,
            path_type,
        };

        let commands = self.compute_commands(&connector, scene).unwrap_or_default();
        self.connectors.push(connector);
        self.paths.push(ConnectorPath {
            id: connector.id,
            commands,
            stroke_width: self.style.stroke_width,
            hovered: false,
            active: false,
        });

        log::debug!(
            "created connector {} between joints {} and {}",
            connector.id,
            endpoint_a,
            endpoint_b
        );
        Ok(connector.id)
    }

    pub fn find_by_id(&self, id: i32) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    /// First connector having `pin_id` as either endpoint.
    pub fn find_by_endpoint_pin_id(&self, pin_id: i32) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.touches(pin_id))
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.connectors.iter().map(|c| c.id)
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Remove one connector and its drawable, keeping the order of the rest.
    ///
    /// Emits [`EditorEvent::Delete`]. Returns `false` if the id is unknown.
    pub fn delete_by_id(&mut self, id: i32) -> bool {
        let Some(index) = self.connectors.iter().position(|c| c.id == id) else {
            return false;
        };

        self.connectors.remove(index);
        if index < self.paths.row_count() {
            self.paths.remove(index);
        }
        self.stale.retain(|&s| s != id);

        log::debug!("deleted connector {}", id);
        self.bus.emit(EditorEvent::Delete { connector_id: id });
        true
    }

    /// Remove every connector one at a time, then emit [`EditorEvent::ClearAll`].
    pub fn delete_all(&mut self) {
        while let Some(first) = self.connectors.first() {
            let id = first.id;
            self.delete_by_id(id);
        }
        self.bus.emit(EditorEvent::ClearAll);
    }

    /// Delete every connector touching the given joint.
    pub fn delete_for_joint(&mut self, pin_id: i32) -> usize {
        let ids: Vec<i32> = self
            .connectors
            .iter()
            .filter(|c| c.touches(pin_id))
            .map(|c| c.id)
            .collect();
        ids.into_iter().filter(|&id| self.delete_by_id(id)).count()
    }

    /// Delete every connector attached to any joint of `node_id`.
    ///
    /// Call this before removing the node from the scene.
    pub fn delete_for_node(&mut self, node_id: i32, scene: &dyn SceneProvider) -> usize {
        scene
            .joints_of(node_id)
            .into_iter()
            .map(|pin| self.delete_for_joint(pin))
            .sum()
    }

    /// Recompute one connector's drawable from its current joint positions.
    pub fn redraw(&mut self, id: i32, scene: &dyn SceneProvider) -> Result<(), EditorError> {
        let index = self
            .connectors
            .iter()
            .position(|c| c.id == id)
            .ok_or(EditorError::ConnectorNotFound(id))?;
        self.redraw_at(index, scene)
    }

    fn redraw_at(&mut self, index: usize, scene: &dyn SceneProvider) -> Result<(), EditorError> {
        let connector = self.connectors[index];
        let commands = self.compute_commands(&connector, scene)?;

        if let Some(mut row) = self.paths.row_data(index) {
            if row.commands != commands {
                row.commands = commands;
                self.paths.set_row_data(index, row);
            }
        }
        Ok(())
    }

    /// Redraw every connector.
    ///
    /// Connectors whose joints no longer resolve are skipped and recorded in
    /// [`stale`](Self::stale) instead of failing the batch. Returns the number
    /// of connectors redrawn.
    pub fn redraw_all(&mut self, scene: &dyn SceneProvider) -> usize {
        let mut redrawn = 0;
        for index in 0..self.connectors.len() {
            match self.redraw_at(index, scene) {
                Ok(()) => redrawn += 1,
                Err(err) => {
                    let id = self.connectors[index].id;
                    log::warn!("connector {} skipped during redraw: {}", id, err);
                    if !self.stale.contains(&id) {
                        self.stale.push(id);
                    }
                }
            }
        }
        redrawn
    }

    /// Redraw the connectors attached to a node's joints.
    pub fn redraw_for_node(&mut self, node_id: i32, scene: &dyn SceneProvider) -> usize {
        let pins = scene.joints_of(node_id);
        let indices: Vec<usize> = self
            .connectors
            .iter()
            .enumerate()
            .filter(|(_, c)| pins.iter().any(|&p| c.touches(p)))
            .map(|(i, _)| i)
            .collect();

        let mut redrawn = 0;
        for index in indices {
            match self.redraw_at(index, scene) {
                Ok(()) => redrawn += 1,
                Err(err) => log::warn!("connector redraw failed: {}", err),
            }
        }
        redrawn
    }

    /// Connectors flagged by [`redraw_all`](Self::redraw_all) as having a vanished joint.
    pub fn stale(&self) -> &[i32] {
        &self.stale
    }

    /// Delete all stale connectors. Returns how many were removed.
    pub fn purge_stale(&mut self) -> usize {
        let stale = std::mem::take(&mut self.stale);
        stale.into_iter().filter(|&id| self.delete_by_id(id)).count()
    }

    /// Reflect hover and selection state in the drawables.
    pub fn set_highlight(&mut self, hovered: Option<i32>, active: Option<i32>) {
        for index in 0..self.paths.row_count() {
            if let Some(mut row) = self.paths.row_data(index) {
                let is_hovered = Some(row.id) == hovered;
                let is_active = Some(row.id) == active;
                if row.hovered != is_hovered || row.active != is_active {
                    row.hovered = is_hovered;
                    row.active = is_active;
                    self.paths.set_row_data(index, row);
                }
            }
        }
    }

    /// Resolved endpoint geometry of every connector, for hit testing.
    pub fn geometries(&self, scene: &dyn SceneProvider) -> Vec<ConnectorGeometry> {
        self.connectors
            .iter()
            .filter_map(|c| {
                Some(ConnectorGeometry {
                    id: c.id,
                    start: scene.joint_position(c.endpoint_a)?,
                    end: scene.joint_position(c.endpoint_b)?,
                    path_type: c.path_type,
                })
            })
            .collect()
    }

    fn compute_commands(
        &self,
        connector: &Connector,
        scene: &dyn SceneProvider,
    ) -> Result<SharedString, EditorError> {
        let start = scene
            .joint_position(connector.endpoint_a)
            .ok_or(EditorError::JointNotFound(connector.endpoint_a))?;
        let end = scene
            .joint_position(connector.endpoint_b)
            .ok_or(EditorError::JointNotFound(connector.endpoint_b))?;
        Ok(generate_path(connector.path_type, start, end, &self.style).into())
    }
}
