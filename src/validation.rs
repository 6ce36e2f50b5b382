//! Connector validation rules applied by [`ConnectorStore::create`](crate::ConnectorStore::create).

use thiserror::Error;

use crate::connectors::Connector;
use crate::scene::SceneProvider;

/// Why a connector was not created.
///
/// Rejection is a normal outcome of a connect gesture, not a failure: the
/// editor simply does not finalize the connector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Joint does not exist in the scene
    #[error("Joint {0} not found")]
    PinNotFound(i32),
    /// Cannot connect a joint to itself
    #[error("Cannot connect joint to itself")]
    SamePin,
    /// Joint exists but is not currently connectable
    #[error("Joint {0} is not connectable")]
    NotConnectable(i32),
    /// Both joints sit on the same position
    #[error("Connector would have zero length")]
    ZeroLength,
    /// A connector between these joints already exists
    #[error("Connector already exists")]
    DuplicateConnector,
    /// Every connector id has been handed out
    #[error("No connector ids left")]
    IdsExhausted,
    /// Custom validation failure
    #[error("{0}")]
    Custom(String),
}

/// Trait for custom connector validation logic.
///
/// Implement this to add rules for connecting joints, then compose them with
/// [`CompositeValidator`].
pub trait ConnectorValidator {
    /// Check whether `start_pin` may be connected to `end_pin`.
    fn validate(
        &self,
        start_pin: i32,
        end_pin: i32,
        scene: &dyn SceneProvider,
        existing: &[Connector],
    ) -> Result<(), Rejection>;
}

/// Structural rules every connector must satisfy:
/// 1. Endpoints must be distinct
/// 2. Both joints must exist and be connectable
/// 3. Endpoints must not coincide geometrically
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicConnectorValidator;

impl ConnectorValidator for BasicConnectorValidator {
    fn validate(
        &self,
        start_pin: i32,
        end_pin: i32,
        scene: &dyn SceneProvider,
        _existing: &[Connector],
    ) -> Result<(), Rejection> {
        if start_pin == end_pin {
            return Err(Rejection::SamePin);
        }

        for pin in [start_pin, end_pin] {
            let joint = scene.joint(pin).ok_or(Rejection::PinNotFound(pin))?;
            if !joint.connectable {
                return Err(Rejection::NotConnectable(pin));
            }
        }

        let start = scene
            .joint_position(start_pin)
            .ok_or(Rejection::PinNotFound(start_pin))?;
        let end = scene
            .joint_position(end_pin)
            .ok_or(Rejection::PinNotFound(end_pin))?;
        if start == end {
            return Err(Rejection::ZeroLength);
        }

        Ok(())
    }
}

/// Rejects a connector whose unordered joint pair is already connected.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniquePairValidator;

impl ConnectorValidator for UniquePairValidator {
    fn validate(
        &self,
        start_pin: i32,
        end_pin: i32,
        _scene: &dyn SceneProvider,
        existing: &[Connector],
    ) -> Result<(), Rejection> {
        if existing.iter().any(|c| c.connects(start_pin, end_pin)) {
            Err(Rejection::DuplicateConnector)
        } else {
            Ok(())
        }
    }
}

/// Composite validator that combines multiple validators
///
/// Validators run in insertion order and the first rejection wins.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn ConnectorValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The validator used by the store: basic rules, plus pair uniqueness
    /// when `unique` is set.
    pub fn standard(unique: bool) -> Self {
        let validator = Self::new().add(BasicConnectorValidator);
        if unique {
            validator.add(UniquePairValidator)
        } else {
            validator
        }
    }

    pub fn add<V: ConnectorValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl ConnectorValidator for CompositeValidator {
    fn validate(
        &self,
        start_pin: i32,
        end_pin: i32,
        scene: &dyn SceneProvider,
        existing: &[Connector],
    ) -> Result<(), Rejection> {
        self.validators
            .iter()
            .try_for_each(|v| v.validate(start_pin, end_pin, scene, existing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathType;
    use crate::scene::SceneGraph;
    use crate::transform::CanvasLayout;

    fn setup_scene() -> SceneGraph {
        let mut scene = SceneGraph::new(CanvasLayout::new(0.0, 0.0, 800.0, 600.0));
        scene
            .add_node(1, 0.0, 0.0, 100.0, 50.0)
            .add_node(2, 200.0, 0.0, 100.0, 50.0)
            .add_joint(1001, 1, 100.0, 25.0)
            .add_joint(2001, 2, 0.0, 25.0)
            .add_joint(2002, 2, 0.0, 40.0);
        scene
    }

    fn connector(id: i32, a: i32, b: i32) -> Connector {
        Connector {
            id,
            endpoint_a: a,
            endpoint_b: b,
            path_type: PathType::Line,
        }
    }

    #[test]
    fn test_basic_accepts_valid_pair() {
        let scene = setup_scene();
        assert_eq!(BasicConnectorValidator.validate(1001, 2001, &scene, &[]), Ok(()));
    }

    #[test]
    fn test_basic_rejects_same_pin() {
        let scene = setup_scene();
        assert_eq!(
            BasicConnectorValidator.validate(1001, 1001, &scene, &[]),
            Err(Rejection::SamePin)
        );
    }

    #[test]
    fn test_basic_rejects_missing_pin() {
        let scene = setup_scene();
        assert_eq!(
            BasicConnectorValidator.validate(1001, 9999, &scene, &[]),
            Err(Rejection::PinNotFound(9999))
        );
    }

    #[test]
    fn test_basic_rejects_non_connectable() {
        let mut scene = setup_scene();
        scene.set_connectable(2001, false);
        assert_eq!(
            BasicConnectorValidator.validate(1001, 2001, &scene, &[]),
            Err(Rejection::NotConnectable(2001))
        );
    }

    #[test]
    fn test_basic_rejects_zero_length() {
        let mut scene = setup_scene();
        // Move node 2 so that joint 2001 lands exactly on joint 1001
        scene.set_node_position(2, 100.0, 0.0);
        assert_eq!(
            BasicConnectorValidator.validate(1001, 2001, &scene, &[]),
            Err(Rejection::ZeroLength)
        );
    }

    #[test]
    fn test_unique_pair_is_unordered() {
        let scene = setup_scene();
        let existing = vec![connector(1, 1001, 2001)];

        assert_eq!(
            UniquePairValidator.validate(1001, 2001, &scene, &existing),
            Err(Rejection::DuplicateConnector)
        );
        assert_eq!(
            UniquePairValidator.validate(2001, 1001, &scene, &existing),
            Err(Rejection::DuplicateConnector)
        );
        assert_eq!(UniquePairValidator.validate(1001, 2002, &scene, &existing), Ok(()));
    }

    #[test]
    fn test_composite_short_circuits_in_order() {
        let scene = setup_scene();
        let existing = vec![connector(1, 1001, 2001)];
        let validator = CompositeValidator::standard(true);

        assert_eq!(
            validator.validate(1001, 1001, &scene, &existing),
            Err(Rejection::SamePin)
        );
        assert_eq!(
            validator.validate(1001, 2001, &scene, &existing),
            Err(Rejection::DuplicateConnector)
        );
        assert_eq!(validator.validate(1001, 2002, &scene, &existing), Ok(()));
    }

    #[test]
    fn test_standard_without_uniqueness_allows_duplicates() {
        let scene = setup_scene();
        let existing = vec![connector(1, 1001, 2001)];
        let validator = CompositeValidator::standard(false);
        assert_eq!(validator.validate(2001, 1001, &scene, &existing), Ok(()));
    }

    #[test]
    fn test_custom_validator() {
        struct FanOutValidator {
            max_connections: usize,
        }

        impl ConnectorValidator for FanOutValidator {
            fn validate(
                &self,
                start_pin: i32,
                _end_pin: i32,
                _scene: &dyn SceneProvider,
                existing: &[Connector],
            ) -> Result<(), Rejection> {
                let count = existing.iter().filter(|c| c.touches(start_pin)).count();
                if count >= self.max_connections {
                    Err(Rejection::Custom(format!(
                        "Joint {} has reached max {} connections",
                        start_pin, self.max_connections
                    )))
                } else {
                    Ok(())
                }
            }
        }

        let scene = setup_scene();
        let validator = CompositeValidator::standard(true).add(FanOutValidator { max_connections: 1 });
        let existing = vec![connector(1, 1001, 2001)];

        let result = validator.validate(1001, 2002, &scene, &existing);
        assert_eq!(
            result,
            Err(Rejection::Custom("Joint 1001 has reached max 1 connections".into()))
        );
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::PinNotFound(42).to_string(), "Joint 42 not found");
        assert_eq!(Rejection::SamePin.to_string(), "Cannot connect joint to itself");
        assert_eq!(Rejection::NotConnectable(3).to_string(), "Joint 3 is not connectable");
        assert_eq!(Rejection::ZeroLength.to_string(), "Connector would have zero length");
        assert_eq!(Rejection::DuplicateConnector.to_string(), "Connector already exists");
        assert_eq!(Rejection::Custom("Test error".into()).to_string(), "Test error");
    }
}
