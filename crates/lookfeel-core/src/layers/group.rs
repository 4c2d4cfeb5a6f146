//! Group layer for combining multiple layers.

use super::{Layer, LayerId, Transformable, layers_bounds};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered collection of child layers.
///
/// A group has no transform of its own. Its position is derived from the
/// children, and every transform call is broadcast to them as a relative
/// change:
///
/// - [`Transformable::translate`] moves each child by the same offset.
/// - [`Transformable::rotate_by`] adds the angle to each child's own
///   rotation, so children spin in place about their own centres rather
///   than orbiting the group.
///
/// Nothing is recorded on the group, so a later read of
/// [`Transformable::rotation`] still reports zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupLayer {
    pub(crate) id: LayerId,
    pub name: String,
    children: Vec<Layer>,
}

impl GroupLayer {
    pub fn new(name: impl Into<String>, children: Vec<Layer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            children,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn children(&self) -> &[Layer] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Layer> {
        &mut self.children
    }

    /// Dissolve this group and return its children.
    pub fn ungroup(self) -> Vec<Layer> {
        self.children
    }

    /// Union of the children's bounds, `None` for an empty group.
    pub fn bounds(&self) -> Option<Rect> {
        layers_bounds(&self.children)
    }

    /// Find a descendant by id.
    pub fn find(&self, id: LayerId) -> Option<&Layer> {
        self.children.iter().find_map(|child| {
            if child.id() == id {
                Some(child)
            } else {
                child.as_group().and_then(|group| group.find(id))
            }
        })
    }
}

impl Transformable for GroupLayer {
    fn position(&self) -> Point {
        self.bounds().map(|b| b.origin()).unwrap_or(Point::ZERO)
    }

    fn rotation(&self) -> f64 {
        0.0
    }

    fn translate(&mut self, delta: Vec2) {
        for child in &mut self.children {
            child.translate(delta);
        }
    }

    fn rotate_by(&mut self, degrees: f64) {
        for child in &mut self.children {
            child.rotate_by(degrees);
        }
    }
}
