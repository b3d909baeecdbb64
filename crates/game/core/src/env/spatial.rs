//! Spatial query boundary.
//!
//! Spatial partitioning belongs to the physics layer. The combat core only
//! needs two questions answered: where is an entity, and who is inside a
//! circle.

use crate::state::{EntityId, Position};

/// Read-only spatial queries answered by an external collaborator.
pub trait SpatialQuery: Send + Sync {
    /// Current position of `entity`, or `None` if it is not in the world.
    fn position_of(&self, entity: EntityId) -> Option<Position>;

    /// All entities whose position lies within `radius` of `center`.
    fn within(&self, center: Position, radius: f32) -> Vec<EntityId>;

    /// Distance between two entities, if both are positioned.
    fn distance_between(&self, a: EntityId, b: EntityId) -> Option<f32> {
        let pa = self.position_of(a)?;
        let pb = self.position_of(b)?;
        Some(pa.distance(&pb))
    }
}

/// Spatial query over a fixed list of positions.
///
/// Brute-force; intended for tests and small rooms.
#[derive(Clone, Debug, Default)]
pub struct StaticPositions {
    positions: Vec<(EntityId, Position)>,
}

impl StaticPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an entity's position (builder pattern).
    pub fn with(mut self, entity: EntityId, position: Position) -> Self {
        self.set(entity, position);
        self
    }

    pub fn set(&mut self, entity: EntityId, position: Position) {
        match self.positions.iter_mut().find(|(id, _)| *id == entity) {
            Some(slot) => slot.1 = position,
            None => self.positions.push((entity, position)),
        }
    }
}

impl SpatialQuery for StaticPositions {
    fn position_of(&self, entity: EntityId) -> Option<Position> {
        self.positions
            .iter()
            .find(|(id, _)| *id == entity)
            .map(|(_, position)| *position)
    }

    fn within(&self, center: Position, radius: f32) -> Vec<EntityId> {
        self.positions
            .iter()
            .filter(|(_, position)| position.within(&center, radius))
            .map(|(id, _)| *id)
            .collect()
    }
}
