//! Brute-force spatial index fed by the physics layer.
use dashmap::DashMap;

use combat_core::{EntityId, Position, SpatialQuery};

/// Shared entity positions.
///
/// The physics layer writes positions; owner workers answer range checks
/// and aura coverage through [`SpatialQuery`].
#[derive(Debug, Default)]
pub struct SpatialIndex {
    positions: DashMap<EntityId, Position>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&self, entity: EntityId, position: Position) {
        self.positions.insert(entity, position);
    }

    pub fn remove(&self, entity: EntityId) -> Option<Position> {
        self.positions.remove(&entity).map(|(_, position)| position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl SpatialQuery for SpatialIndex {
    fn position_of(&self, entity: EntityId) -> Option<Position> {
        self.positions.get(&entity).map(|entry| *entry)
    }

    fn within(&self, center: Position, radius: f32) -> Vec<EntityId> {
        let mut found: Vec<EntityId> = self
            .positions
            .iter()
            .filter(|entry| entry.value().within(&center, radius))
            .map(|entry| *entry.key())
            .collect();
        found.sort();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_returns_sorted_ids_inside_radius() {
        let index = SpatialIndex::new();
        index.set_position(EntityId(3), Position::new(1.0, 0.0));
        index.set_position(EntityId(1), Position::new(0.0, 2.0));
        index.set_position(EntityId(2), Position::new(5.0, 5.0));

        assert_eq!(
            index.within(Position::new(0.0, 0.0), 2.0),
            vec![EntityId(1), EntityId(3)]
        );
        assert_eq!(index.distance_between(EntityId(1), EntityId(9)), None);

        index.remove(EntityId(1));
        assert_eq!(index.within(Position::new(0.0, 0.0), 2.0), vec![EntityId(3)]);
    }
}
