use std::collections::BTreeMap;

use super::{Aura, AuraId, AuraKind, AuraMultipliers, AuraSpec};
use crate::env::SpatialQuery;
use crate::state::{EntityId, Tick};

/// Registry of live auras.
///
/// Auras are written only by their caster's owner; every owner reads the
/// registry when it rebuilds aura coverage for its own combatants.
#[derive(Clone, Debug, Default)]
pub struct AuraRegistry {
    auras: BTreeMap<AuraId, Aura>,
    next_id: u64,
}

impl AuraRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new aura anchored to `source`.
    ///
    /// The lifetime is rounded up to whole ticks; a zero-length aura still
    /// covers the tick it was cast on.
    pub fn cast(
        &mut self,
        source: EntityId,
        spec: AuraSpec,
        now: Tick,
        tick_seconds: f32,
    ) -> AuraId {
        let ticks = if tick_seconds > 0.0 {
            (spec.duration / tick_seconds).ceil().max(1.0) as u64
        } else {
            1
        };
        let id = AuraId(self.next_id);
        self.next_id += 1;
        self.auras.insert(
            id,
            Aura {
                id,
                source,
                kind: spec.kind,
                magnitude: spec.magnitude,
                radius: spec.radius,
                expires_at: now + ticks,
            },
        );
        tracing::debug!(
            target: "combat::aura",
            aura = id.0,
            source = %source,
            kind = %spec.kind,
            magnitude = spec.magnitude,
            "Aura cast"
        );
        id
    }

    pub fn get(&self, id: AuraId) -> Option<&Aura> {
        self.auras.get(&id)
    }

    pub fn remove(&mut self, id: AuraId) -> Option<Aura> {
        self.auras.remove(&id)
    }

    /// Removes every aura cast by `source` (e.g. on the caster's death).
    pub fn remove_by_source(&mut self, source: EntityId) -> usize {
        let before = self.auras.len();
        self.auras.retain(|_, aura| aura.source != source);
        before - self.auras.len()
    }

    /// Drops auras that have expired by `now` and whose source satisfies
    /// `owned`. Returns the removed ids.
    pub fn prune_expired(&mut self, now: Tick, owned: impl Fn(EntityId) -> bool) -> Vec<AuraId> {
        let expired: Vec<AuraId> = self
            .auras
            .values()
            .filter(|aura| aura.is_expired(now) && owned(aura.source))
            .map(|aura| aura.id)
            .collect();
        for id in &expired {
            self.auras.remove(id);
        }
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aura> {
        self.auras.values()
    }

    pub fn len(&self) -> usize {
        self.auras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auras.is_empty()
    }

    /// Rebuilds aura coverage for `targets`.
    ///
    /// For every live aura whose source is positioned, the spatial query
    /// returns the covered entities. Contributions of the same kind from the
    /// same source collapse to the strongest one; distinct sources sum.
    /// Targets outside every aura get [`AuraMultipliers::NONE`].
    pub fn evaluate(
        &self,
        spatial: &(impl SpatialQuery + ?Sized),
        now: Tick,
        targets: impl IntoIterator<Item = EntityId>,
    ) -> BTreeMap<EntityId, AuraMultipliers> {
        let mut result: BTreeMap<EntityId, AuraMultipliers> = targets
            .into_iter()
            .map(|id| (id, AuraMultipliers::NONE))
            .collect();

        let mut strongest: BTreeMap<(EntityId, EntityId, AuraKind), f64> = BTreeMap::new();
        for aura in self.auras.values().filter(|aura| !aura.is_expired(now)) {
            let Some(center) = spatial.position_of(aura.source) else {
                continue;
            };
            for covered in spatial.within(center, aura.radius) {
                if !result.contains_key(&covered) {
                    continue;
                }
                let entry = strongest
                    .entry((covered, aura.source, aura.kind))
                    .or_insert(aura.magnitude);
                if aura.magnitude.abs() > entry.abs() {
                    *entry = aura.magnitude;
                }
            }
        }

        for ((target, _source, kind), magnitude) in strongest {
            if let Some(multipliers) = result.get_mut(&target) {
                multipliers.add(kind, magnitude);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticPositions;
    use crate::state::Position;

    fn spec(kind: AuraKind, magnitude: f64, radius: f32) -> AuraSpec {
        AuraSpec {
            kind,
            magnitude,
            radius,
            duration: 5.0,
        }
    }

    fn world() -> StaticPositions {
        StaticPositions::new()
            .with(EntityId(1), Position::new(0.0, 0.0))
            .with(EntityId(2), Position::new(3.0, 0.0))
            .with(EntityId(3), Position::new(20.0, 0.0))
            .with(EntityId(10), Position::new(1.0, 0.0))
    }

    #[test]
    fn aura_covers_only_targets_in_radius() {
        let mut registry = AuraRegistry::new();
        registry.cast(EntityId(1), spec(AuraKind::Armor, 0.2, 5.0), Tick(0), 0.1);

        let coverage = registry.evaluate(&world(), Tick(1), [EntityId(2), EntityId(3)]);

        assert_eq!(coverage[&EntityId(2)].armor, 0.2);
        assert_eq!(coverage[&EntityId(3)], AuraMultipliers::NONE);
    }

    #[test]
    fn same_source_duplicates_do_not_double_count() {
        let mut registry = AuraRegistry::new();
        registry.cast(EntityId(1), spec(AuraKind::Damage, 0.1, 5.0), Tick(0), 0.1);
        registry.cast(EntityId(1), spec(AuraKind::Damage, 0.3, 5.0), Tick(0), 0.1);

        let coverage = registry.evaluate(&world(), Tick(1), [EntityId(2)]);

        assert!((coverage[&EntityId(2)].damage - 0.3).abs() < 1e-9);
    }

    #[test]
    fn distinct_sources_sum() {
        let mut registry = AuraRegistry::new();
        registry.cast(EntityId(1), spec(AuraKind::DamageReduction, 0.1, 5.0), Tick(0), 0.1);
        registry.cast(EntityId(10), spec(AuraKind::DamageReduction, 0.15, 5.0), Tick(0), 0.1);

        let coverage = registry.evaluate(&world(), Tick(1), [EntityId(2)]);

        assert!((coverage[&EntityId(2)].damage_reduction - 0.25).abs() < 1e-9);
    }

    #[test]
    fn expired_auras_stop_contributing_and_are_pruned() {
        let mut registry = AuraRegistry::new();
        // 0.5s at 0.25s ticks = 2 ticks
        let id = registry.cast(
            EntityId(1),
            AuraSpec {
                kind: AuraKind::Critical,
                magnitude: 10.0,
                radius: 5.0,
                duration: 0.5,
            },
            Tick(0),
            0.25,
        );
        assert_eq!(registry.get(id).map(|a| a.expires_at), Some(Tick(2)));

        let live = registry.evaluate(&world(), Tick(1), [EntityId(2)]);
        assert_eq!(live[&EntityId(2)].critical, 10.0);

        let coverage = registry.evaluate(&world(), Tick(2), [EntityId(2)]);
        assert_eq!(coverage[&EntityId(2)].critical, 0.0);

        let pruned = registry.prune_expired(Tick(2), |_| true);
        assert_eq!(pruned, vec![id]);
        assert!(registry.is_empty());
    }

    #[test]
    fn prune_only_touches_owned_sources() {
        let mut registry = AuraRegistry::new();
        registry.cast(EntityId(1), spec(AuraKind::Armor, 0.1, 1.0), Tick(0), 1.0);
        registry.cast(EntityId(10), spec(AuraKind::Armor, 0.1, 1.0), Tick(0), 1.0);

        let pruned = registry.prune_expired(Tick(100), |source| source == EntityId(1));
        assert_eq!(pruned.len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unpositioned_source_is_ignored() {
        let mut registry = AuraRegistry::new();
        registry.cast(EntityId(99), spec(AuraKind::Armor, 0.5, 100.0), Tick(0), 0.1);

        let coverage = registry.evaluate(&world(), Tick(1), [EntityId(2)]);
        assert_eq!(coverage[&EntityId(2)], AuraMultipliers::NONE);
    }
}
