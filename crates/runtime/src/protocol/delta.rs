use serde::{Deserialize, Serialize};

use combat_core::{CombatFlags, Combatant, EntityId, PeerId, Tick};

/// Owner-published snapshot of an entity's observable combat state.
///
/// `revision` increases by one per broadcast of the same entity; observers
/// ignore anything not newer than what they hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritativeDelta {
    pub entity: EntityId,
    pub owner: PeerId,
    pub health: u32,
    pub max_health: u32,
    pub resource: u32,
    pub max_resource: u32,
    pub flags: CombatFlags,
    pub revision: u64,
    pub tick: Tick,
}

impl AuthoritativeDelta {
    pub fn capture(combatant: &Combatant, owner: PeerId, revision: u64, tick: Tick) -> Self {
        Self {
            entity: combatant.id,
            owner,
            health: combatant.health.current(),
            max_health: combatant.health.maximum(),
            resource: combatant.resource.current(),
            max_resource: combatant.resource.maximum(),
            flags: combatant.flags(),
            revision,
            tick,
        }
    }

    /// Whether the observable fields match, ignoring revision and tick.
    pub fn same_state(&self, other: &Self) -> bool {
        self.entity == other.entity
            && self.health == other.health
            && self.max_health == other.max_health
            && self.resource == other.resource
            && self.max_resource == other.max_resource
            && self.flags == other.flags
    }

    pub fn is_dead(&self) -> bool {
        self.flags.contains(CombatFlags::DEAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{BaseStats, Role};

    #[test]
    fn same_state_ignores_revision_and_tick() {
        let fresh = Combatant::new(EntityId(3), Role::Ai, BaseStats::default());
        let a = AuthoritativeDelta::capture(&fresh, PeerId::HOST, 1, Tick::ZERO);
        let b = AuthoritativeDelta::capture(&fresh, PeerId::HOST, 2, Tick::new(4));
        assert!(a.same_state(&b));
        assert_eq!(a.health, 100);
        assert_eq!(a.max_resource, 50);
        assert!(!a.is_dead());
    }
}
