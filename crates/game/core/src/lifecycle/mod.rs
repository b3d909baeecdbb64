//! Health mutation, death and respawn.
//!
//! Every health change on a canonical combatant goes through this module so
//! the death transition is checked after each mutation and fires exactly once.

mod strike;
mod tick;
mod wallet;

pub use strike::{Strike, StrikeResolution, resolve_strike};
pub use tick::{TickReport, advance};
pub use wallet::Wallet;

use crate::state::{Combatant, EntityId, LifeState};

/// A completed death transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Death {
    pub victim: EntityId,
    /// Entity credited with the kill, if any.
    pub killer: Option<EntityId>,
    /// Currency owed to the killer.
    pub bounty: u64,
}

/// Result of applying damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageApplied {
    /// Health actually removed.
    pub dealt: u32,
    pub death: Option<Death>,
}

/// Removes up to `amount` health, crediting `source` if the hit is lethal.
///
/// Damage against a dead combatant is a no-op, so two lethal sources in the
/// same step produce a single death.
pub fn apply_damage(
    target: &mut Combatant,
    amount: u32,
    source: Option<EntityId>,
) -> DamageApplied {
    if !target.is_alive() {
        return DamageApplied::default();
    }

    let dealt = target.health.drain(amount);
    let death = target.health.is_empty().then(|| die(target, source));
    DamageApplied { dealt, death }
}

/// Restores up to `amount` health, returning what was applied.
///
/// Dead combatants cannot be healed.
pub fn apply_heal(target: &mut Combatant, amount: u32) -> u32 {
    if !target.is_alive() {
        return 0;
    }
    target.health.restore(amount)
}

/// Lifesteal owed for `damage`: `floor(damage × lifesteal / 100)`.
///
/// The caller applies it through [`apply_heal`], which caps it at the
/// attacker's missing health.
pub fn lifesteal_amount(damage: u32, lifesteal_percent: f64) -> u32 {
    (f64::from(damage) * lifesteal_percent.max(0.0) / 100.0).floor() as u32
}

/// Credits the bounty of a death to the killer.
pub fn credit_kill(killer: &mut Combatant, death: &Death) {
    killer.wallet.credit(death.bounty);
    tracing::debug!(
        target: "combat::lifecycle",
        killer = %killer.id,
        victim = %death.victim,
        bounty = death.bounty,
        "Bounty credited"
    );
}

/// Brings a dead combatant back with full meters.
///
/// Returns `false` (and changes nothing) when the combatant is alive.
pub fn respawn(target: &mut Combatant) -> bool {
    if target.is_alive() {
        return false;
    }
    target.set_life_state(LifeState::Alive);
    target.health.refill();
    target.resource.refill();
    target.cooldowns.clear();
    tracing::info!(target: "combat::lifecycle", entity = %target.id, "Combatant respawned");
    true
}

fn die(target: &mut Combatant, killer: Option<EntityId>) -> Death {
    target.set_life_state(LifeState::Dead);
    target.statuses.clear();
    target.timers.clear();
    tracing::info!(
        target: "combat::lifecycle",
        victim = %target.id,
        killer = ?killer,
        "Combatant died"
    );
    Death {
        victim: target.id,
        killer,
        bounty: target.bounty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackingRules;
    use crate::state::Role;
    use crate::stats::BaseStats;
    use crate::status::{StatusKind, StatusSpec};

    fn combatant(id: u32) -> Combatant {
        Combatant::new(EntityId(id), Role::Ai, BaseStats::default()).with_bounty(25)
    }

    #[test]
    fn death_fires_once_with_two_lethal_sources() {
        let mut victim = combatant(2);

        let first = apply_damage(&mut victim, 150, Some(EntityId(1)));
        let second = apply_damage(&mut victim, 150, Some(EntityId(3)));

        assert_eq!(first.dealt, 100);
        assert_eq!(
            first.death,
            Some(Death {
                victim: EntityId(2),
                killer: Some(EntityId(1)),
                bounty: 25
            })
        );
        assert_eq!(second, DamageApplied::default());
        assert_eq!(victim.life_state(), LifeState::Dead);
    }

    #[test]
    fn death_clears_statuses_and_timers() {
        let mut victim = combatant(2);
        victim.statuses.apply(
            StatusSpec::periodic(StatusKind::Poison, 2.0, 5.0, 1.0),
            Some(EntityId(1)),
            &StackingRules::default(),
        );
        victim
            .timers
            .schedule(crate::status::TimerAction::EndDash, 1.0);

        apply_damage(&mut victim, 100, None);

        assert!(victim.statuses.is_empty());
        assert!(victim.timers.is_empty());
    }

    #[test]
    fn lifesteal_never_overheals() {
        let mut attacker = combatant(1);
        attacker.health.drain(5);

        let owed = lifesteal_amount(100, 20.0);
        let healed = apply_heal(&mut attacker, owed);

        assert_eq!(owed, 20);
        assert_eq!(healed, 5);
        assert_eq!(attacker.health.current(), attacker.health.maximum());
    }

    #[test]
    fn lifesteal_floors_fractional_amounts() {
        assert_eq!(lifesteal_amount(7, 10.0), 0);
        assert_eq!(lifesteal_amount(19, 10.0), 1);
        assert_eq!(lifesteal_amount(50, -5.0), 0);
    }

    #[test]
    fn respawn_is_idempotent() {
        let mut victim = combatant(2);
        assert!(!respawn(&mut victim));

        apply_damage(&mut victim, 500, None);
        assert_eq!(apply_heal(&mut victim, 50), 0);
        victim.resource.drain(10);

        assert!(respawn(&mut victim));
        assert!(!respawn(&mut victim));
        assert_eq!(victim.health.current(), 100);
        assert_eq!(victim.resource.current(), 50);
    }

    #[test]
    fn killer_receives_bounty() {
        let mut killer = combatant(1);
        let mut victim = combatant(2);

        let applied = apply_damage(&mut victim, 100, Some(killer.id));
        if let Some(death) = applied.death {
            credit_kill(&mut killer, &death);
        }

        assert_eq!(killer.wallet.balance(), 25);
    }
}
