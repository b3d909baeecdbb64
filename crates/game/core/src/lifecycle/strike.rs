use super::{DamageApplied, apply_damage, lifesteal_amount};
use crate::combat::{
    AttackerProfile, DamageCategory, DamageEvent, DamageOutcome, DamageReport, resolve,
};
use crate::config::CombatConfig;
use crate::env::RollSource;
use crate::state::{Combatant, EntityId};
use crate::status::{ApplyOutcome, StatusSpec};

/// An accepted offensive action, ready to be resolved by the target's owner.
///
/// Carries the attacker as an immutable profile so it can cross owners.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strike {
    pub attacker: AttackerProfile,
    pub target: EntityId,
    pub raw_physical: f64,
    pub raw_magic: f64,
    pub category: DamageCategory,
    /// Statuses applied to the target when the strike lands.
    pub on_hit: Vec<StatusSpec>,
}

/// What happened when a strike was resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct StrikeResolution {
    pub outcome: DamageOutcome,
    pub applied: DamageApplied,
    pub report: DamageReport,
    /// Lifesteal owed to the attacker (uncapped; the attacker's owner caps it).
    pub lifesteal: u32,
    pub statuses: Vec<ApplyOutcome>,
}

/// Runs the pipeline for `strike` against the canonical `target` and applies
/// the result.
///
/// Returns `None` when the target is already dead; late strikes are dropped.
pub fn resolve_strike(
    target: &mut Combatant,
    strike: &Strike,
    config: &CombatConfig,
    rolls: &mut impl RollSource,
) -> Option<StrikeResolution> {
    if !target.is_alive() {
        tracing::debug!(
            target: "combat::lifecycle",
            attacker = %strike.attacker.entity,
            defender = %target.id,
            "Late strike against dead target dropped"
        );
        return None;
    }

    let event = DamageEvent::new(
        Some(strike.attacker),
        target.id,
        strike.raw_physical,
        strike.raw_magic,
        strike.category,
    );
    let outcome = resolve(&event, &target.defender_profile(), config, rolls);
    let report = outcome.report(target.id);

    if outcome.miss {
        return Some(StrikeResolution {
            outcome,
            applied: DamageApplied::default(),
            report,
            lifesteal: 0,
            statuses: Vec::new(),
        });
    }

    let applied = apply_damage(target, outcome.amount, Some(strike.attacker.entity));
    let lifesteal = lifesteal_amount(applied.dealt, strike.attacker.stats.lifesteal);

    let statuses = if target.is_alive() {
        strike
            .on_hit
            .iter()
            .map(|spec| {
                target
                    .statuses
                    .apply(*spec, Some(strike.attacker.entity), &config.stacking)
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(StrikeResolution {
        outcome,
        applied,
        report,
        lifesteal,
        statuses,
    })
}
