//! The damage resolution pipeline.
//!
//! # Step Order
//!
//! ```text
//! 1. hit check        hit_rate × (1 − blind) − evasion, clamped
//! 2. weakness         raw × (1 − weakness)
//! 3. critical roll    crit × (1 − blind); forced for the Critical category
//! 4. damage aura      × target incoming-damage factor
//! 5. critical branch  × (1 + crit_damage), returned here under Bypass
//! 6. resistance       × (1 − resistance), clamped to the cap
//! 7. protection aura  × (1 − damage_reduction)
//! 8. armor            − armor × (1 − armor_break), non-magical only
//! 9. floor            truncate; damaging hits with raw > 0 deal at least 1
//! ```
//!
//! The order is fixed. Reordering any two steps changes balance.

use super::damage::{DamageCategory, DamageEvent};
use super::hit::{crit_chance, hit_chance, roll_below};
use super::result::DamageOutcome;
use crate::aura::AuraMultipliers;
use crate::config::{CombatConfig, CritMitigation};
use crate::env::RollSource;
use crate::state::EntityId;
use crate::stats::EffectiveStats;

/// Immutable snapshot of everything the pipeline reads from the attacker.
///
/// Captured by the attacker's owner when the action is accepted, so a hit
/// resolved by another owner sees the attacker exactly as it was then.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackerProfile {
    pub entity: EntityId,
    /// Effective stats with the attacker's aura coverage applied.
    pub stats: EffectiveStats,
    pub blind: f64,
    pub weakness: f64,
}

/// Everything the pipeline reads from the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderProfile {
    pub entity: EntityId,
    /// Effective stats with the target's aura coverage applied.
    pub stats: EffectiveStats,
    pub auras: AuraMultipliers,
    pub armor_break: f64,
}

/// Resolve one damage event against `defender`.
///
/// Draws at most twice from `rolls`: once for the hit check and once for the
/// critical roll. Environmental events (no attacker) never draw.
pub fn resolve(
    event: &DamageEvent,
    defender: &DefenderProfile,
    config: &CombatConfig,
    rolls: &mut impl RollSource,
) -> DamageOutcome {
    let category = event.category;
    let attacker = event.attacker.as_ref();

    // 1. Hit check
    if let Some(attacker) = attacker {
        let chance = hit_chance(
            attacker.stats.hit_rate,
            attacker.blind,
            defender.stats.evasion_rate,
            config,
        );
        if !roll_below(chance, rolls) {
            return DamageOutcome::missed(category);
        }
    }

    // 2. Weakness
    let weakness = attacker.map_or(0.0, |a| a.weakness.clamp(0.0, 1.0));
    let raw = (event.raw_physical.max(0.0) + event.raw_magic.max(0.0)) * (1.0 - weakness);

    // 3. Critical roll
    let critical = attacker.is_some_and(|a| {
        category == DamageCategory::Critical
            || roll_below(crit_chance(a.stats.crit_chance, a.blind), rolls)
    });

    // 4. Damage aura
    let mut damage = raw * defender.auras.incoming_damage_factor();

    // 5. Critical branch
    if let Some(attacker) = attacker.filter(|_| critical) {
        damage *= 1.0 + attacker.stats.crit_damage.max(0.0);
        if config.crit_mitigation == CritMitigation::Bypass {
            return finish(damage, raw, event, true);
        }
    }

    // 6. Resistance
    let resistance = if category.is_magical() {
        defender.stats.magic_resistance
    } else {
        defender.stats.physical_resistance
    };
    damage *= (100.0 - resistance.max(0.0).min(config.resistance_ceiling())) / 100.0;

    // 7. Protection aura
    damage *= defender.auras.protection_factor();

    // 8. Armor
    if !category.is_magical() {
        let armor_break = defender.armor_break.clamp(0.0, 1.0);
        damage -= defender.stats.armor.max(0.0) * (1.0 - armor_break);
    }

    // 9. Floor
    finish(damage, raw, event, critical)
}

fn finish(damage: f64, raw: f64, event: &DamageEvent, critical: bool) -> DamageOutcome {
    let floored = damage.max(0.0).floor() as u32;
    let amount = if event.category.is_damaging() && raw > 0.0 {
        floored.max(1)
    } else if event.category.is_damaging() {
        floored
    } else {
        0
    };
    DamageOutcome {
        amount,
        category: event.category,
        critical,
        miss: false,
    }
}

/// Healing path: skips every mitigation step.
pub fn resolve_heal(amount: f64) -> u32 {
    amount.max(0.0).floor() as u32
}
