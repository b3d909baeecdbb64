//! Area auras.
//!
//! An aura is anchored to its caster, bounded by a radius, and expires at a
//! fixed tick. It is never pushed onto targets: every tick the owner
//! re-evaluates which auras cover each of its combatants and rebuilds the
//! cached [`AuraMultipliers`] from scratch.

mod registry;

pub use registry::AuraRegistry;

use crate::state::{EntityId, Tick};

/// Unique aura identifier, allocated by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraId(pub u64);

/// What an aura modifies.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AuraKind {
    /// Attack speed scaling (fraction).
    AttackSpeed,
    /// Incoming damage amplification on covered combatants (fraction).
    Damage,
    /// Incoming damage reduction (fraction).
    DamageReduction,
    /// Armor scaling (fraction).
    Armor,
    /// Critical chance bonus (percent points).
    Critical,
    /// Hit rate bonus (percent points).
    Accuracy,
}

/// A live aura.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aura {
    pub id: AuraId,
    pub source: EntityId,
    pub kind: AuraKind,
    pub magnitude: f64,
    pub radius: f32,
    pub expires_at: Tick,
}

impl Aura {
    pub fn is_expired(&self, now: Tick) -> bool {
        now >= self.expires_at
    }
}

/// Request to create an aura; the registry assigns the id.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraSpec {
    pub kind: AuraKind,
    pub magnitude: f64,
    pub radius: f32,
    /// Lifetime in seconds.
    pub duration: f32,
}

/// Aggregated aura contributions for one combatant during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraMultipliers {
    pub attack_speed: f64,
    pub damage: f64,
    pub damage_reduction: f64,
    pub armor: f64,
    pub critical: f64,
    pub accuracy: f64,
}

impl AuraMultipliers {
    /// No aura coverage.
    pub const NONE: Self = Self {
        attack_speed: 0.0,
        damage: 0.0,
        damage_reduction: 0.0,
        armor: 0.0,
        critical: 0.0,
        accuracy: 0.0,
    };

    pub(crate) fn add(&mut self, kind: AuraKind, magnitude: f64) {
        match kind {
            AuraKind::AttackSpeed => self.attack_speed += magnitude,
            AuraKind::Damage => self.damage += magnitude,
            AuraKind::DamageReduction => self.damage_reduction += magnitude,
            AuraKind::Armor => self.armor += magnitude,
            AuraKind::Critical => self.critical += magnitude,
            AuraKind::Accuracy => self.accuracy += magnitude,
        }
    }

    /// Factor applied to incoming raw damage (step 4 of the pipeline).
    pub fn incoming_damage_factor(&self) -> f64 {
        (1.0 + self.damage).max(0.0)
    }

    /// Factor applied by protection auras (step 7 of the pipeline).
    pub fn protection_factor(&self) -> f64 {
        1.0 - self.damage_reduction.clamp(0.0, 1.0)
    }

    pub fn armor_factor(&self) -> f64 {
        (1.0 + self.armor).max(0.0)
    }

    pub fn attack_speed_factor(&self) -> f64 {
        (1.0 + self.attack_speed).max(0.0)
    }
}
