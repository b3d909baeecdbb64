//! Additive stat bundles and stat floors.
//!
//! A [`StatBundle`] is the resolved stat payload of an item or rune. Bundles
//! are never merged into a running total: they are stored as layers and folded
//! on read (see [`super::layers`]), so removing a bundle restores the exact
//! pre-equip values.

use strum::IntoEnumIterator;

use super::core::StatKind;

/// Named bundle of additive deltas for combat, survival and resistance stats.
///
/// # Example
/// ```
/// # use combat_core::stats::{StatBundle, StatKind};
/// let sword = StatBundle::named("iron sword")
///     .with(StatKind::Attack, 10.0)
///     .with(StatKind::CritChance, 2.5);
/// assert_eq!(sword.get(StatKind::Attack), 10.0);
/// assert_eq!(sword.get(StatKind::Armor), 0.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBundle {
    pub name: String,
    deltas: [f64; StatKind::COUNT],
}

impl StatBundle {
    /// Creates an empty bundle.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deltas: [0.0; StatKind::COUNT],
        }
    }

    /// Sets a delta (builder pattern).
    pub fn with(mut self, kind: StatKind, delta: f64) -> Self {
        self.deltas[kind.index()] = delta;
        self
    }

    pub fn get(&self, kind: StatKind) -> f64 {
        self.deltas[kind.index()]
    }

    pub fn set(&mut self, kind: StatKind, delta: f64) {
        self.deltas[kind.index()] = delta;
    }

    /// Iterates the non-zero deltas.
    pub fn entries(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, delta)| *delta != 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.iter().all(|delta| *delta == 0.0)
    }
}

impl StatKind {
    /// Number of stat fields.
    pub const COUNT: usize = 15;

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Lower bounds applied after every fold.
///
/// Floors keep derived math well-defined: attack never reaches zero,
/// speeds never stall, percentages never go negative.
#[derive(Clone, Copy, Debug)]
pub struct StatFloors;

impl StatFloors {
    pub const ATTACK: f64 = 1.0;
    pub const ARMOR: f64 = 0.0;
    pub const MAX_RESOURCE: f64 = 0.0;
    pub const MAX_HEALTH: f64 = 1.0;
    pub const MOVE_SPEED: f64 = 0.1;
    pub const HIT_RATE: f64 = 5.0;
    pub const ATTACK_SPEED: f64 = 0.1;
    pub const COOLDOWN_REDUCTION: f64 = 0.0;
    pub const LIFESTEAL: f64 = 0.0;

    /// Floor for a given stat; fields without an explicit floor never go
    /// below zero.
    pub const fn floor(kind: StatKind) -> f64 {
        match kind {
            StatKind::Attack => Self::ATTACK,
            StatKind::Armor => Self::ARMOR,
            StatKind::MaxResource => Self::MAX_RESOURCE,
            StatKind::MaxHealth => Self::MAX_HEALTH,
            StatKind::MoveSpeed => Self::MOVE_SPEED,
            StatKind::HitRate => Self::HIT_RATE,
            StatKind::AttackSpeed => Self::ATTACK_SPEED,
            StatKind::CooldownReduction => Self::COOLDOWN_REDUCTION,
            StatKind::Lifesteal => Self::LIFESTEAL,
            StatKind::MagicAttack
            | StatKind::EvasionRate
            | StatKind::CritChance
            | StatKind::CritDamage
            | StatKind::PhysicalResistance
            | StatKind::MagicResistance => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_kind_count_matches_variants() {
        assert_eq!(StatKind::iter().count(), StatKind::COUNT);
        for (i, kind) in StatKind::iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn entries_skip_zero_fields() {
        let bundle = StatBundle::named("ring")
            .with(StatKind::Lifesteal, 3.0)
            .with(StatKind::Armor, 0.0);
        let entries: Vec<_> = bundle.entries().collect();
        assert_eq!(entries, vec![(StatKind::Lifesteal, 3.0)]);
        assert!(!bundle.is_empty());
        assert!(StatBundle::named("empty").is_empty());
    }
}
