//! Effective stats - the read side of the stat system.
//!
//! Effective values are never stored. They are folded on every read:
//!
//! ```text
//! base + Σ equipment + Σ runes → floors → aura adjustments
//! ```

use std::ops::Deref;

use strum::IntoEnumIterator;

use super::bonus::StatFloors;
use super::core::{BaseStats, StatKind};
use super::layers::ModifierLayers;
use crate::aura::AuraMultipliers;

/// Base stats plus the modifier layers applied on top of them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSheet {
    pub base: BaseStats,
    pub layers: ModifierLayers,
}

impl StatSheet {
    pub fn new(base: BaseStats) -> Self {
        Self {
            base,
            layers: ModifierLayers::new(),
        }
    }

    /// Base + equipment + runes, floored. No aura contribution.
    pub fn layered(&self) -> EffectiveStats {
        let mut folded = self
            .layers
            .iter()
            .fold(self.base, |acc, bundle| acc.with_bundle(bundle));

        for kind in StatKind::iter() {
            let floor = StatFloors::floor(kind);
            let value = folded.get_mut(kind);
            if *value < floor {
                tracing::debug!(
                    target: "combat::stats",
                    stat = %kind,
                    value = *value,
                    floor,
                    "Stat clamped to floor"
                );
                *value = floor;
            }
        }

        EffectiveStats(folded)
    }

    /// Layered stats adjusted by the auras currently covering the combatant.
    ///
    /// - hit rate and critical chance: additive percent points
    /// - armor and attack speed: scaled by `1 + aura`
    /// - evasion: unaffected by auras
    pub fn effective(&self, auras: &AuraMultipliers) -> EffectiveStats {
        let mut stats = self.layered().0;
        stats.hit_rate = (stats.hit_rate + auras.accuracy).max(StatFloors::HIT_RATE);
        stats.crit_chance = (stats.crit_chance + auras.critical).max(0.0);
        stats.armor = (stats.armor * auras.armor_factor()).max(StatFloors::ARMOR);
        stats.attack_speed =
            (stats.attack_speed * auras.attack_speed_factor()).max(StatFloors::ATTACK_SPEED);
        EffectiveStats(stats)
    }
}

/// Fully aggregated, floored stat values.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveStats(BaseStats);

impl EffectiveStats {
    /// Maximum health rounded down to whole points.
    pub fn max_health(&self) -> u32 {
        self.0.max_health.max(0.0) as u32
    }

    /// Maximum resource rounded down to whole points.
    pub fn max_resource(&self) -> u32 {
        self.0.max_resource.max(0.0) as u32
    }

    pub fn into_inner(self) -> BaseStats {
        self.0
    }
}

impl Deref for EffectiveStats {
    type Target = BaseStats;

    fn deref(&self) -> &BaseStats {
        &self.0
    }
}

impl From<BaseStats> for EffectiveStats {
    /// Treats raw values as already aggregated (floors are not applied).
    fn from(stats: BaseStats) -> Self {
        Self(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{EquipSlot, RuneId, StatBundle};

    fn sheet() -> StatSheet {
        StatSheet::new(BaseStats::default())
    }

    #[test]
    fn equip_then_unequip_restores_every_field() {
        let mut sheet = sheet();
        let before = sheet.layered();

        let bundle = StatBundle::named("plate")
            .with(StatKind::Armor, 25.0)
            .with(StatKind::MaxHealth, 40.0)
            .with(StatKind::MoveSpeed, -0.5)
            .with(StatKind::PhysicalResistance, 12.5)
            .with(StatKind::Lifesteal, 1.5);

        sheet.layers.equip(EquipSlot::Armor, bundle);
        let equipped = sheet.layered();
        assert_eq!(equipped.armor, 25.0);
        assert_eq!(equipped.max_health, 140.0);

        sheet.layers.unequip(EquipSlot::Armor);
        assert_eq!(sheet.layered(), before);
    }

    #[test]
    fn equipping_same_slot_twice_replaces() {
        let mut sheet = sheet();
        let item = StatBundle::named("item a").with(StatKind::Attack, 10.0);

        sheet.layers.equip(EquipSlot::Weapon, item.clone());
        let replaced = sheet.layers.equip(EquipSlot::Weapon, item.clone());

        assert_eq!(replaced, Some(item));
        assert_eq!(sheet.layered().attack, 20.0);
    }

    #[test]
    fn distinct_slots_stack() {
        let mut sheet = sheet();
        let item = StatBundle::named("item a").with(StatKind::Attack, 10.0);

        sheet.layers.equip(EquipSlot::Weapon, item.clone());
        sheet.layers.equip(EquipSlot::Accessory, item);

        assert_eq!(sheet.layered().attack, 30.0);
    }

    #[test]
    fn runes_layer_independently_of_equipment() {
        let mut sheet = sheet();
        sheet
            .layers
            .equip(EquipSlot::Weapon, StatBundle::named("sword").with(StatKind::Attack, 5.0));
        sheet
            .layers
            .apply_rune(RuneId(1), StatBundle::named("fury").with(StatKind::Attack, 3.0));

        assert_eq!(sheet.layered().attack, 18.0);

        sheet.layers.unequip(EquipSlot::Weapon);
        assert_eq!(sheet.layered().attack, 13.0);

        sheet.layers.remove_rune(RuneId(1));
        assert_eq!(sheet.layered().attack, 10.0);
    }

    #[test]
    fn floors_hold_after_large_penalties() {
        let mut sheet = sheet();
        let curse = StatBundle::named("curse")
            .with(StatKind::Attack, -500.0)
            .with(StatKind::Armor, -500.0)
            .with(StatKind::MoveSpeed, -500.0)
            .with(StatKind::HitRate, -500.0)
            .with(StatKind::AttackSpeed, -500.0)
            .with(StatKind::CooldownReduction, -500.0)
            .with(StatKind::Lifesteal, -500.0)
            .with(StatKind::MaxResource, -500.0);
        sheet.layers.apply_rune(RuneId(9), curse);

        let stats = sheet.layered();
        assert_eq!(stats.attack, StatFloors::ATTACK);
        assert_eq!(stats.armor, StatFloors::ARMOR);
        assert_eq!(stats.move_speed, StatFloors::MOVE_SPEED);
        assert_eq!(stats.hit_rate, StatFloors::HIT_RATE);
        assert_eq!(stats.attack_speed, StatFloors::ATTACK_SPEED);
        assert_eq!(stats.cooldown_reduction, 0.0);
        assert_eq!(stats.lifesteal, 0.0);
        assert_eq!(stats.max_resource(), 0);
    }

    #[test]
    fn auras_adjust_effective_values() {
        let mut base = BaseStats::default();
        base.armor = 20.0;
        let sheet = StatSheet::new(base);

        let auras = AuraMultipliers {
            armor: 0.5,
            critical: 10.0,
            accuracy: 5.0,
            attack_speed: 0.25,
            ..AuraMultipliers::NONE
        };
        let stats = sheet.effective(&auras);

        assert_eq!(stats.armor, 30.0);
        assert_eq!(stats.crit_chance, 15.0);
        assert_eq!(stats.hit_rate, 95.0);
        assert_eq!(stats.attack_speed, 1.25);
        assert_eq!(stats.evasion_rate, sheet.layered().evasion_rate);
    }
}
