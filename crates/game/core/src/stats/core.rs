//! Base stats - the stored layer of the stat system.
//!
//! Base stats are the only stat values permanently stored on a combatant.
//! Equipment and rune layers are folded on top of them on every read.

use super::bonus::StatBundle;

/// Identifies a single stat field.
///
/// Used for floors, diagnostics, and to address fields generically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    Attack,
    MagicAttack,
    Armor,
    MoveSpeed,
    HitRate,
    EvasionRate,
    AttackSpeed,
    CritChance,
    CritDamage,
    CooldownReduction,
    Lifesteal,
    MaxHealth,
    MaxResource,
    PhysicalResistance,
    MagicResistance,
}

/// Stored combat stats of a combatant.
///
/// Percent-valued fields (`hit_rate`, `evasion_rate`, `crit_chance`,
/// `cooldown_reduction`, `lifesteal`, resistances) are expressed in percent
/// points; `crit_damage` is a fraction (0.5 = +50% on critical hits).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub attack: f64,
    pub magic_attack: f64,
    pub armor: f64,
    pub move_speed: f64,
    pub hit_rate: f64,
    pub evasion_rate: f64,
    pub attack_speed: f64,
    pub crit_chance: f64,
    pub crit_damage: f64,
    pub cooldown_reduction: f64,
    pub lifesteal: f64,
    pub max_health: f64,
    pub max_resource: f64,
    pub physical_resistance: f64,
    pub magic_resistance: f64,
}

impl Default for BaseStats {
    /// A plain melee combatant.
    fn default() -> Self {
        Self {
            attack: 10.0,
            magic_attack: 0.0,
            armor: 0.0,
            move_speed: 5.0,
            hit_rate: 90.0,
            evasion_rate: 5.0,
            attack_speed: 1.0,
            crit_chance: 5.0,
            crit_damage: 0.5,
            cooldown_reduction: 0.0,
            lifesteal: 0.0,
            max_health: 100.0,
            max_resource: 50.0,
            physical_resistance: 0.0,
            magic_resistance: 0.0,
        }
    }
}

impl BaseStats {
    /// Reads a single field.
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Attack => self.attack,
            StatKind::MagicAttack => self.magic_attack,
            StatKind::Armor => self.armor,
            StatKind::MoveSpeed => self.move_speed,
            StatKind::HitRate => self.hit_rate,
            StatKind::EvasionRate => self.evasion_rate,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::CritChance => self.crit_chance,
            StatKind::CritDamage => self.crit_damage,
            StatKind::CooldownReduction => self.cooldown_reduction,
            StatKind::Lifesteal => self.lifesteal,
            StatKind::MaxHealth => self.max_health,
            StatKind::MaxResource => self.max_resource,
            StatKind::PhysicalResistance => self.physical_resistance,
            StatKind::MagicResistance => self.magic_resistance,
        }
    }

    /// Mutable access to a single field.
    pub fn get_mut(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::MagicAttack => &mut self.magic_attack,
            StatKind::Armor => &mut self.armor,
            StatKind::MoveSpeed => &mut self.move_speed,
            StatKind::HitRate => &mut self.hit_rate,
            StatKind::EvasionRate => &mut self.evasion_rate,
            StatKind::AttackSpeed => &mut self.attack_speed,
            StatKind::CritChance => &mut self.crit_chance,
            StatKind::CritDamage => &mut self.crit_damage,
            StatKind::CooldownReduction => &mut self.cooldown_reduction,
            StatKind::Lifesteal => &mut self.lifesteal,
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::MaxResource => &mut self.max_resource,
            StatKind::PhysicalResistance => &mut self.physical_resistance,
            StatKind::MagicResistance => &mut self.magic_resistance,
        }
    }

    /// Returns a copy with every field of `bundle` added.
    pub fn with_bundle(mut self, bundle: &StatBundle) -> Self {
        for (kind, delta) in bundle.entries() {
            *self.get_mut(kind) += delta;
        }
        self
    }
}
