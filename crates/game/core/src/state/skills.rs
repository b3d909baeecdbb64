//! Resolved skill definitions.
//!
//! Skill lookup tables live outside the combat core. A combatant carries the
//! already-resolved [`SkillSpec`] for each of its slots.

use arrayvec::ArrayVec;

use crate::aura::AuraSpec;
use crate::combat::DamageCategory;
use crate::config::CombatConfig;
use crate::status::StatusSpec;
use crate::stats::EffectiveStats;

/// Additional effect triggered when a skill is used.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Applied to the target when the hit lands.
    ApplyStatus(StatusSpec),
    /// Aura anchored to the caster.
    CastAura(AuraSpec),
    /// Heals the caster.
    Heal(f64),
    /// Caster becomes stealthed for `duration` seconds.
    Stealth { duration: f32 },
    /// Caster opens a dash window for `duration` seconds.
    Dash { duration: f32 },
}

impl SkillEffect {
    pub const fn targets_enemy(&self) -> bool {
        matches!(self, Self::ApplyStatus(_))
    }
}

/// A resolved skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSpec {
    pub name: String,
    /// Resource spent on use.
    pub cost: u32,
    /// Base cooldown in seconds, before cooldown reduction.
    pub cooldown: f32,
    /// Maximum distance to the target in world units.
    pub range: f32,
    pub physical_ratio: f64,
    pub magic_ratio: f64,
    pub flat_physical: f64,
    pub flat_magic: f64,
    pub category: DamageCategory,
    pub effects: Vec<SkillEffect>,
}

impl SkillSpec {
    pub fn new(name: impl Into<String>, category: DamageCategory) -> Self {
        Self {
            name: name.into(),
            cost: 0,
            cooldown: 0.0,
            range: 0.0,
            physical_ratio: 0.0,
            magic_ratio: 0.0,
            flat_physical: 0.0,
            flat_magic: 0.0,
            category,
            effects: Vec::new(),
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.cooldown = seconds;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    /// Physical scaling: `attack × ratio + flat`.
    pub fn with_physical(mut self, ratio: f64, flat: f64) -> Self {
        self.physical_ratio = ratio;
        self.flat_physical = flat;
        self
    }

    /// Magic scaling: `magic_attack × ratio + flat`.
    pub fn with_magic(mut self, ratio: f64, flat: f64) -> Self {
        self.magic_ratio = ratio;
        self.flat_magic = flat;
        self
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Raw physical and magic amounts for the caster's current stats.
    pub fn raw_damage(&self, stats: &EffectiveStats) -> (f64, f64) {
        (
            stats.attack * self.physical_ratio + self.flat_physical,
            stats.magic_attack * self.magic_ratio + self.flat_magic,
        )
    }

    pub fn deals_damage(&self) -> bool {
        self.physical_ratio > 0.0
            || self.magic_ratio > 0.0
            || self.flat_physical > 0.0
            || self.flat_magic > 0.0
    }

    /// Whether the skill needs an enemy target.
    pub fn requires_target(&self) -> bool {
        self.deals_damage() || self.effects.iter().any(SkillEffect::targets_enemy)
    }
}

/// Skills indexed by slot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillBook {
    skills: ArrayVec<SkillSpec, { CombatConfig::MAX_SKILLS }>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a skill, returning its slot, or `None` when the book is full.
    pub fn learn(&mut self, skill: SkillSpec) -> Option<u8> {
        let slot = self.skills.len() as u8;
        self.skills.try_push(skill).ok().map(|()| slot)
    }

    pub fn get(&self, slot: u8) -> Option<&SkillSpec> {
        self.skills.get(usize::from(slot))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::BaseStats;
    use crate::status::StatusKind;

    #[test]
    fn raw_damage_combines_ratio_and_flat() {
        let stats = EffectiveStats::from(BaseStats {
            attack: 20.0,
            magic_attack: 40.0,
            ..BaseStats::default()
        });
        let skill = SkillSpec::new("spellblade", DamageCategory::Magic)
            .with_physical(0.5, 5.0)
            .with_magic(1.5, 10.0);

        assert_eq!(skill.raw_damage(&stats), (15.0, 70.0));
    }

    #[test]
    fn self_only_skills_need_no_target() {
        let stealth = SkillSpec::new("vanish", DamageCategory::Normal)
            .with_effect(SkillEffect::Stealth { duration: 3.0 });
        let blind = SkillSpec::new("sand", DamageCategory::Stun).with_effect(
            SkillEffect::ApplyStatus(StatusSpec::new(StatusKind::Blind, 0.5, 2.0)),
        );

        assert!(!stealth.requires_target());
        assert!(blind.requires_target());
    }

    #[test]
    fn skill_book_is_bounded() {
        let mut book = SkillBook::new();
        for i in 0..CombatConfig::MAX_SKILLS {
            assert_eq!(book.learn(SkillSpec::new("s", DamageCategory::Normal)), Some(i as u8));
        }
        assert_eq!(book.learn(SkillSpec::new("extra", DamageCategory::Normal)), None);
        assert!(book.get(CombatConfig::MAX_SKILLS as u8).is_none());
    }
}
