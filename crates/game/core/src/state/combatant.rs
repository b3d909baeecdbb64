//! Canonical combatant state.

use bitflags::bitflags;

use super::common::{EntityId, ResourceMeter};
use super::cooldowns::Cooldowns;
use super::skills::{SkillBook, SkillSpec};
use crate::aura::AuraMultipliers;
use crate::combat::{AttackerProfile, DefenderProfile};
use crate::lifecycle::Wallet;
use crate::stats::{BaseStats, EffectiveStats, EquipSlot, RuneId, StatBundle, StatSheet};
use crate::status::{StatusSet, TimerAction, TimerList};

/// Who drives the combatant's inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Player,
    Ai,
}

/// Life-state flag guarding the death and respawn transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

bitflags! {
    /// Condition bitset carried by authoritative deltas.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatFlags: u8 {
        const DEAD = 1 << 0;
        const STUNNED = 1 << 1;
        const FROZEN = 1 << 2;
        const BLIND = 1 << 3;
        const WEAKENED = 1 << 4;
        const STEALTHED = 1 << 5;
        const DASHING = 1 << 6;
    }
}

/// Complete combat state of one entity, held only by its owner.
///
/// # Invariants
///
/// - `health.current() <= health.maximum()` and likewise for `resource`
/// - meter maxima always match the effective stats of `sheet`
/// - stat layers change only through `equip` / `unequip` / `apply_rune` /
///   `remove_rune`, which re-clamp the meters
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub role: Role,
    pub health: ResourceMeter,
    pub resource: ResourceMeter,
    sheet: StatSheet,
    pub statuses: StatusSet,
    pub timers: TimerList,
    pub skills: SkillBook,
    pub cooldowns: Cooldowns,
    pub wallet: Wallet,
    /// Currency granted to whoever lands the killing blow.
    pub bounty: u64,
    life: LifeState,
    /// Aura coverage cached for the current tick.
    auras: AuraMultipliers,
}

impl Combatant {
    /// Creates a living combatant with full meters.
    pub fn new(id: EntityId, role: Role, base: BaseStats) -> Self {
        let sheet = StatSheet::new(base);
        let layered = sheet.layered();
        Self {
            id,
            role,
            health: ResourceMeter::full(layered.max_health()),
            resource: ResourceMeter::full(layered.max_resource()),
            sheet,
            statuses: StatusSet::new(),
            timers: TimerList::new(),
            skills: SkillBook::new(),
            cooldowns: Cooldowns::new(),
            wallet: Wallet::default(),
            bounty: 0,
            life: LifeState::Alive,
            auras: AuraMultipliers::NONE,
        }
    }

    pub fn with_skill(mut self, skill: SkillSpec) -> Self {
        if self.skills.learn(skill).is_none() {
            tracing::debug!(target: "combat::state", entity = %self.id, "Skill book full");
        }
        self
    }

    pub fn with_bounty(mut self, bounty: u64) -> Self {
        self.bounty = bounty;
        self
    }

    pub fn with_wallet(mut self, wallet: Wallet) -> Self {
        self.wallet = wallet;
        self
    }

    // ========================================================================
    // Life state
    // ========================================================================

    pub fn life_state(&self) -> LifeState {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub(crate) fn set_life_state(&mut self, life: LifeState) {
        self.life = life;
    }

    /// Alive and neither stunned nor frozen.
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.statuses.is_incapacitated()
    }

    // ========================================================================
    // Stats
    // ========================================================================

    pub fn sheet(&self) -> &StatSheet {
        &self.sheet
    }

    /// Effective stats including the cached aura coverage.
    pub fn effective(&self) -> EffectiveStats {
        self.sheet.effective(&self.auras)
    }

    pub fn aura_coverage(&self) -> AuraMultipliers {
        self.auras
    }

    /// Replaces the cached aura coverage for this tick.
    pub fn set_aura_coverage(&mut self, auras: AuraMultipliers) {
        self.auras = auras;
    }

    /// Installs `bundle` in `slot`, returning the replaced bundle.
    pub fn equip(&mut self, slot: EquipSlot, bundle: StatBundle) -> Option<StatBundle> {
        let replaced = self.sheet.layers.equip(slot, bundle);
        self.refresh_maxima();
        replaced
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<StatBundle> {
        let removed = self.sheet.layers.unequip(slot);
        self.refresh_maxima();
        removed
    }

    pub fn apply_rune(&mut self, id: RuneId, bundle: StatBundle) -> Option<StatBundle> {
        let replaced = self.sheet.layers.apply_rune(id, bundle);
        self.refresh_maxima();
        replaced
    }

    pub fn remove_rune(&mut self, id: RuneId) -> Option<StatBundle> {
        let removed = self.sheet.layers.remove_rune(id);
        self.refresh_maxima();
        removed
    }

    /// Re-derives meter maxima from the layers and re-clamps current values.
    fn refresh_maxima(&mut self) {
        let layered = self.sheet.layered();
        if self.health.set_maximum(layered.max_health()) {
            tracing::debug!(
                target: "combat::stats",
                entity = %self.id,
                health = self.health.current(),
                "Health clamped to new maximum"
            );
        }
        if self.resource.set_maximum(layered.max_resource()) {
            tracing::debug!(
                target: "combat::stats",
                entity = %self.id,
                resource = self.resource.current(),
                "Resource clamped to new maximum"
            );
        }
    }

    // ========================================================================
    // Pipeline profiles
    // ========================================================================

    pub fn attacker_profile(&self) -> AttackerProfile {
        AttackerProfile {
            entity: self.id,
            stats: self.effective(),
            blind: self.statuses.blind_fraction(),
            weakness: self.statuses.weakness_fraction(),
        }
    }

    pub fn defender_profile(&self) -> DefenderProfile {
        DefenderProfile {
            entity: self.id,
            stats: self.effective(),
            auras: self.auras,
            armor_break: self.statuses.armor_break_fraction(),
        }
    }

    // ========================================================================
    // Flags
    // ========================================================================

    pub fn is_stealthed(&self) -> bool {
        self.timers.is_pending(TimerAction::EndStealth)
    }

    pub fn is_dashing(&self) -> bool {
        self.timers.is_pending(TimerAction::EndDash)
    }

    pub fn flags(&self) -> CombatFlags {
        let mut flags = CombatFlags::empty();
        flags.set(CombatFlags::DEAD, !self.is_alive());
        flags.set(CombatFlags::STUNNED, self.statuses.is_stunned());
        flags.set(CombatFlags::FROZEN, self.statuses.is_frozen());
        flags.set(CombatFlags::BLIND, self.statuses.blind_fraction() > 0.0);
        flags.set(CombatFlags::WEAKENED, self.statuses.weakness_fraction() > 0.0);
        flags.set(CombatFlags::STEALTHED, self.is_stealthed());
        flags.set(CombatFlags::DASHING, self.is_dashing());
        flags
    }
}
