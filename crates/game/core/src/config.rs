use crate::status::StatusKind;

/// How a re-applied status effect interacts with an active one of the same
/// kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackingPolicy {
    /// The new application replaces magnitude, source and duration.
    Refresh,
    /// Adds one stack (up to `max`) and refreshes the duration.
    Stack { max: u8 },
    /// Keeps whichever application is stronger; equal strength extends.
    KeepStrongest,
}

/// Whether critical hits go through resistance, protection and armor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CritMitigation {
    /// Critical damage is returned right after the multiplier.
    #[default]
    Bypass,
    /// Critical damage continues through the mitigation steps.
    Apply,
}

/// Stacking policy for every status kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackingRules {
    pub poison: StackingPolicy,
    pub burn: StackingPolicy,
    pub bleed: StackingPolicy,
    pub freeze: StackingPolicy,
    pub stun: StackingPolicy,
    pub armor_break: StackingPolicy,
    pub blind: StackingPolicy,
    pub weakness: StackingPolicy,
    pub slow: StackingPolicy,
}

impl StackingRules {
    pub fn policy(&self, kind: StatusKind) -> StackingPolicy {
        match kind {
            StatusKind::Poison => self.poison,
            StatusKind::Burn => self.burn,
            StatusKind::Bleed => self.bleed,
            StatusKind::Freeze => self.freeze,
            StatusKind::Stun => self.stun,
            StatusKind::ArmorBreak => self.armor_break,
            StatusKind::Blind => self.blind,
            StatusKind::Weakness => self.weakness,
            StatusKind::Slow => self.slow,
        }
    }

    /// Every kind uses `policy`.
    pub fn uniform(policy: StackingPolicy) -> Self {
        Self {
            poison: policy,
            burn: policy,
            bleed: policy,
            freeze: policy,
            stun: policy,
            armor_break: policy,
            blind: policy,
            weakness: policy,
            slow: policy,
        }
    }
}

impl Default for StackingRules {
    fn default() -> Self {
        Self {
            poison: StackingPolicy::Stack { max: 5 },
            burn: StackingPolicy::Refresh,
            bleed: StackingPolicy::Stack { max: 3 },
            freeze: StackingPolicy::Refresh,
            stun: StackingPolicy::KeepStrongest,
            armor_break: StackingPolicy::KeepStrongest,
            blind: StackingPolicy::KeepStrongest,
            weakness: StackingPolicy::KeepStrongest,
            slow: StackingPolicy::KeepStrongest,
        }
    }
}

/// Combat rule constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Length of one fixed simulation step in seconds.
    pub tick_seconds: f32,
    /// Lower bound of the final hit chance (percent).
    pub hit_floor: f64,
    /// Upper bound of the final hit chance (percent).
    pub hit_ceiling: f64,
    /// Upper bound of any resistance (percent).
    pub resistance_cap: f64,
    pub crit_mitigation: CritMitigation,
    pub stacking: StackingRules,
    /// Reach of the basic attack in world units.
    pub basic_attack_range: f32,
    /// Seconds between basic attacks at attack speed 1.0.
    pub basic_attack_interval: f32,
    /// Upper bound of cooldown reduction (percent).
    pub cooldown_reduction_cap: f64,
    /// Accepted distance of a synced resource value from the canonical one,
    /// as a fraction of the maximum.
    pub sync_tolerance: f64,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 12;
    pub const MAX_TIMERS: usize = 8;
    pub const MAX_SKILLS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_SECONDS: f32 = 0.1;
    pub const DEFAULT_HIT_FLOOR: f64 = 5.0;
    pub const DEFAULT_HIT_CEILING: f64 = 95.0;
    pub const DEFAULT_RESISTANCE_CAP: f64 = 80.0;
    pub const DEFAULT_BASIC_ATTACK_RANGE: f32 = 2.5;
    pub const DEFAULT_BASIC_ATTACK_INTERVAL: f32 = 1.0;
    pub const DEFAULT_COOLDOWN_REDUCTION_CAP: f64 = 40.0;
    pub const DEFAULT_SYNC_TOLERANCE: f64 = 0.25;

    pub fn new() -> Self {
        Self {
            tick_seconds: Self::DEFAULT_TICK_SECONDS,
            hit_floor: Self::DEFAULT_HIT_FLOOR,
            hit_ceiling: Self::DEFAULT_HIT_CEILING,
            resistance_cap: Self::DEFAULT_RESISTANCE_CAP,
            crit_mitigation: CritMitigation::default(),
            stacking: StackingRules::default(),
            basic_attack_range: Self::DEFAULT_BASIC_ATTACK_RANGE,
            basic_attack_interval: Self::DEFAULT_BASIC_ATTACK_INTERVAL,
            cooldown_reduction_cap: Self::DEFAULT_COOLDOWN_REDUCTION_CAP,
            sync_tolerance: Self::DEFAULT_SYNC_TOLERANCE,
        }
    }

    pub fn with_tick_seconds(mut self, tick_seconds: f32) -> Self {
        self.tick_seconds = tick_seconds;
        self
    }

    pub fn with_crit_mitigation(mut self, crit_mitigation: CritMitigation) -> Self {
        self.crit_mitigation = crit_mitigation;
        self
    }

    pub fn with_stacking(mut self, stacking: StackingRules) -> Self {
        self.stacking = stacking;
        self
    }

    /// Applies cooldown reduction (percent points, capped) to a base cooldown.
    pub fn reduced_cooldown(&self, base_seconds: f32, cooldown_reduction: f64) -> f32 {
        let cap = self.cooldown_reduction_cap.max(0.0);
        let reduction = cooldown_reduction.max(0.0).min(cap) / 100.0;
        (f64::from(base_seconds) * (1.0 - reduction)) as f32
    }

    /// Hit chance bounds as `(floor, ceiling)`, ordered and kept in `[0, 100]`.
    pub fn hit_bounds(&self) -> (f64, f64) {
        let ceiling = self.hit_floor.max(self.hit_ceiling).clamp(0.0, 100.0);
        let floor = self.hit_floor.min(self.hit_ceiling).max(0.0).min(ceiling);
        (floor, ceiling)
    }

    /// Resistance cap in percent, kept in `[0, 100]`.
    pub fn resistance_ceiling(&self) -> f64 {
        self.resistance_cap.max(0.0).min(100.0)
    }

    /// Seconds between basic attacks at the given effective attack speed.
    pub fn basic_attack_cooldown(&self, attack_speed: f64) -> f32 {
        if attack_speed <= 0.0 {
            return self.basic_attack_interval;
        }
        (f64::from(self.basic_attack_interval) / attack_speed) as f32
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
