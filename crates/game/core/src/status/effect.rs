use crate::combat::DamageCategory;
use crate::state::EntityId;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    // ========================================================================
    // Damage over time (magnitude = raw damage per interval per stack)
    // ========================================================================
    Poison,
    Burn,
    Bleed,

    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Cannot act.
    Freeze,
    /// Cannot act.
    Stun,

    // ========================================================================
    // Debuffs (magnitude = fraction in [0, 1])
    // ========================================================================
    /// Reduces the armor subtracted by the pipeline.
    ArmorBreak,
    /// Reduces hit and critical chance.
    Blind,
    /// Reduces outgoing raw damage.
    Weakness,
    /// Reduces movement speed.
    Slow,
}

impl StatusKind {
    /// Periodic damage category, for kinds that deal damage over time.
    pub const fn periodic_category(self) -> Option<DamageCategory> {
        match self {
            Self::Poison => Some(DamageCategory::Poison),
            Self::Burn => Some(DamageCategory::Burn),
            Self::Bleed => Some(DamageCategory::Bleed),
            _ => None,
        }
    }

    pub const fn is_incapacitating(self) -> bool {
        matches!(self, Self::Freeze | Self::Stun)
    }

    /// Kinds whose magnitude is a fraction (clamped to `[0, 1]` when read).
    pub const fn is_fractional(self) -> bool {
        matches!(
            self,
            Self::ArmorBreak | Self::Blind | Self::Weakness | Self::Slow
        )
    }
}

/// Request to apply a status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSpec {
    pub kind: StatusKind,
    pub magnitude: f64,
    /// Duration in seconds.
    pub duration: f32,
    /// Seconds between periodic ticks; `None` for non-periodic effects.
    pub interval: Option<f32>,
}

impl StatusSpec {
    pub fn new(kind: StatusKind, magnitude: f64, duration: f32) -> Self {
        Self {
            kind,
            magnitude,
            duration,
            interval: None,
        }
    }

    /// Periodic damage effect ticking every `interval` seconds.
    pub fn periodic(kind: StatusKind, magnitude: f64, duration: f32, interval: f32) -> Self {
        Self {
            kind,
            magnitude,
            duration,
            interval: Some(interval),
        }
    }
}

/// An active status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub magnitude: f64,
    /// Seconds left before expiry.
    pub remaining: f32,
    pub interval: Option<f32>,
    /// Seconds accumulated towards the next periodic tick.
    pub elapsed: f32,
    pub stacks: u8,
    /// Entity credited for periodic damage and kills.
    pub source: Option<EntityId>,
}

/// Shortest periodic interval; anything finer is raised to this.
pub const MIN_INTERVAL: f32 = 0.01;

impl StatusEffect {
    pub fn from_spec(spec: StatusSpec, source: Option<EntityId>) -> Self {
        Self {
            kind: spec.kind,
            magnitude: spec.magnitude,
            remaining: spec.duration,
            interval: spec
                .interval
                .filter(|interval| *interval > 0.0)
                .map(|interval| interval.max(MIN_INTERVAL)),
            elapsed: 0.0,
            stacks: 1,
            source,
        }
    }

    /// Magnitude multiplied by stack count.
    pub fn strength(&self) -> f64 {
        self.magnitude * f64::from(self.stacks)
    }
}

/// One periodic damage tick produced by [`super::StatusSet::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicTick {
    pub kind: StatusKind,
    pub category: DamageCategory,
    pub amount: f64,
    pub source: Option<EntityId>,
}
