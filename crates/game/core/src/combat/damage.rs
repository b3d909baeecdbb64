//! Damage categories, events and reports.

use super::pipeline::AttackerProfile;
use crate::state::{EntityId, Position};

// ============================================================================
// Damage Category
// ============================================================================

/// Damage category, used for mitigation routing and presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageCategory {
    /// Physical damage (basic attacks, physical skills).
    Normal,
    /// Physical damage that always crits when it has an attacker.
    Critical,
    /// Magical damage (spells).
    Magic,
    /// Poison damage over time.
    Poison,
    /// Fire damage (magical).
    Burn,
    /// Cold damage (magical).
    Freeze,
    /// Crowd control only; never deals damage.
    Stun,
    /// Bleed damage over time.
    Bleed,
}

impl DamageCategory {
    /// Magical categories use magic resistance and skip armor.
    pub const fn is_magical(self) -> bool {
        matches!(self, Self::Magic | Self::Burn | Self::Freeze)
    }

    /// Whether the category is subject to the minimum-damage rule.
    pub const fn is_damaging(self) -> bool {
        !matches!(self, Self::Stun)
    }
}

// ============================================================================
// Damage Event
// ============================================================================

/// One pipeline input. Ephemeral: built, resolved and dropped within a step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEvent {
    /// `None` for environmental damage (periodic effects, hazards).
    pub attacker: Option<AttackerProfile>,
    pub target: EntityId,
    pub raw_physical: f64,
    pub raw_magic: f64,
    pub category: DamageCategory,
}

impl DamageEvent {
    pub fn new(
        attacker: Option<AttackerProfile>,
        target: EntityId,
        raw_physical: f64,
        raw_magic: f64,
        category: DamageCategory,
    ) -> Self {
        Self {
            attacker,
            target,
            raw_physical,
            raw_magic,
            category,
        }
    }

    /// Environmental damage of a single category.
    pub fn environmental(target: EntityId, amount: f64, category: DamageCategory) -> Self {
        let (raw_physical, raw_magic) = if category.is_magical() {
            (0.0, amount)
        } else {
            (amount, 0.0)
        };
        Self::new(None, target, raw_physical, raw_magic, category)
    }

    pub fn attacker_id(&self) -> Option<EntityId> {
        self.attacker.as_ref().map(|profile| profile.entity)
    }
}

// ============================================================================
// Damage Report
// ============================================================================

/// Presentation-facing summary of one resolved damage or heal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageReport {
    pub target: EntityId,
    pub position: Option<Position>,
    pub amount: u32,
    pub category: DamageCategory,
    pub critical: bool,
    pub heal: bool,
    pub miss: bool,
}

impl DamageReport {
    pub fn miss(target: EntityId, category: DamageCategory) -> Self {
        Self {
            target,
            position: None,
            amount: 0,
            category,
            critical: false,
            heal: false,
            miss: true,
        }
    }

    pub fn heal(target: EntityId, amount: u32) -> Self {
        Self {
            target,
            position: None,
            amount,
            category: DamageCategory::Normal,
            critical: false,
            heal: true,
            miss: false,
        }
    }

    pub fn at(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }
}
