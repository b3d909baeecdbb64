//! Pipeline output.

use super::damage::{DamageCategory, DamageReport};
use crate::state::EntityId;

/// Final outcome of one damage event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    pub amount: u32,
    pub category: DamageCategory,
    pub critical: bool,
    pub miss: bool,
}

impl DamageOutcome {
    pub fn missed(category: DamageCategory) -> Self {
        Self {
            amount: 0,
            category,
            critical: false,
            miss: true,
        }
    }

    pub fn is_hit(&self) -> bool {
        !self.miss
    }

    /// Presentation report for `target`; the caller attaches the position.
    pub fn report(&self, target: EntityId) -> DamageReport {
        DamageReport {
            target,
            position: None,
            amount: self.amount,
            category: self.category,
            critical: self.critical,
            heal: false,
            miss: self.miss,
        }
    }
}
