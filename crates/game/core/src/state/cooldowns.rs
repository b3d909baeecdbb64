use std::fmt;

use arrayvec::ArrayVec;

use crate::config::CombatConfig;

/// Action slot addressed by a cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionSlot {
    Basic,
    Skill(u8),
}

impl fmt::Display for ActionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("basic"),
            Self::Skill(slot) => write!(f, "skill-{slot}"),
        }
    }
}

/// Remaining cooldown per action slot, advanced on the owner's clock only.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns {
    entries: ArrayVec<(ActionSlot, f32), { CombatConfig::MAX_SKILLS + 1 }>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the cooldown of `slot`.
    pub fn start(&mut self, slot: ActionSlot, seconds: f32) {
        if seconds <= 0.0 {
            self.entries.retain(|(s, _)| *s != slot);
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| *s == slot) {
            entry.1 = seconds;
        } else if self.entries.try_push((slot, seconds)).is_err() {
            tracing::debug!(target: "combat::state", %slot, "Cooldown table full");
        }
    }

    /// Seconds left before `slot` is ready; zero when ready.
    pub fn remaining(&self, slot: ActionSlot) -> f32 {
        self.entries
            .iter()
            .find(|(s, _)| *s == slot)
            .map_or(0.0, |(_, remaining)| *remaining)
    }

    pub fn is_ready(&self, slot: ActionSlot) -> bool {
        self.remaining(slot) <= 0.0
    }

    pub fn advance(&mut self, dt: f32) {
        for entry in &mut self.entries {
            entry.1 -= dt;
        }
        self.entries.retain(|(_, remaining)| *remaining > 1e-4);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
