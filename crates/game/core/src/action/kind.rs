use crate::state::EntityId;
use crate::stats::{EquipSlot, RuneId, StatBundle};

/// Every action a controller can propose for an entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// Basic attack.
    Attack { target: EntityId },
    /// Skill in `slot`; self-only skills take no target.
    Skill { slot: u8, target: Option<EntityId> },
    /// Flat heal on the acting entity.
    Heal { amount: u32 },
    Equip { slot: EquipSlot, bundle: StatBundle },
    Unequip { slot: EquipSlot },
    ApplyRune { id: RuneId, bundle: StatBundle },
    RemoveRune { id: RuneId },
    /// Spends resource outside of a skill (e.g. sprinting).
    SpendResource { amount: u32 },
    /// Spends currency from the actor's wallet (shops, repairs).
    SpendCurrency { amount: u64 },
    /// Accepts a controller-side resource value within tolerance.
    SyncResource { value: u32 },
    Respawn,
}

impl ActionKind {
    /// Stable name for logs and diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Attack { .. } => "attack",
            Self::Skill { .. } => "skill",
            Self::Heal { .. } => "heal",
            Self::Equip { .. } => "equip",
            Self::Unequip { .. } => "unequip",
            Self::ApplyRune { .. } => "apply_rune",
            Self::RemoveRune { .. } => "remove_rune",
            Self::SpendResource { .. } => "spend_resource",
            Self::SpendCurrency { .. } => "spend_currency",
            Self::SyncResource { .. } => "sync_resource",
            Self::Respawn => "respawn",
        }
    }

    /// Whether the action goes through the damage pipeline.
    pub const fn is_offensive(&self) -> bool {
        matches!(self, Self::Attack { .. } | Self::Skill { .. })
    }

    /// Enemy target named by the action, if any.
    pub const fn target(&self) -> Option<EntityId> {
        match self {
            Self::Attack { target } => Some(*target),
            Self::Skill { target, .. } => *target,
            _ => None,
        }
    }
}
