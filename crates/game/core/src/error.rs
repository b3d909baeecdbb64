//! Common error infrastructure for combat-core.
//!
//! The combat core has no fatal errors. Precondition failures become
//! [`Rejection`]s which the owner drops with a diagnostic; invariant
//! violations are clamped where the mutation happens.

use crate::state::{ActionSlot, EntityId, PeerId};

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same proposal may succeed later.
    ///
    /// Examples: on cooldown, out of range
    Recoverable,

    /// Invalid input; should not be retried unchanged.
    ///
    /// Examples: unknown skill, implausible resource sync
    Validation,

    /// Authority violation: the sender may not mutate the entity.
    Authority,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Authority => "authority",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Why an owner refused a proposal.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("{peer} is neither owner nor controller of {entity}")]
    NotAuthorized { peer: PeerId, entity: EntityId },

    #[error("entity {entity} is not known to this owner")]
    UnknownEntity { entity: EntityId },

    #[error("actor {entity} is dead")]
    ActorDead { entity: EntityId },

    #[error("actor {entity} is stunned or frozen")]
    Incapacitated { entity: EntityId },

    #[error("target {target} is dead")]
    TargetDead { target: EntityId },

    #[error("action requires a target")]
    MissingTarget,

    #[error("action does not go through the damage pipeline")]
    NotOffensive,

    #[error("no skill in slot {slot}")]
    UnknownSkill { slot: u8 },

    #[error("{slot} on cooldown for {remaining:.2}s")]
    OnCooldown { slot: ActionSlot, remaining: f32 },

    #[error("insufficient resource: need {needed}, have {available}")]
    InsufficientResource { needed: u32, available: u32 },

    #[error("target out of range: {distance:.2} > {range:.2}")]
    OutOfRange { distance: f32, range: f32 },

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("implausible resource sync: {value} vs canonical {canonical} (max {maximum})")]
    ImplausibleSync {
        value: u32,
        canonical: u32,
        maximum: u32,
    },
}

impl Rejection {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotAuthorized { .. } => ErrorSeverity::Authority,
            Self::OnCooldown { .. }
            | Self::InsufficientResource { .. }
            | Self::OutOfRange { .. }
            | Self::Incapacitated { .. }
            | Self::InsufficientFunds { .. } => ErrorSeverity::Recoverable,
            Self::UnknownEntity { .. }
            | Self::ActorDead { .. }
            | Self::TargetDead { .. }
            | Self::MissingTarget
            | Self::NotOffensive
            | Self::UnknownSkill { .. }
            | Self::ImplausibleSync { .. } => ErrorSeverity::Validation,
        }
    }

    /// Stable identifier for diagnostics and tests.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized { .. } => "not_authorized",
            Self::UnknownEntity { .. } => "unknown_entity",
            Self::ActorDead { .. } => "actor_dead",
            Self::Incapacitated { .. } => "incapacitated",
            Self::TargetDead { .. } => "target_dead",
            Self::MissingTarget => "missing_target",
            Self::NotOffensive => "not_offensive",
            Self::UnknownSkill { .. } => "unknown_skill",
            Self::OnCooldown { .. } => "on_cooldown",
            Self::InsufficientResource { .. } => "insufficient_resource",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::ImplausibleSync { .. } => "implausible_sync",
        }
    }
}
