//! Event types for different topics.

use serde::{Deserialize, Serialize};

use combat_core::{AuraId, AuraKind, EntityId, PeerId, Rejection, Tick};

/// Deaths, respawns, bounties and aura lifetimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Died {
        victim: EntityId,
        killer: Option<EntityId>,
        tick: Tick,
    },
    Respawned {
        entity: EntityId,
        tick: Tick,
    },
    BountyCredited {
        killer: EntityId,
        victim: EntityId,
        amount: u64,
    },
    AuraCast {
        aura: AuraId,
        source: EntityId,
        kind: AuraKind,
    },
    AuraExpired {
        aura: AuraId,
    },
}

/// Dropped work, reported instead of surfaced as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiagnosticEvent {
    /// An owner refused a proposal.
    ProposalRejected {
        owner: PeerId,
        from: PeerId,
        entity: EntityId,
        action: String,
        reason: Rejection,
        tick: Tick,
    },
    /// A strike arrived after its target died.
    LateStrikeDropped {
        attacker: EntityId,
        target: EntityId,
        tick: Tick,
    },
}

impl DiagnosticEvent {
    /// Rejection carried by this diagnostic, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::ProposalRejected { reason, .. } => Some(reason),
            Self::LateStrikeDropped { .. } => None,
        }
    }
}
