use serde::{Deserialize, Serialize};

use combat_core::{Death, EntityId};

/// Update one owner sends to another on behalf of an entity it does not own.
///
/// Sent strictly after the originating damage has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CrossEntity {
    /// Lifesteal owed to `entity`, capped by its owner.
    Heal {
        entity: EntityId,
        amount: u32,
        source: EntityId,
    },
    /// Bounty owed to the killer named in `death`.
    Credit { death: Death },
}

impl CrossEntity {
    /// Entity whose owner must apply this update.
    pub fn recipient(&self) -> Option<EntityId> {
        match self {
            Self::Heal { entity, .. } => Some(*entity),
            Self::Credit { death } => death.killer,
        }
    }
}
