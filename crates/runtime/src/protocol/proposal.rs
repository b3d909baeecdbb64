use serde::{Deserialize, Serialize};

use combat_core::{ActionKind, EntityId, PeerId, Tick};

/// A controller's request to act with an entity.
///
/// The declared clock is advisory: owners validate against their own clock
/// and only log the proposer's view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub entity: EntityId,
    pub from: PeerId,
    pub action: ActionKind,
    pub declared: Option<Tick>,
}

impl Proposal {
    pub fn new(from: PeerId, entity: EntityId, action: ActionKind) -> Self {
        Self {
            entity,
            from,
            action,
            declared: None,
        }
    }

    /// Attaches the proposer's local clock (builder pattern).
    pub fn declared_at(mut self, tick: Tick) -> Self {
        self.declared = Some(tick);
        self
    }
}
