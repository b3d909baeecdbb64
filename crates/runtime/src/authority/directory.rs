use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use combat_core::{EntityId, PeerId, Rejection};

use crate::api::{Result, RuntimeError};

/// Authority token: the single owner of an entity and its optional
/// controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Authority {
    pub owner: PeerId,
    pub controller: Option<PeerId>,
}

impl Authority {
    /// Whether `peer` may propose actions for the entity.
    pub fn permits(&self, peer: PeerId) -> bool {
        self.owner == peer || self.controller == Some(peer)
    }
}

/// Session-wide map of entity → authority.
///
/// Every owner reads it to route cross-owner messages; entries change only
/// when entities are registered or removed.
#[derive(Debug, Default)]
pub struct AuthorityDirectory {
    entries: DashMap<EntityId, Authority>,
}

impl AuthorityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new entity. An entity has exactly one owner, so
    /// re-registering is refused.
    pub fn register(
        &self,
        entity: EntityId,
        owner: PeerId,
        controller: Option<PeerId>,
    ) -> Result<()> {
        match self.entries.entry(entity) {
            Entry::Occupied(existing) => Err(RuntimeError::DuplicateEntity {
                entity,
                owner: existing.get().owner,
            }),
            Entry::Vacant(slot) => {
                slot.insert(Authority { owner, controller });
                Ok(())
            }
        }
    }

    pub fn remove(&self, entity: EntityId) -> Option<Authority> {
        self.entries.remove(&entity).map(|(_, authority)| authority)
    }

    pub fn get(&self, entity: EntityId) -> Option<Authority> {
        self.entries.get(&entity).map(|entry| *entry)
    }

    pub fn owner_of(&self, entity: EntityId) -> Option<PeerId> {
        self.get(entity).map(|authority| authority.owner)
    }

    pub fn controller_of(&self, entity: EntityId) -> Option<PeerId> {
        self.get(entity).and_then(|authority| authority.controller)
    }

    /// Checks that `peer` may propose for `entity`.
    pub fn authorize(&self, peer: PeerId, entity: EntityId) -> std::result::Result<(), Rejection> {
        match self.get(entity) {
            Some(authority) if authority.permits(peer) => Ok(()),
            Some(_) => Err(Rejection::NotAuthorized { peer, entity }),
            None => Err(Rejection::UnknownEntity { entity }),
        }
    }

    /// Entities owned by `peer`, in id order.
    pub fn owned_by(&self, peer: PeerId) -> Vec<EntityId> {
        let mut owned: Vec<EntityId> = self
            .entries
            .iter()
            .filter(|entry| entry.owner == peer)
            .map(|entry| *entry.key())
            .collect();
        owned.sort();
        owned
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_controller_are_authorized() {
        let directory = AuthorityDirectory::new();
        directory
            .register(EntityId(1), PeerId::HOST, Some(PeerId(2)))
            .unwrap();

        assert_eq!(directory.authorize(PeerId::HOST, EntityId(1)), Ok(()));
        assert_eq!(directory.authorize(PeerId(2), EntityId(1)), Ok(()));
        assert_eq!(
            directory.authorize(PeerId(3), EntityId(1)),
            Err(Rejection::NotAuthorized {
                peer: PeerId(3),
                entity: EntityId(1)
            })
        );
        assert_eq!(
            directory.authorize(PeerId::HOST, EntityId(9)),
            Err(Rejection::UnknownEntity { entity: EntityId(9) })
        );
    }

    #[test]
    fn an_entity_has_exactly_one_owner() {
        let directory = AuthorityDirectory::new();
        directory.register(EntityId(4), PeerId(1), None).unwrap();

        let err = directory.register(EntityId(4), PeerId(2), None).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::DuplicateEntity { owner: PeerId(1), .. }
        ));
        assert_eq!(directory.owner_of(EntityId(4)), Some(PeerId(1)));
        assert_eq!(directory.owned_by(PeerId(1)), vec![EntityId(4)]);
    }
}
