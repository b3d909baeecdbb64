use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use combat_core::{EntityId, PeerId};

use super::AuthorityDirectory;
use crate::api::{Result, RuntimeError};
use crate::protocol::Proposal;
use crate::workers::Command;

/// Delivers proposals and owner-to-owner commands to the right inbox.
///
/// Proposals go through each owner's bounded queue; commands use an
/// unbounded channel so owners never block on each other.
#[derive(Clone)]
pub(crate) struct Router {
    directory: Arc<AuthorityDirectory>,
    commands: Arc<DashMap<PeerId, mpsc::UnboundedSender<Command>>>,
    proposals: Arc<DashMap<PeerId, mpsc::Sender<Proposal>>>,
}

impl Router {
    pub(crate) fn new(directory: Arc<AuthorityDirectory>) -> Self {
        Self {
            directory,
            commands: Arc::new(DashMap::new()),
            proposals: Arc::new(DashMap::new()),
        }
    }

    pub(crate) fn connect(
        &self,
        peer: PeerId,
        commands: mpsc::UnboundedSender<Command>,
        proposals: mpsc::Sender<Proposal>,
    ) {
        self.commands.insert(peer, commands);
        self.proposals.insert(peer, proposals);
    }

    pub(crate) fn directory(&self) -> &Arc<AuthorityDirectory> {
        &self.directory
    }

    /// Peers with a connected owner worker, in id order.
    pub(crate) fn peers(&self) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self.commands.iter().map(|entry| *entry.key()).collect();
        peers.sort();
        peers
    }

    pub(crate) fn is_connected(&self, peer: PeerId) -> bool {
        self.commands.contains_key(&peer)
    }

    /// Queues `proposal` on the entity owner's proposal inbox.
    pub(crate) async fn propose(&self, proposal: Proposal) -> Result<PeerId> {
        let owner = self
            .directory
            .owner_of(proposal.entity)
            .ok_or(RuntimeError::UnknownEntity {
                entity: proposal.entity,
            })?;
        let tx = self
            .proposals
            .get(&owner)
            .map(|entry| entry.value().clone())
            .ok_or(RuntimeError::UnknownPeer { peer: owner })?;

        tx.send(proposal)
            .await
            .map_err(|_| RuntimeError::InboxClosed { peer: owner })?;
        Ok(owner)
    }

    pub(crate) fn command(&self, peer: PeerId, command: Command) -> Result<()> {
        let tx = self
            .commands
            .get(&peer)
            .map(|entry| entry.value().clone())
            .ok_or(RuntimeError::UnknownPeer { peer })?;
        tx.send(command)
            .map_err(|_| RuntimeError::InboxClosed { peer })
    }

    /// Sends `command` to the current owner of `entity`.
    pub(crate) fn command_owner_of(&self, entity: EntityId, command: Command) -> Result<PeerId> {
        let owner = self
            .directory
            .owner_of(entity)
            .ok_or(RuntimeError::UnknownEntity { entity })?;
        self.command(owner, command)?;
        Ok(owner)
    }
}
