//! Cloneable façade for controllers, physics and presentation.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for
//! proposing actions, spawning combatants, or streaming events from specific
//! topics.
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, oneshot};

use combat_core::{AuraRegistry, Combatant, EntityId, PeerId, Position};

use super::errors::{Result, RuntimeError};
use crate::authority::{AuthorityDirectory, Router};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::SpatialIndex;
use crate::protocol::Proposal;
use crate::workers::Command;

/// Client-facing handle to interact with a session
#[derive(Clone)]
pub struct SessionHandle {
    router: Router,
    spatial: Arc<SpatialIndex>,
    auras: Arc<RwLock<AuraRegistry>>,
    event_bus: EventBus,
}

impl SessionHandle {
    pub(crate) fn new(
        router: Router,
        spatial: Arc<SpatialIndex>,
        auras: Arc<RwLock<AuraRegistry>>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            router,
            spatial,
            auras,
            event_bus,
        }
    }

    pub(crate) fn router(&self) -> &Router {
        &self.router
    }

    /// Queue a proposal on the acting entity's owner.
    ///
    /// Returns the owner it was routed to. The owner applies it on its next
    /// tick; a refusal shows up on [`Topic::Diagnostic`], not here.
    pub async fn propose(&self, proposal: Proposal) -> Result<PeerId> {
        self.router.propose(proposal).await
    }

    /// Register a combatant under `owner` and hand it to the owner worker.
    pub async fn spawn(
        &self,
        owner: PeerId,
        controller: Option<PeerId>,
        combatant: Combatant,
    ) -> Result<()> {
        if !self.router.is_connected(owner) {
            return Err(RuntimeError::UnknownPeer { peer: owner });
        }
        let entity = combatant.id;
        self.router.directory().register(entity, owner, controller)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = self.router.command(
            owner,
            Command::Spawn {
                combatant: Box::new(combatant),
                reply: reply_tx,
            },
        );
        if let Err(err) = sent {
            self.router.directory().remove(entity);
            return Err(err);
        }

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Read the canonical copy of `entity` from its owner.
    pub async fn query(&self, entity: EntityId) -> Result<Combatant> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.router.command_owner_of(
            entity,
            Command::Query {
                entity,
                reply: reply_tx,
            },
        )?;

        reply_rx
            .await
            .map_err(RuntimeError::ReplyChannelClosed)?
            .ok_or(RuntimeError::UnknownEntity { entity })
    }

    /// Feed a position from the physics layer.
    pub fn set_position(&self, entity: EntityId, position: Position) {
        self.spatial.set_position(entity, position);
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Delta` - Authoritative deltas
    /// - `Topic::Report` - Damage and heal reports
    /// - `Topic::Lifecycle` - Deaths, respawns, bounties, auras
    /// - `Topic::Diagnostic` - Rejected proposals, dropped strikes
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn directory(&self) -> &AuthorityDirectory {
        self.router.directory()
    }

    pub fn spatial(&self) -> &Arc<SpatialIndex> {
        &self.spatial
    }

    /// Number of live auras in the shared registry.
    pub fn aura_count(&self) -> usize {
        self.auras.read().len()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
