//! Observer side of the protocol.
//!
//! Observers apply authoritative deltas only, newest revision wins. Local
//! predictions live in a shadow copy that the next authoritative delta for
//! the same entity discards.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use combat_core::{CombatFlags, EntityId, PeerId};

use crate::api::{Result, RuntimeError};
use crate::events::Event;
use crate::protocol::{AuthoritativeDelta, Frame, encode_frame};

/// Outer boundary that carries deltas to a transport or a local view.
#[async_trait]
pub trait DeltaSink: Send {
    async fn deliver(&mut self, delta: AuthoritativeDelta) -> Result<()>;
}

/// What an observer shows for one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityView {
    pub health: u32,
    pub max_health: u32,
    pub resource: u32,
    pub max_resource: u32,
    pub flags: CombatFlags,
    /// Whether a local prediction overrides the last authoritative values.
    pub predicted: bool,
}

#[derive(Clone, Copy, Debug)]
struct Prediction {
    health: u32,
    resource: u32,
}

/// A peer's read-only view of every entity it has heard about.
#[derive(Debug)]
pub struct ObserverView {
    peer: PeerId,
    canonical: HashMap<EntityId, AuthoritativeDelta>,
    shadow: HashMap<EntityId, Prediction>,
}

impl ObserverView {
    pub fn new(peer: PeerId) -> Self {
        Self {
            peer,
            canonical: HashMap::new(),
            shadow: HashMap::new(),
        }
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }

    /// Applies `delta` if it is newer than what is held for the entity.
    ///
    /// Returns whether it was applied. An applied delta drops any shadow
    /// prediction for that entity.
    pub fn apply(&mut self, delta: AuthoritativeDelta) -> bool {
        let stale = self
            .canonical
            .get(&delta.entity)
            .is_some_and(|held| held.revision >= delta.revision);
        if stale {
            tracing::trace!(
                target: "runtime::observer",
                peer = %self.peer,
                entity = %delta.entity,
                revision = delta.revision,
                "Stale delta ignored"
            );
            return false;
        }

        self.shadow.remove(&delta.entity);
        self.canonical.insert(delta.entity, delta);
        true
    }

    /// Records a local prediction on top of the authoritative values.
    ///
    /// Ignored for entities without an authoritative delta yet.
    pub fn predict(&mut self, entity: EntityId, health: Option<u32>, resource: Option<u32>) {
        let Some(held) = self.canonical.get(&entity) else {
            return;
        };
        let base = self.shadow.get(&entity).copied().unwrap_or(Prediction {
            health: held.health,
            resource: held.resource,
        });
        self.shadow.insert(
            entity,
            Prediction {
                health: health.unwrap_or(base.health).min(held.max_health),
                resource: resource.unwrap_or(base.resource).min(held.max_resource),
            },
        );
    }

    pub fn view(&self, entity: EntityId) -> Option<EntityView> {
        let held = self.canonical.get(&entity)?;
        let prediction = self.shadow.get(&entity);
        Some(EntityView {
            health: prediction.map_or(held.health, |p| p.health),
            max_health: held.max_health,
            resource: prediction.map_or(held.resource, |p| p.resource),
            max_resource: held.max_resource,
            flags: held.flags,
            predicted: prediction.is_some(),
        })
    }

    pub fn authoritative(&self, entity: EntityId) -> Option<&AuthoritativeDelta> {
        self.canonical.get(&entity)
    }

    pub fn revision(&self, entity: EntityId) -> Option<u64> {
        self.canonical.get(&entity).map(|delta| delta.revision)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

#[async_trait]
impl DeltaSink for ObserverView {
    async fn deliver(&mut self, delta: AuthoritativeDelta) -> Result<()> {
        self.apply(delta);
        Ok(())
    }
}

/// Encodes deltas into wire frames for an external transport.
pub struct FrameSink {
    tx: mpsc::Sender<Vec<u8>>,
}

impl FrameSink {
    pub fn new(tx: mpsc::Sender<Vec<u8>>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl DeltaSink for FrameSink {
    async fn deliver(&mut self, delta: AuthoritativeDelta) -> Result<()> {
        let bytes = encode_frame(&Frame::Delta(delta))?;
        self.tx
            .send(bytes)
            .await
            .map_err(|_| RuntimeError::SinkClosed)
    }
}

/// Pumps deltas from a [`Topic::Delta`](crate::Topic::Delta) subscription
/// into `sink` until the bus closes.
///
/// Returns the number of deltas delivered. Lagging drops missed events; the
/// next delta for each entity carries its full state.
pub async fn forward_deltas<S>(mut rx: broadcast::Receiver<Event>, sink: &mut S) -> Result<u64>
where
    S: DeltaSink + ?Sized,
{
    let mut delivered = 0;
    loop {
        match rx.recv().await {
            Ok(Event::Delta(delta)) => {
                sink.deliver(delta).await?;
                delivered += 1;
            }
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(target: "runtime::observer", skipped, "Delta subscription lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return Ok(delivered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::Tick;

    fn delta(revision: u64, health: u32) -> AuthoritativeDelta {
        AuthoritativeDelta {
            entity: EntityId(1),
            owner: PeerId::HOST,
            health,
            max_health: 100,
            resource: 50,
            max_resource: 50,
            flags: CombatFlags::empty(),
            revision,
            tick: Tick::new(revision),
        }
    }

    #[test]
    fn only_newer_revisions_apply() {
        let mut view = ObserverView::new(PeerId(2));
        assert!(view.apply(delta(2, 80)));
        assert!(!view.apply(delta(1, 100)));
        assert!(!view.apply(delta(2, 10)));
        assert_eq!(view.view(EntityId(1)).map(|v| v.health), Some(80));
    }

    #[test]
    fn authoritative_delta_overwrites_prediction() {
        let mut view = ObserverView::new(PeerId(2));
        view.predict(EntityId(1), Some(10), None);
        assert!(view.view(EntityId(1)).is_none());

        view.apply(delta(1, 100));
        view.predict(EntityId(1), Some(70), Some(500));
        let predicted = view.view(EntityId(1)).unwrap();
        assert!(predicted.predicted);
        assert_eq!((predicted.health, predicted.resource), (70, 50));

        view.apply(delta(2, 90));
        let settled = view.view(EntityId(1)).unwrap();
        assert!(!settled.predicted);
        assert_eq!(settled.health, 90);
    }
}
