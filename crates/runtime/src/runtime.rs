//! High-level session orchestrator.
//!
//! The session owns one owner worker per peer, wires up command/event
//! channels, and drives the fixed-step loop.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use combat_core::{AuraRegistry, Combatant, PeerId, Tick};

use crate::api::{Result, RuntimeError, SessionHandle};
use crate::authority::{AuthorityDirectory, Router};
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::oracle::SpatialIndex;
use crate::workers::{AuthorityWorker, Command, WorkerContext};

/// A running combat session.
///
/// [`SessionHandle`] provides a cloneable façade for controllers and
/// observers; `Session` itself drives the clock.
pub struct Session {
    handle: SessionHandle,
    config: RuntimeConfig,
    tick: Tick,
    workers: Vec<(PeerId, JoinHandle<()>)>,
}

impl Session {
    /// Create a new session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Get a cloneable handle to this session
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Last completed tick.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Execute one fixed step.
    ///
    /// Every owner applies its queued proposals, advances its combatants and
    /// broadcasts changes. Barrier rounds then let strikes and cross-entity
    /// updates triggered by the step settle before this returns.
    pub async fn step(&mut self) -> Result<Tick> {
        let tick = self.tick.next();
        let router = self.handle.router().clone();

        let mut replies = Vec::new();
        for peer in router.peers() {
            let (reply_tx, reply_rx) = oneshot::channel();
            router.command(peer, Command::Tick { tick, reply: reply_tx })?;
            replies.push(reply_rx);
        }
        for reply in replies {
            reply.await.map_err(RuntimeError::ReplyChannelClosed)?;
        }
        self.tick = tick;

        self.settle(&router).await?;
        Ok(tick)
    }

    async fn settle(&self, router: &Router) -> Result<()> {
        for round in 0..self.config.settle_rounds {
            let mut replies = Vec::new();
            for peer in router.peers() {
                let (reply_tx, reply_rx) = oneshot::channel();
                router.command(peer, Command::Barrier { reply: reply_tx })?;
                replies.push(reply_rx);
            }

            let mut handled = 0;
            for reply in replies {
                handled += reply.await.map_err(RuntimeError::ReplyChannelClosed)?;
            }
            if handled == 0 {
                tracing::trace!(target: "runtime::session", tick = %self.tick, round, "Settled");
                return Ok(());
            }
        }

        tracing::debug!(
            target: "runtime::session",
            tick = %self.tick,
            rounds = self.config.settle_rounds,
            "Cross-owner traffic still in flight after barrier rounds"
        );
        Ok(())
    }

    /// Execute `steps` fixed steps back to back.
    pub async fn run_for(&mut self, steps: u64) -> Result<Tick> {
        for _ in 0..steps {
            self.step().await?;
        }
        Ok(self.tick)
    }

    /// Run the fixed-step loop in real time until an error occurs.
    pub async fn run(&mut self) -> Result<()> {
        let period = Duration::from_secs_f32(self.config.combat.tick_seconds.max(0.001));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.step().await?;
        }
    }

    /// Shutdown the session gracefully
    pub async fn shutdown(self) -> Result<()> {
        let router = self.handle.router().clone();
        for (peer, _) in &self.workers {
            if router.command(*peer, Command::Shutdown).is_err() {
                tracing::debug!(target: "runtime::session", %peer, "Owner worker already stopped");
            }
        }

        for (_, worker) in self.workers {
            worker.await.map_err(RuntimeError::WorkerJoin)?;
        }
        Ok(())
    }
}

/// Builder for [`Session`] with flexible configuration.
pub struct SessionBuilder {
    config: RuntimeConfig,
    peers: BTreeMap<PeerId, Vec<Combatant>>,
    authorities: Vec<(Combatant, PeerId, Option<PeerId>)>,
    spatial: Option<Arc<SpatialIndex>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            peers: BTreeMap::new(),
            authorities: Vec::new(),
            spatial: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a peer with an owner worker, even if it owns nothing yet.
    pub fn peer(mut self, peer: PeerId) -> Self {
        self.peers.entry(peer).or_default();
        self
    }

    /// Add a combatant owned and controlled by `owner`.
    pub fn combatant(self, owner: PeerId, combatant: Combatant) -> Self {
        self.register(owner, None, combatant)
    }

    /// Add a combatant owned by `owner` and driven by `controller`.
    pub fn controlled(self, owner: PeerId, controller: PeerId, combatant: Combatant) -> Self {
        self.register(owner, Some(controller), combatant)
    }

    /// Share an existing spatial index (e.g. one the physics layer writes).
    pub fn spatial(mut self, spatial: Arc<SpatialIndex>) -> Self {
        self.spatial = Some(spatial);
        self
    }

    fn register(mut self, owner: PeerId, controller: Option<PeerId>, combatant: Combatant) -> Self {
        self.peers.entry(owner).or_default();
        self.authorities.push((combatant, owner, controller));
        self
    }

    /// Build the session and start every owner worker
    pub async fn build(mut self) -> Result<Session> {
        let directory = Arc::new(AuthorityDirectory::new());
        for (combatant, owner, controller) in self.authorities {
            directory.register(combatant.id, owner, controller)?;
            self.peers.entry(owner).or_default().push(combatant);
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        tracing::info!(
            target: "runtime::session",
            seed,
            peers = self.peers.len(),
            entities = directory.len(),
            "Session starting"
        );

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let router = Router::new(directory);
        let spatial = self.spatial.unwrap_or_default();
        let auras = Arc::new(RwLock::new(AuraRegistry::new()));

        let ctx = WorkerContext {
            config: self.config.combat.clone(),
            router: router.clone(),
            spatial: Arc::clone(&spatial),
            auras: Arc::clone(&auras),
            bus: event_bus.clone(),
        };

        let mut workers = Vec::with_capacity(self.peers.len());
        for (peer, combatants) in self.peers {
            let (command_tx, command_rx) = mpsc::unbounded_channel();
            let (proposal_tx, proposal_rx) = mpsc::channel(self.config.proposal_buffer_size.max(1));
            router.connect(peer, command_tx, proposal_tx);

            let worker =
                AuthorityWorker::new(peer, ctx.clone(), combatants, command_rx, proposal_rx, seed);
            workers.push((peer, tokio::spawn(worker.run())));
        }

        Ok(Session {
            handle: SessionHandle::new(router, spatial, auras, event_bus),
            config: self.config,
            tick: Tick::ZERO,
            workers,
        })
    }
}
