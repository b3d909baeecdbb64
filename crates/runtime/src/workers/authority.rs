//! Owner worker: the single writer for one peer's combatants.
//!
//! Receives proposals on a bounded queue and owner-to-owner commands on an
//! unbounded inbox. Proposals wait for the next `Tick`; strikes and
//! cross-entity updates from other owners apply on receipt and broadcast
//! immediately.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use combat_core::action::{self, DirectOutcome};
use combat_core::env::compute_seed;
use combat_core::lifecycle::{self, Death};
use combat_core::{
    ActionKind, AuraRegistry, CombatConfig, Combatant, DamageReport, EntityId, ErrorSeverity,
    PcgRolls, PeerId, Rejection, SpatialQuery, Strike, Tick,
};

use crate::authority::Router;
use crate::events::{DiagnosticEvent, Event, EventBus, LifecycleEvent};
use crate::oracle::SpatialIndex;
use crate::protocol::{AuthoritativeDelta, CrossEntity, Proposal};

/// Commands delivered to an owner worker.
pub(crate) enum Command {
    /// Apply queued proposals, advance one step, broadcast changes.
    Tick { tick: Tick, reply: oneshot::Sender<()> },
    /// Reports how many owner-to-owner messages were handled since the
    /// previous barrier.
    Barrier { reply: oneshot::Sender<usize> },
    /// Strike from another owner against a combatant owned here.
    ResolveHit(Box<Strike>),
    CrossEntity(CrossEntity),
    Spawn {
        combatant: Box<Combatant>,
        reply: oneshot::Sender<()>,
    },
    Query {
        entity: EntityId,
        reply: oneshot::Sender<Option<Combatant>>,
    },
    Shutdown,
}

/// Session-wide collaborators every owner worker reads.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub(crate) config: CombatConfig,
    pub(crate) router: Router,
    pub(crate) spatial: Arc<SpatialIndex>,
    pub(crate) auras: Arc<RwLock<AuraRegistry>>,
    pub(crate) bus: EventBus,
}

impl WorkerContext {
    fn publish(&self, event: Event) {
        self.bus.publish(event);
    }

    fn report(&self, report: DamageReport) {
        let position = self.spatial.position_of(report.target);
        self.publish(Event::Report(report.at(position)));
    }
}

pub(crate) struct AuthorityWorker {
    peer: PeerId,
    ctx: WorkerContext,
    combatants: BTreeMap<EntityId, Combatant>,
    published: HashMap<EntityId, AuthoritativeDelta>,
    pending: VecDeque<Proposal>,
    commands: mpsc::UnboundedReceiver<Command>,
    proposals: mpsc::Receiver<Proposal>,
    rolls: PcgRolls,
    now: Tick,
    handled: usize,
}

impl AuthorityWorker {
    pub(crate) fn new(
        peer: PeerId,
        ctx: WorkerContext,
        combatants: Vec<Combatant>,
        commands: mpsc::UnboundedReceiver<Command>,
        proposals: mpsc::Receiver<Proposal>,
        session_seed: u64,
    ) -> Self {
        Self {
            peer,
            ctx,
            combatants: combatants.into_iter().map(|c| (c.id, c)).collect(),
            published: HashMap::new(),
            pending: VecDeque::new(),
            commands,
            proposals,
            rolls: PcgRolls::new(compute_seed(session_seed, peer.0, 0)),
            now: Tick::ZERO,
            handled: 0,
        }
    }

    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        info!(
            target: "runtime::authority",
            peer = %self.peer,
            entities = self.combatants.len(),
            "Owner worker started"
        );

        loop {
            tokio::select! {
                biased;
                Some(command) = self.commands.recv() => {
                    if !self.handle_command(command) {
                        break;
                    }
                }
                Some(proposal) = self.proposals.recv() => self.queue(proposal),
                else => break,
            }
        }

        info!(target: "runtime::authority", peer = %self.peer, "Owner worker stopped");
    }

    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Tick { tick, reply } => {
                self.on_tick(tick);
                if reply.send(()).is_err() {
                    debug!(target: "runtime::authority", "Tick reply channel closed (caller dropped)");
                }
            }
            Command::Barrier { reply } => {
                let handled = std::mem::take(&mut self.handled);
                if reply.send(handled).is_err() {
                    debug!(target: "runtime::authority", "Barrier reply channel closed (caller dropped)");
                }
            }
            Command::ResolveHit(strike) => {
                self.handled += 1;
                self.resolve_hit(*strike);
                self.publish_changes();
            }
            Command::CrossEntity(update) => {
                self.handled += 1;
                self.apply_cross(update);
                self.publish_changes();
            }
            Command::Spawn { combatant, reply } => {
                debug!(target: "runtime::authority", peer = %self.peer, entity = %combatant.id, "Combatant spawned");
                self.combatants.insert(combatant.id, *combatant);
                self.publish_changes();
                if reply.send(()).is_err() {
                    debug!(target: "runtime::authority", "Spawn reply channel closed (caller dropped)");
                }
            }
            Command::Query { entity, reply } => {
                if reply.send(self.combatants.get(&entity).cloned()).is_err() {
                    debug!(target: "runtime::authority", "Query reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn queue(&mut self, proposal: Proposal) {
        trace!(
            target: "runtime::authority",
            peer = %self.peer,
            entity = %proposal.entity,
            action = proposal.action.name(),
            "Proposal queued"
        );
        self.pending.push_back(proposal);
    }

    // ========================================================================
    // Fixed step
    // ========================================================================

    fn on_tick(&mut self, tick: Tick) {
        self.now = tick;
        while let Ok(proposal) = self.proposals.try_recv() {
            self.queue(proposal);
        }

        self.refresh_auras();
        while let Some(proposal) = self.pending.pop_front() {
            self.process(proposal);
        }

        self.prune_auras();
        self.refresh_auras();
        self.advance_all();
        self.publish_changes();
    }

    fn refresh_auras(&mut self) {
        let ids: Vec<EntityId> = self.combatants.keys().copied().collect();
        let coverage = self
            .ctx
            .auras
            .read()
            .evaluate(self.ctx.spatial.as_ref(), self.now, ids);
        for (id, auras) in coverage {
            if let Some(combatant) = self.combatants.get_mut(&id) {
                combatant.set_aura_coverage(auras);
            }
        }
    }

    fn prune_auras(&mut self) {
        let combatants = &self.combatants;
        let expired = self
            .ctx
            .auras
            .write()
            .prune_expired(self.now, |source| combatants.contains_key(&source));
        for aura in expired {
            self.ctx
                .publish(Event::Lifecycle(LifecycleEvent::AuraExpired { aura }));
        }
    }

    fn advance_all(&mut self) {
        let dt = self.ctx.config.tick_seconds;
        let mut deaths = Vec::new();
        for combatant in self.combatants.values_mut() {
            let report = lifecycle::advance(combatant, dt, &self.ctx.config, &mut self.rolls);
            for damage in report.reports {
                self.ctx.report(damage);
            }
            for timer in &report.expired_timers {
                trace!(target: "runtime::authority", entity = %combatant.id, %timer, "Timer fired");
            }
            deaths.extend(report.death);
        }
        for death in deaths {
            self.on_death(death);
        }
    }

    /// Broadcasts a delta for every combatant whose observable state changed
    /// since its last broadcast.
    fn publish_changes(&mut self) {
        for (id, combatant) in &self.combatants {
            let previous = self.published.get(id);
            let revision = previous.map_or(1, |delta| delta.revision + 1);
            let delta = AuthoritativeDelta::capture(combatant, self.peer, revision, self.now);
            if previous.is_some_and(|prev| prev.same_state(&delta)) {
                continue;
            }
            self.published.insert(*id, delta);
            self.ctx.publish(Event::Delta(delta));
        }
    }

    // ========================================================================
    // Proposals
    // ========================================================================

    fn process(&mut self, proposal: Proposal) {
        if let Some(declared) = proposal.declared
            && declared != self.now
        {
            trace!(
                target: "runtime::authority",
                entity = %proposal.entity,
                %declared,
                owner_clock = %self.now,
                "Proposer clock differs (advisory)"
            );
        }

        if let Err(reason) = self.execute(proposal.from, proposal.entity, &proposal.action) {
            self.reject(&proposal, reason);
        }
    }

    fn execute(
        &mut self,
        from: PeerId,
        entity: EntityId,
        action: &ActionKind,
    ) -> Result<(), Rejection> {
        self.ctx.router.directory().authorize(from, entity)?;
        if !self.combatants.contains_key(&entity) {
            return Err(Rejection::UnknownEntity { entity });
        }

        if action.is_offensive() {
            self.execute_offense(entity, action)
        } else {
            self.execute_direct(entity, action.clone())
        }
    }

    fn execute_offense(&mut self, entity: EntityId, action: &ActionKind) -> Result<(), Rejection> {
        let actor = self
            .combatants
            .get(&entity)
            .ok_or(Rejection::UnknownEntity { entity })?;
        let plan = action::plan_offense(actor, action, &self.ctx.config)?;

        if let Some(target) = plan.target {
            let target_alive = match self.combatants.get(&target) {
                Some(local) => Some(local.is_alive()),
                None if self.ctx.router.directory().owner_of(target).is_some() => None,
                None => return Err(Rejection::UnknownEntity { entity: target }),
            };
            let distance = self.ctx.spatial.distance_between(entity, target);
            action::check_target(&plan, target_alive, distance)?;
        }

        let actor = self
            .combatants
            .get_mut(&entity)
            .ok_or(Rejection::UnknownEntity { entity })?;
        let committed = action::commit(actor, plan);

        if committed.healed > 0 {
            self.ctx.report(DamageReport::heal(entity, committed.healed));
        }
        if !committed.auras.is_empty() {
            let tick_seconds = self.ctx.config.tick_seconds;
            let cast: Vec<_> = {
                let mut registry = self.ctx.auras.write();
                committed
                    .auras
                    .iter()
                    .map(|spec| (registry.cast(entity, *spec, self.now, tick_seconds), spec.kind))
                    .collect()
            };
            for (aura, kind) in cast {
                self.ctx.publish(Event::Lifecycle(LifecycleEvent::AuraCast {
                    aura,
                    source: entity,
                    kind,
                }));
            }
        }
        if let Some(strike) = committed.strike {
            self.dispatch_strike(strike);
        }
        Ok(())
    }

    fn execute_direct(&mut self, entity: EntityId, action: ActionKind) -> Result<(), Rejection> {
        let actor = self
            .combatants
            .get_mut(&entity)
            .ok_or(Rejection::UnknownEntity { entity })?;

        match action::apply_direct(actor, action, &self.ctx.config)? {
            DirectOutcome::Healed(amount) if amount > 0 => {
                self.ctx.report(DamageReport::heal(entity, amount));
            }
            DirectOutcome::Spent(amount) => {
                debug!(target: "runtime::authority", %entity, amount, "Currency spent");
            }
            DirectOutcome::Respawned => {
                self.ctx.publish(Event::Lifecycle(LifecycleEvent::Respawned {
                    entity,
                    tick: self.now,
                }));
            }
            _ => {}
        }
        Ok(())
    }

    fn reject(&self, proposal: &Proposal, reason: Rejection) {
        let action = proposal.action.name();
        match reason.severity() {
            ErrorSeverity::Authority => warn!(
                target: "runtime::authority",
                owner = %self.peer,
                from = %proposal.from,
                entity = %proposal.entity,
                action,
                "Unauthorized proposal dropped"
            ),
            _ => debug!(
                target: "runtime::authority",
                owner = %self.peer,
                entity = %proposal.entity,
                action,
                code = reason.code(),
                %reason,
                "Proposal rejected"
            ),
        }

        self.ctx
            .publish(Event::Diagnostic(DiagnosticEvent::ProposalRejected {
                owner: self.peer,
                from: proposal.from,
                entity: proposal.entity,
                action: action.to_string(),
                reason,
                tick: self.now,
            }));
    }

    // ========================================================================
    // Strikes and cross-entity updates
    // ========================================================================

    fn dispatch_strike(&mut self, strike: Strike) {
        if self.combatants.contains_key(&strike.target) {
            self.resolve_hit(strike);
            return;
        }

        let target = strike.target;
        if let Err(err) = self
            .ctx
            .router
            .command_owner_of(target, Command::ResolveHit(Box::new(strike)))
        {
            warn!(target: "runtime::authority", defender = %target, %err, "Strike could not be routed");
        }
    }

    fn resolve_hit(&mut self, strike: Strike) {
        let Some(target) = self.combatants.get_mut(&strike.target) else {
            debug!(
                target: "runtime::authority",
                peer = %self.peer,
                defender = %strike.target,
                "Strike for an entity not owned here dropped"
            );
            return;
        };

        let Some(resolution) =
            lifecycle::resolve_strike(target, &strike, &self.ctx.config, &mut self.rolls)
        else {
            self.ctx
                .publish(Event::Diagnostic(DiagnosticEvent::LateStrikeDropped {
                    attacker: strike.attacker.entity,
                    target: strike.target,
                    tick: self.now,
                }));
            return;
        };

        self.ctx.report(resolution.report);
        for outcome in &resolution.statuses {
            trace!(target: "runtime::authority", defender = %strike.target, ?outcome, "Status applied");
        }

        if let Some(death) = resolution.applied.death {
            self.on_death(death);
        }
        if resolution.lifesteal > 0 {
            self.route(CrossEntity::Heal {
                entity: strike.attacker.entity,
                amount: resolution.lifesteal,
                source: strike.target,
            });
        }
    }

    /// Applies `update` locally when the recipient is owned here, otherwise
    /// forwards it to the recipient's owner.
    fn route(&mut self, update: CrossEntity) {
        let Some(recipient) = update.recipient() else {
            return;
        };
        if self.combatants.contains_key(&recipient) {
            self.apply_cross(update);
            return;
        }
        if let Err(err) = self
            .ctx
            .router
            .command_owner_of(recipient, Command::CrossEntity(update))
        {
            warn!(target: "runtime::authority", %recipient, %err, "Cross-entity update could not be routed");
        }
    }

    fn apply_cross(&mut self, update: CrossEntity) {
        match update {
            CrossEntity::Heal {
                entity,
                amount,
                source,
            } => {
                let Some(combatant) = self.combatants.get_mut(&entity) else {
                    debug!(target: "runtime::authority", %entity, "Heal for an entity not owned here dropped");
                    return;
                };
                let healed = lifecycle::apply_heal(combatant, amount);
                trace!(target: "runtime::authority", %entity, %source, owed = amount, healed, "Lifesteal applied");
                if healed > 0 {
                    self.ctx.report(DamageReport::heal(entity, healed));
                }
            }
            CrossEntity::Credit { death } => {
                let Some(killer) = death.killer else {
                    return;
                };
                let Some(combatant) = self.combatants.get_mut(&killer) else {
                    debug!(target: "runtime::authority", %killer, "Bounty for an entity not owned here dropped");
                    return;
                };
                lifecycle::credit_kill(combatant, &death);
                self.ctx
                    .publish(Event::Lifecycle(LifecycleEvent::BountyCredited {
                        killer,
                        victim: death.victim,
                        amount: death.bounty,
                    }));
            }
        }
    }

    fn on_death(&mut self, death: Death) {
        info!(
            target: "runtime::authority",
            victim = %death.victim,
            killer = ?death.killer,
            tick = %self.now,
            "Entity died"
        );
        self.ctx.publish(Event::Lifecycle(LifecycleEvent::Died {
            victim: death.victim,
            killer: death.killer,
            tick: self.now,
        }));

        let removed = self.ctx.auras.write().remove_by_source(death.victim);
        if removed > 0 {
            debug!(target: "runtime::authority", victim = %death.victim, removed, "Auras of dead caster removed");
        }

        if death.killer.is_some() && death.bounty > 0 {
            self.route(CrossEntity::Credit { death });
        }
    }
}
