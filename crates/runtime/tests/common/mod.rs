#![allow(dead_code)]

use combat_core::{
    ActionKind, BaseStats, CombatConfig, Combatant, EntityId, PeerId, Position, Role,
};
use combat_runtime::{
    DiagnosticEvent, Event, LifecycleEvent, Proposal, RuntimeConfig, SessionHandle,
};
use tokio::sync::broadcast;

/// Routes runtime logs through the test harness so failures show them.
pub fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Every attack hits and never crits, so outcomes are exact.
pub fn exact_config() -> RuntimeConfig {
    let mut combat = CombatConfig::default();
    combat.hit_floor = 100.0;
    combat.hit_ceiling = 100.0;
    RuntimeConfig::new(combat).with_seed(7)
}

pub fn fighter(id: u32, attack: f64) -> Combatant {
    Combatant::new(
        EntityId(id),
        Role::Player,
        BaseStats {
            attack,
            crit_chance: 0.0,
            evasion_rate: 0.0,
            ..BaseStats::default()
        },
    )
}

pub fn place(handle: &SessionHandle, id: u32, x: f32) {
    handle.set_position(EntityId(id), Position::new(x, 0.0));
}

pub fn attack(from: PeerId, actor: u32, target: u32) -> Proposal {
    Proposal::new(
        from,
        EntityId(actor),
        ActionKind::Attack {
            target: EntityId(target),
        },
    )
}

pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn rejection_codes(events: &[Event]) -> Vec<&'static str> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Diagnostic(diagnostic) => diagnostic.rejection().map(|r| r.code()),
            _ => None,
        })
        .collect()
}

pub fn deaths(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::Lifecycle(LifecycleEvent::Died { .. })))
        .count()
}

pub fn late_strikes(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::Diagnostic(DiagnosticEvent::LateStrikeDropped { .. })
            )
        })
        .count()
}

pub async fn health(handle: &SessionHandle, id: u32) -> u32 {
    handle
        .query(EntityId(id))
        .await
        .expect("entity should be queryable")
        .health
        .current()
}
