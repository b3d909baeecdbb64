//! Runtime configuration and loaders.

use std::env;

use combat_core::{CombatConfig, CritMitigation};

/// Runtime configuration shared across the session and owner workers.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Capacity of each owner's proposal queue.
    pub proposal_buffer_size: usize,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Barrier rounds `Session::step` runs to settle cross-owner messages.
    pub settle_rounds: usize,
    /// Session seed for owner roll streams. Drawn at random when unset.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            proposal_buffer_size: 64,
            event_buffer_size: 256,
            settle_rounds: 3,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    pub fn new(combat: CombatConfig) -> Self {
        Self {
            combat,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Loads `.env` first when present. Unset or malformed variables keep
    /// their defaults.
    ///
    /// Environment variables:
    /// - `COMBAT_TICK_SECONDS` - Fixed step length (default: 0.1)
    /// - `COMBAT_HIT_FLOOR` / `COMBAT_HIT_CEILING` - Hit chance clamp (default: 5 / 95)
    /// - `COMBAT_RESISTANCE_CAP` - Resistance cap in percent (default: 80)
    /// - `COMBAT_CRIT_MITIGATION` - `bypass` or `apply` (default: bypass)
    /// - `COMBAT_SYNC_TOLERANCE` - Resource sync tolerance, fraction of max (default: 0.25)
    /// - `COMBAT_PROPOSAL_BUFFER` - Proposal queue size per owner (default: 64)
    /// - `COMBAT_EVENT_CAPACITY` - Event bus capacity per topic (default: 256)
    /// - `COMBAT_SETTLE_ROUNDS` - Barrier rounds per step (default: 3)
    /// - `COMBAT_SEED` - Session seed (default: random)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Some(seconds) = read_env::<f32>("COMBAT_TICK_SECONDS")
            && seconds > 0.0
        {
            config.combat.tick_seconds = seconds;
        }
        if let Some(floor) = read_env::<f64>("COMBAT_HIT_FLOOR") {
            config.combat.hit_floor = floor.clamp(0.0, 100.0);
        }
        if let Some(ceiling) = read_env::<f64>("COMBAT_HIT_CEILING") {
            config.combat.hit_ceiling = ceiling.clamp(config.combat.hit_floor, 100.0);
        }
        if let Some(cap) = read_env::<f64>("COMBAT_RESISTANCE_CAP") {
            config.combat.resistance_cap = cap.clamp(0.0, 100.0);
        }
        if let Some(mitigation) = read_env_mitigation("COMBAT_CRIT_MITIGATION") {
            config.combat.crit_mitigation = mitigation;
        }
        if let Some(tolerance) = read_env::<f64>("COMBAT_SYNC_TOLERANCE") {
            config.combat.sync_tolerance = tolerance.max(0.0);
        }

        if let Some(capacity) = read_env::<usize>("COMBAT_PROPOSAL_BUFFER") {
            config.proposal_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("COMBAT_EVENT_CAPACITY") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(rounds) = read_env::<usize>("COMBAT_SETTLE_ROUNDS") {
            config.settle_rounds = rounds;
        }
        config.seed = read_env::<u64>("COMBAT_SEED");

        config
    }
}

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Hosts with their own subscriber should skip this. Calling it twice is a
/// no-op.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

fn read_env_mitigation(key: &str) -> Option<CritMitigation> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "bypass" => Some(CritMitigation::Bypass),
        "apply" => Some(CritMitigation::Apply),
        _ => None,
    }
}
