//! Deterministic combat rules shared by every peer.
//!
//! `combat-core` defines the canonical combat rules (stat layers, status
//! effects, auras, the damage pipeline, lifecycle) and exposes pure APIs.
//! It performs no I/O and draws randomness only through an injected
//! [`env::RollSource`], so an owner's decisions are replayable from its
//! proposal log.
pub mod action;
pub mod aura;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod lifecycle;
pub mod state;
pub mod stats;
pub mod status;

pub use action::{ActionKind, Committed, DirectOutcome, OffensePlan};
pub use aura::{Aura, AuraId, AuraKind, AuraMultipliers, AuraRegistry, AuraSpec};
pub use combat::{
    AttackerProfile, DamageCategory, DamageEvent, DamageOutcome, DamageReport, DefenderProfile,
};
pub use config::{CombatConfig, CritMitigation, StackingPolicy, StackingRules};
pub use env::{PcgRolls, RollSource, ScriptedRolls, SpatialQuery, StaticPositions};
pub use error::{ErrorSeverity, Rejection};
pub use lifecycle::{Death, Strike, StrikeResolution, TickReport, Wallet};
pub use state::{
    ActionSlot, CombatFlags, Combatant, EntityId, LifeState, PeerId, Position, ResourceMeter,
    Role, SkillEffect, SkillSpec, Tick,
};
pub use stats::{BaseStats, EffectiveStats, EquipSlot, RuneId, StatBundle, StatKind, StatSheet};
pub use status::{StatusKind, StatusSpec, TimerAction};
