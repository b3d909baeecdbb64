//! Canonical combat state.
//!
//! Identifiers and meters live in `common`; [`Combatant`] bundles everything
//! an owner holds for one entity.

pub mod combatant;
pub mod common;
pub mod cooldowns;
pub mod skills;

pub use combatant::{CombatFlags, Combatant, LifeState, Role};
pub use common::{EntityId, PeerId, Position, ResourceMeter, Tick};
pub use cooldowns::{ActionSlot, Cooldowns};
pub use skills::{SkillBook, SkillEffect, SkillSpec};
