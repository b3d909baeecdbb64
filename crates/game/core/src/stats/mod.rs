//! Stat system - additive layer model.
//!
//! # Architecture
//!
//! ```text
//! [ Base stats ]            stored on the combatant
//!      ↓
//! [ Equipment layers ]      one bundle per EquipSlot
//!      ↓
//! [ Rune layers ]           one bundle per RuneId
//!      ↓
//! [ Floors ]                StatFloors
//!      ↓
//! [ Aura adjustments ]      AuraMultipliers rebuilt every tick
//! ```
//!
//! Layers are never merged into a running total. Effective values are
//! recomputed from the layers on read, so removing a bundle always restores
//! the exact values it was added to.

pub mod bonus;
pub mod core;
pub mod effective;
pub mod layers;

pub use bonus::{StatBundle, StatFloors};
pub use core::{BaseStats, StatKind};
pub use effective::{EffectiveStats, StatSheet};
pub use layers::{EquipSlot, ModifierLayers, RuneId};
