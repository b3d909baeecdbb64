//! Collaborator boundaries consumed by the combat rules.
//!
//! The combat core never reaches into physics or randomness directly: both are
//! injected through the traits re-exported here so owners, observers, and
//! tests can plug in their own implementations.
mod rng;
mod spatial;

pub use rng::{PcgRolls, RollSource, ScriptedRolls, compute_seed};
pub use spatial::{SpatialQuery, StaticPositions};
