//! Runtime adapters for collaborators outside the combat rules.
//!
//! The physics layer owns positions; it feeds them into a shared
//! [`SpatialIndex`] which owner workers query through
//! [`combat_core::SpatialQuery`].
mod spatial;

pub use spatial::SpatialIndex;
