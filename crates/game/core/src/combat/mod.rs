//! Combat resolution system.
//!
//! This module provides pure functions for resolving damage. All combat logic
//! is deterministic given the injected [`RollSource`](crate::env::RollSource).
//!
//! # Core Functions
//!
//! - `resolve`: the nine-step damage pipeline
//! - `resolve_heal`: healing path, no mitigation
//! - `hit_chance` / `crit_chance`: clamped probabilities

pub mod damage;
pub mod hit;
pub mod pipeline;
pub mod result;

pub use damage::{DamageCategory, DamageEvent, DamageReport};
pub use hit::{crit_chance, hit_chance, roll_below};
pub use pipeline::{AttackerProfile, DefenderProfile, resolve, resolve_heal};
pub use result::DamageOutcome;
