//! Timed per-combatant effects.
//!
//! Status effects are advanced by the owner's fixed step. Periodic kinds emit
//! [`PeriodicTick`]s which the owner resolves as environmental damage; the
//! timer list replaces ad-hoc delayed callbacks (stealth and dash windows).

mod effect;
mod set;
mod timer;

pub use effect::{MIN_INTERVAL, PeriodicTick, StatusEffect, StatusKind, StatusSpec};
pub use set::{ApplyOutcome, StatusSet};
pub use timer::{Timer, TimerAction, TimerList};
