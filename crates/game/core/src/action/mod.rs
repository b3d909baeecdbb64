//! Action domain.
//!
//! # Module Structure
//!
//! - `kind`: every action a controller can propose
//! - `offense`: attacks and skills (validate, then commit into a `Strike`)
//! - `direct`: actions that only touch the acting entity

mod direct;
mod kind;
mod offense;

pub use direct::{DirectOutcome, apply_direct};
pub use kind::ActionKind;
pub use offense::{Committed, OffensePlan, check_target, commit, plan_offense};
