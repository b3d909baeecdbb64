//! Worker tasks that back the session.
//!
//! One owner worker runs per peer and exclusively mutates that peer's
//! combatants; every other peer reaches them through commands.

mod authority;

pub(crate) use authority::{AuthorityWorker, Command, WorkerContext};
