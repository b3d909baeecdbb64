//! Entity ownership and message routing.
//!
//! Authority is single-writer-per-entity: the [`AuthorityDirectory`] names
//! one owner peer per entity, and only that peer's worker mutates it.

mod directory;
mod router;

pub use directory::{Authority, AuthorityDirectory};
pub(crate) use router::Router;
