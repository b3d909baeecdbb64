//! Authority and synchronization runtime for the combat rules.
//!
//! Modules:
//! - [`api`]: the public façade ([`SessionHandle`], errors)
//! - [`authority`]: ownership directory and routing
//! - [`config`]: runtime configuration and tracing setup
//! - [`events`]: topic-based event bus
//! - [`observer`]: observer views and delta sinks
//! - [`oracle`]: spatial index fed by the physics layer
//! - [`protocol`]: proposals, deltas and wire frames
//! - [`runtime`]: the session and its fixed-step loop
//!
//! Each peer runs one owner worker that exclusively mutates its combatants.
//! Controllers send proposals to the owner, owners resolve them with
//! `combat-core`, and every accepted change is broadcast as an
//! [`AuthoritativeDelta`].
pub mod api;
pub mod authority;
pub mod config;
pub mod events;
pub mod observer;
pub mod oracle;
pub mod protocol;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, SessionHandle};
pub use authority::{Authority, AuthorityDirectory};
pub use config::{RuntimeConfig, init_tracing};
pub use events::{DiagnosticEvent, Event, EventBus, LifecycleEvent, Topic};
pub use observer::{DeltaSink, EntityView, FrameSink, ObserverView, forward_deltas};
pub use oracle::SpatialIndex;
pub use protocol::{AuthoritativeDelta, CodecError, CrossEntity, Frame, Proposal};
pub use runtime::{Session, SessionBuilder};
