//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. Observers follow [`Topic::Delta`]; presentation
//! layers follow [`Topic::Report`].

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{DiagnosticEvent, LifecycleEvent};
