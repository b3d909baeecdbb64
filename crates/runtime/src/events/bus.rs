//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use combat_core::DamageReport;

use super::types::{DiagnosticEvent, LifecycleEvent};
use crate::protocol::AuthoritativeDelta;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Authoritative deltas for observers
    Delta,
    /// Damage and heal reports for presentation
    Report,
    /// Deaths, respawns, bounties, auras
    Lifecycle,
    /// Rejected proposals and dropped strikes
    Diagnostic,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Delta(AuthoritativeDelta),
    Report(DamageReport),
    Lifecycle(LifecycleEvent),
    Diagnostic(DiagnosticEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Delta(_) => Topic::Delta,
            Event::Report(_) => Topic::Report,
            Event::Lifecycle(_) => Topic::Lifecycle,
            Event::Diagnostic(_) => Topic::Diagnostic,
        }
    }
}

struct Channels {
    delta: broadcast::Sender<Event>,
    report: broadcast::Sender<Event>,
    lifecycle: broadcast::Sender<Event>,
    diagnostic: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Delta => &self.delta,
            Topic::Report => &self.report,
            Topic::Lifecycle => &self.lifecycle,
            Topic::Diagnostic => &self.diagnostic,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Every topic channel exists from construction.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                delta: broadcast::channel(capacity).0,
                report: broadcast::channel(capacity).0,
                lifecycle: broadcast::channel(capacity).0,
                diagnostic: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", ?topic, "No subscribers");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
