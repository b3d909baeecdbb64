//! Unified error types surfaced by the runtime API.
//!
//! Proposal rejections are not errors here: owners drop them and publish a
//! diagnostic event. `RuntimeError` covers plumbing failures only.
use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::{EntityId, PeerId};

use crate::protocol::CodecError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("peer {peer} has no owner worker")]
    UnknownPeer { peer: PeerId },

    #[error("entity {entity} is not registered")]
    UnknownEntity { entity: EntityId },

    #[error("entity {entity} is already owned by {owner}")]
    DuplicateEntity { entity: EntityId, owner: PeerId },

    #[error("owner worker of {peer} stopped accepting messages")]
    InboxClosed { peer: PeerId },

    #[error("owner worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("owner worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("delta sink closed")]
    SinkClosed,

    #[error(transparent)]
    Codec(#[from] CodecError),
}
