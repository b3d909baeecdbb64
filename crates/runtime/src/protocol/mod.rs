//! Messages exchanged between controllers, owners and observers.
//!
//! - `Proposal`: controller → owner, requests an action
//! - `AuthoritativeDelta`: owner → observers, canonical snapshot per entity
//! - `CrossEntity`: owner → owner, lifesteal and bounty for remote entities
//! - `codec`: length-prefixed bincode frames for the external transport

mod codec;
mod cross;
mod delta;
mod proposal;

pub use codec::{CodecError, Frame, MAX_FRAME_BYTES, decode_frame, dump_json, encode_frame};
pub use cross::CrossEntity;
pub use delta::AuthoritativeDelta;
pub use proposal::Proposal;
