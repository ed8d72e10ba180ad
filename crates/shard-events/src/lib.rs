//! # Shard-Management Events
//!
//! The closed set of shard-management event variants carried inside
//! cross-shard messages, their self-describing byte encoding, and the
//! tag-dispatch decoding used by consuming shards.
//!
//! ## Module Structure
//!
//! ```text
//! shard-events/
//! ├── events/     # Event payload structs, ShardEvent sum type, envelope
//! ├── codec/      # Tag dispatch + batch request decoding
//! └── errors      # EventError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod errors;
pub mod events;

pub use codec::{decode_shard_common_requests, decode_shard_event, CrossShardTxPayload};
pub use errors::EventError;
pub use events::{
    CommonShardRequest, ConfigShardEvent, CreateShardEvent, DepositGasEvent, PeerJoinShardEvent,
    PeerLeaveShardEvent, ShardActiveEvent, ShardEvent, ShardEventState, WithdrawGasDoneEvent,
    WithdrawGasReqEvent, EVENT_SHARD_ACTIVATED, EVENT_SHARD_CONFIG_UPDATE, EVENT_SHARD_CREATE,
    EVENT_SHARD_GAS_DEPOSIT, EVENT_SHARD_GAS_WITHDRAW_DONE, EVENT_SHARD_GAS_WITHDRAW_REQ,
    EVENT_SHARD_PEER_JOIN, EVENT_SHARD_PEER_LEAVE, SHARD_EVENT_VERSION,
};
