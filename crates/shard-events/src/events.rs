//! # Event Model
//!
//! One payload struct per shard-management event variant, the
//! [`ShardEvent`] sum type giving them a common capability surface, and
//! the [`ShardEventState`] transport envelope used when an event crosses
//! a serialization boundary without its concrete type being known.
//!
//! Every variant serializes to a self-describing, field-tagged JSON
//! document and deserializes back into the same variant.

use crate::errors::EventError;
use serde::{Deserialize, Serialize};
use shared_types::ShardId;

/// Shard lifecycle event tags.
pub const EVENT_SHARD_CREATE: u32 = 0;
/// Shard configuration update tag.
pub const EVENT_SHARD_CONFIG_UPDATE: u32 = 1;
/// Peer joined a shard tag.
pub const EVENT_SHARD_PEER_JOIN: u32 = 2;
/// Shard activated tag.
pub const EVENT_SHARD_ACTIVATED: u32 = 3;
/// Peer left a shard tag.
pub const EVENT_SHARD_PEER_LEAVE: u32 = 4;
/// Gas deposited into a shard tag.
pub const EVENT_SHARD_GAS_DEPOSIT: u32 = 128;
/// Gas withdrawal requested tag.
pub const EVENT_SHARD_GAS_WITHDRAW_REQ: u32 = 129;
/// Gas withdrawal completed tag.
pub const EVENT_SHARD_GAS_WITHDRAW_DONE: u32 = 130;

/// Current envelope version.
pub const SHARD_EVENT_VERSION: u32 = 1;

/// A new shard was created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShardEvent {
    /// Shard that committed the creation.
    pub source_shard: ShardId,
    /// Height at which the creation was committed.
    pub height: u64,
    /// Id of the newly created shard.
    pub new_shard: ShardId,
}

/// A shard's configuration was updated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigShardEvent {
    /// Shard that committed the update.
    pub source_shard: ShardId,
    /// Shard whose configuration changed.
    pub target_shard: ShardId,
    /// Height at which the update was committed.
    pub height: u64,
    /// Opaque configuration document.
    pub config: serde_json::Value,
}

/// A peer joined a shard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerJoinShardEvent {
    /// Shard that committed the join.
    pub source_shard: ShardId,
    /// Shard the peer joined.
    pub target_shard: ShardId,
    /// Height at which the join was committed.
    pub height: u64,
    /// Hex-encoded public key of the joining peer.
    pub peer_pub_key: String,
}

/// A peer left a shard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerLeaveShardEvent {
    /// Shard that committed the departure.
    pub source_shard: ShardId,
    /// Shard the peer left.
    pub target_shard: ShardId,
    /// Height at which the departure was committed.
    pub height: u64,
    /// Hex-encoded public key of the departing peer.
    pub peer_pub_key: String,
}

/// A shard completed setup and became active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardActiveEvent {
    /// Shard that committed the activation.
    pub source_shard: ShardId,
    /// Shard that became active.
    pub target_shard: ShardId,
    /// Height at which the activation was committed.
    pub height: u64,
}

/// Gas was deposited into a shard account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositGasEvent {
    /// Shard the deposit originated from.
    pub source_shard: ShardId,
    /// Shard receiving the deposit.
    pub target_shard: ShardId,
    /// Height at which the deposit was committed.
    pub height: u64,
    /// Serialized address of the depositing user.
    pub user: Vec<u8>,
    /// Deposited amount.
    pub amount: u64,
}

/// A gas withdrawal was requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawGasReqEvent {
    /// Shard the request originated from.
    pub source_shard: ShardId,
    /// Shard holding the funds.
    pub target_shard: ShardId,
    /// Height at which the request was committed.
    pub height: u64,
    /// Serialized address of the withdrawing user.
    pub user: Vec<u8>,
    /// Request identifier, unique per user.
    pub withdraw_id: u64,
    /// Requested amount.
    pub amount: u64,
}

/// A gas withdrawal completed. Decoding of this variant is not wired up
/// yet; see [`crate::decode_shard_event`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawGasDoneEvent {
    /// Shard the completion originated from.
    pub source_shard: ShardId,
    /// Shard that held the funds.
    pub target_shard: ShardId,
    /// Height at which the completion was committed.
    pub height: u64,
    /// Serialized address of the withdrawing user.
    pub user: Vec<u8>,
    /// Identifier of the completed request.
    pub withdraw_id: u64,
}

/// A shard-management event. Constructed by shard-management business
/// logic when a shard-affecting action is committed; immutable once
/// constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShardEvent {
    /// Shard creation.
    Create(CreateShardEvent),
    /// Shard configuration update.
    Config(ConfigShardEvent),
    /// Peer join.
    PeerJoin(PeerJoinShardEvent),
    /// Peer departure.
    PeerLeave(PeerLeaveShardEvent),
    /// Shard activation.
    Active(ShardActiveEvent),
    /// Gas deposit.
    DepositGas(DepositGasEvent),
    /// Gas withdrawal request.
    WithdrawGasReq(WithdrawGasReqEvent),
    /// Gas withdrawal completion.
    WithdrawGasDone(WithdrawGasDoneEvent),
}

impl ShardEvent {
    /// Integer tag of this event.
    pub fn event_type(&self) -> u32 {
        match self {
            ShardEvent::Create(_) => EVENT_SHARD_CREATE,
            ShardEvent::Config(_) => EVENT_SHARD_CONFIG_UPDATE,
            ShardEvent::PeerJoin(_) => EVENT_SHARD_PEER_JOIN,
            ShardEvent::PeerLeave(_) => EVENT_SHARD_PEER_LEAVE,
            ShardEvent::Active(_) => EVENT_SHARD_ACTIVATED,
            ShardEvent::DepositGas(_) => EVENT_SHARD_GAS_DEPOSIT,
            ShardEvent::WithdrawGasReq(_) => EVENT_SHARD_GAS_WITHDRAW_REQ,
            ShardEvent::WithdrawGasDone(_) => EVENT_SHARD_GAS_WITHDRAW_DONE,
        }
    }

    /// Shard that produced the event.
    pub fn source_shard(&self) -> ShardId {
        match self {
            ShardEvent::Create(e) => e.source_shard,
            ShardEvent::Config(e) => e.source_shard,
            ShardEvent::PeerJoin(e) => e.source_shard,
            ShardEvent::PeerLeave(e) => e.source_shard,
            ShardEvent::Active(e) => e.source_shard,
            ShardEvent::DepositGas(e) => e.source_shard,
            ShardEvent::WithdrawGasReq(e) => e.source_shard,
            ShardEvent::WithdrawGasDone(e) => e.source_shard,
        }
    }

    /// Shard the event is addressed to.
    pub fn target_shard(&self) -> ShardId {
        match self {
            ShardEvent::Create(e) => e.new_shard,
            ShardEvent::Config(e) => e.target_shard,
            ShardEvent::PeerJoin(e) => e.target_shard,
            ShardEvent::PeerLeave(e) => e.target_shard,
            ShardEvent::Active(e) => e.target_shard,
            ShardEvent::DepositGas(e) => e.target_shard,
            ShardEvent::WithdrawGasReq(e) => e.target_shard,
            ShardEvent::WithdrawGasDone(e) => e.target_shard,
        }
    }

    /// Height at which the event was committed on its source shard.
    pub fn height(&self) -> u64 {
        match self {
            ShardEvent::Create(e) => e.height,
            ShardEvent::Config(e) => e.height,
            ShardEvent::PeerJoin(e) => e.height,
            ShardEvent::PeerLeave(e) => e.height,
            ShardEvent::Active(e) => e.height,
            ShardEvent::DepositGas(e) => e.height,
            ShardEvent::WithdrawGasReq(e) => e.height,
            ShardEvent::WithdrawGasDone(e) => e.height,
        }
    }

    /// Serialize the variant payload to its self-describing encoding.
    pub fn encode_payload(&self) -> Result<Vec<u8>, EventError> {
        let encoded = match self {
            ShardEvent::Create(e) => serde_json::to_vec(e),
            ShardEvent::Config(e) => serde_json::to_vec(e),
            ShardEvent::PeerJoin(e) => serde_json::to_vec(e),
            ShardEvent::PeerLeave(e) => serde_json::to_vec(e),
            ShardEvent::Active(e) => serde_json::to_vec(e),
            ShardEvent::DepositGas(e) => serde_json::to_vec(e),
            ShardEvent::WithdrawGasReq(e) => serde_json::to_vec(e),
            ShardEvent::WithdrawGasDone(e) => serde_json::to_vec(e),
        };
        encoded.map_err(|source| EventError::Encode {
            event_type: self.event_type(),
            source,
        })
    }

    /// Wrap the event into a transport envelope carrying its tag and
    /// encoded payload.
    pub fn into_state(self) -> Result<ShardEventState, EventError> {
        let payload = self.encode_payload()?;
        Ok(ShardEventState {
            version: SHARD_EVENT_VERSION,
            event_type: self.event_type(),
            to_shard: self.target_shard(),
            from_height: self.height(),
            payload,
        })
    }
}

/// Generic transport wrapper for a shard-management event whose concrete
/// type is unknown to the transport layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardEventState {
    /// Envelope version.
    pub version: u32,
    /// Event type tag selecting the payload decoder.
    pub event_type: u32,
    /// Shard the event is addressed to.
    pub to_shard: ShardId,
    /// Height on the origin shard.
    pub from_height: u64,
    /// Opaque encoded event payload.
    pub payload: Vec<u8>,
}

/// An independently-encoded cross-shard request carried inside a
/// cross-shard tx container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonShardRequest {
    /// Shard the request originated from.
    pub source_shard: ShardId,
    /// Shard the request is addressed to.
    pub target_shard: ShardId,
    /// Height on the origin shard.
    pub height: u64,
    /// Serialized address of the fee payer.
    pub payer: Vec<u8>,
    /// Fee attached to the request.
    pub fee: u64,
    /// Invoked method name.
    pub method: String,
    /// Encoded method arguments.
    pub args: Vec<u8>,
}
