//! # Domain Entities
//!
//! The cross-shard message: a chained header plus an opaque batch of
//! shard-management event envelopes. Immutable once persisted; addressed
//! externally by content hash.

use crate::domain::errors::PoolError;
use serde::{Deserialize, Serialize};
use shard_events::{decode_shard_event, EventError, ShardEvent, ShardEventState};
use shared_types::{Hash, ShardId, Transaction};
use sha3::{Digest, Keccak256};

/// Header of a cross-shard message.
///
/// `pre_msg_hash` links backward to the logically prior message in the
/// sender's chain and is also the key this message is persisted under.
/// `msg_root` looks forward: it is the hash the *next* message from the
/// same sender will carry as its `pre_msg_hash`. For any source shard at
/// most one message may claim a given `pre_msg_hash`; pool insertion is
/// first-writer-wins on that key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossShardMsgInfo {
    /// Shard that produced the message.
    pub from_shard: ShardId,
    /// Block height of the producing shard.
    pub msg_height: u32,
    /// Backward link: hash of the logical predecessor.
    pub pre_msg_hash: Hash,
    /// Forward link: hash the successor will reference.
    pub msg_root: Hash,
}

/// Ordered batch of shard-management event envelopes carried as a
/// message payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardMsgBatch(pub Vec<ShardEventState>);

impl ShardMsgBatch {
    /// Create a batch from envelopes, preserving order.
    pub fn new(events: Vec<ShardEventState>) -> Self {
        Self(events)
    }

    /// Number of envelopes in the batch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the batch carries no envelopes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode every envelope in order. Envelopes whose tag is recognized
    /// but unhandled decode to nothing and are skipped.
    pub fn decode_events(&self) -> Result<Vec<ShardEvent>, EventError> {
        let mut events = Vec::with_capacity(self.0.len());
        for state in &self.0 {
            if let Some(event) = decode_shard_event(state.event_type, &state.payload)? {
                events.push(event);
            }
        }
        Ok(events)
    }
}

/// The unit of cross-shard propagation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossShardMsg {
    /// Chained header.
    pub info: CrossShardMsgInfo,
    /// Opaque payload batch.
    pub shard_msg: ShardMsgBatch,
}

impl CrossShardMsg {
    /// Content hash of the message (Keccak-256 over the canonical
    /// encoding).
    pub fn hash(&self) -> Result<Hash, PoolError> {
        let encoded = bincode::serialize(self).map_err(PoolError::EncodeMsg)?;
        let digest = Keccak256::digest(&encoded);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        Ok(hash)
    }
}

/// A pending message paired with the outbound transaction built for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossShardTxInfo {
    /// Header of the message the transaction delivers.
    pub shard_msg: CrossShardMsgInfo,
    /// The built transaction.
    pub tx: Transaction,
}
