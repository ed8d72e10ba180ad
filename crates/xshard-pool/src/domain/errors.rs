//! # Domain Errors
//!
//! Error taxonomy for the cross-shard pool. Absence of a durable record
//! is never an error here: store gets return `Ok(None)` for not-found,
//! and only genuine I/O failures surface as [`StoreError`].

use shared_types::{Hash, ShardId};
use thiserror::Error;

/// Durable I/O failure other than not-found. Aborts the enclosing
/// correctness-critical operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying storage engine failed.
    #[error("store i/o failure: {0}")]
    Io(String),

    /// A record was present but did not decode.
    #[error("corrupt store record: {0}")]
    Corrupt(String),
}

/// The external transaction builder rejected a build request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("build cross-shard tx: {0}")]
pub struct TxBuildError(pub String);

/// Errors surfaced by pool operations, carrying the shard/hash context
/// of the failing store call.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Loading the persisted known-shard set failed.
    #[error("load known shard ids")]
    LoadShardIds(#[source] StoreError),

    /// Loading a shard's consumed pointer failed.
    #[error("load consumed pointer for shard {shard}")]
    LoadPointer {
        /// Shard whose pointer was requested.
        shard: ShardId,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Persisting a shard's consumed pointer failed.
    #[error("save consumed pointer for shard {shard}")]
    SavePointer {
        /// Shard whose pointer was written.
        shard: ShardId,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Loading a cross-shard message failed.
    #[error("load cross-shard msg {hash:02x?} for shard {shard}")]
    LoadMsg {
        /// Source shard of the chain being walked.
        shard: ShardId,
        /// Storage key of the failing lookup.
        hash: Hash,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Persisting a cross-shard message failed.
    #[error("save cross-shard msg {hash:02x?} for shard {shard}")]
    SaveMsg {
        /// Source shard of the message.
        shard: ShardId,
        /// Storage key of the failing write.
        hash: Hash,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Loading parent-shard messages from the parent ledger failed.
    #[error("load parent shard msgs at height {height} for shard {shard}")]
    LoadParentMsgs {
        /// Parent block height of the lookup.
        height: u32,
        /// Consuming shard the messages were recorded for.
        shard: ShardId,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// The transaction builder failed on a correctness-critical path.
    #[error("build cross-shard tx at height {height}")]
    BuildTx {
        /// Message height the build was attempted for.
        height: u32,
        /// Underlying builder failure.
        #[source]
        source: TxBuildError,
    },

    /// A message failed to serialize for content hashing.
    #[error("encode cross-shard msg")]
    EncodeMsg(#[source] bincode::Error),
}
