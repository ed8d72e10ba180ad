//! # Domain Layer
//!
//! Cross-shard message types and the pool's error taxonomy.

pub mod entities;
pub mod errors;

pub use entities::{CrossShardMsg, CrossShardMsgInfo, CrossShardTxInfo, ShardMsgBatch};
pub use errors::{PoolError, StoreError, TxBuildError};
