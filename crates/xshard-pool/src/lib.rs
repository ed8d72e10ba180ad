//! # Cross-Shard Message Pool
//!
//! In-memory, lock-guarded index of pending cross-shard messages per
//! source shard, backed by a durable ledger store for crash recovery.
//!
//! Messages from one shard form a hash chain: each message's
//! `pre_msg_hash` points at its logical predecessor (and doubles as its
//! durable storage key), while `msg_root` is the hash the *next* message
//! will claim as its predecessor. Both recovery and collection walk the
//! chain forward from the persisted consumed pointer through `msg_root`,
//! recovery to re-index the pending set after a restart, collection to
//! batch pending messages into outbound transactions.
//!
//! ## Module Structure
//!
//! ```text
//! xshard-pool/
//! ├── domain/     # CrossShardMsg, batches, error taxonomy
//! ├── ports/      # LedgerStore + tx-builder traits, in-memory adapters
//! └── pool        # CrossShardPool operations
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod pool;
pub mod ports;

pub use domain::{
    CrossShardMsg, CrossShardMsgInfo, CrossShardTxInfo, PoolError, ShardMsgBatch, StoreError,
    TxBuildError,
};
pub use pool::CrossShardPool;
pub use ports::{CrossShardTxBuilder, EncodingTxBuilder, InMemoryLedger, LedgerStore};
