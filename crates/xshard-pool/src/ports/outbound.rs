//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the pool requires the host application to provide: the
//! durable ledger store and the cross-shard transaction builder.
//!
//! Store gets return `Ok(None)` for a missing record; `Err(StoreError)`
//! is reserved for genuine I/O failure. Calls are synchronous — the pool
//! performs them while holding its lock, so the store's own timeout
//! policy bounds the critical section.

use crate::domain::entities::{CrossShardMsg, ShardMsgBatch};
use crate::domain::errors::{StoreError, TxBuildError};
use parking_lot::Mutex;
use shared_types::{Account, GasConfig, Hash, ShardId, Transaction, TX_VERSION};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Durable key-by-hash storage for cross-shard messages, the per-shard
/// consumed pointer, the known-shard set, and per-block shard message
/// batches.
///
/// Production: the node's ledger store. Testing: [`InMemoryLedger`].
pub trait LedgerStore: Send + Sync {
    /// All shard ids this ledger has ever recorded, or `None` if the set
    /// was never written.
    fn get_all_shard_ids(&self) -> Result<Option<Vec<ShardId>>, StoreError>;

    /// Persist the full known-shard set.
    fn save_all_shard_ids(&self, shard_ids: &[ShardId]) -> Result<(), StoreError>;

    /// Consumed pointer for a source shard: the key of the newest message
    /// already delivered into a local block. `None` means no message was
    /// ever consumed from that shard.
    fn get_cross_shard_hash(&self, shard: ShardId) -> Result<Option<Hash>, StoreError>;

    /// Persist the consumed pointer for a source shard.
    fn save_cross_shard_hash(&self, shard: ShardId, hash: Hash) -> Result<(), StoreError>;

    /// Fetch a cross-shard message by its storage key.
    fn get_cross_shard_msg(&self, hash: &Hash) -> Result<Option<CrossShardMsg>, StoreError>;

    /// Persist a cross-shard message under the given key.
    fn save_cross_shard_msg(&self, hash: &Hash, msg: &CrossShardMsg) -> Result<(), StoreError>;

    /// Shard message batch this ledger recorded at `height` for `shard`.
    fn get_shard_msgs_in_block(
        &self,
        height: u32,
        shard: ShardId,
    ) -> Result<Option<ShardMsgBatch>, StoreError>;

    /// Handle to the parent shard's ledger, absent for the root shard or
    /// a standalone chain.
    fn parent(&self) -> Option<&dyn LedgerStore> {
        None
    }
}

/// Builds the outbound transaction delivering a cross-shard payload into
/// a local block.
pub trait CrossShardTxBuilder: Send + Sync {
    /// Build a cross-shard transaction for `payload`, signed by
    /// `account`, priced by `gas`.
    fn build_cross_shard_tx(
        &self,
        account: &Account,
        height: u32,
        for_shard: ShardId,
        gas: &GasConfig,
        payload: &ShardMsgBatch,
    ) -> Result<Transaction, TxBuildError>;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// Production adapters live in the host node; in-memory implementations
// below back the test suites.
// =============================================================================

#[derive(Default)]
struct LedgerState {
    shard_ids: Option<Vec<ShardId>>,
    pointers: HashMap<u64, Hash>,
    msgs: HashMap<Hash, CrossShardMsg>,
    block_msgs: HashMap<(u32, u64), ShardMsgBatch>,
    fail_save_msg: bool,
    fail_save_pointer: bool,
    fail_save_shard_ids: bool,
}

/// In-memory ledger store for tests: Mutex-guarded maps plus per-call
/// failure injection for exercising abort paths.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    parent: Option<Arc<InMemoryLedger>>,
}

impl InMemoryLedger {
    /// Create an empty ledger with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger whose `parent()` handle resolves to the
    /// given ledger.
    pub fn with_parent(parent: Arc<InMemoryLedger>) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            parent: Some(parent),
        }
    }

    /// Record a shard message batch at a block height, as the block
    /// persistence path would.
    pub fn put_shard_msgs_in_block(&self, height: u32, shard: ShardId, batch: ShardMsgBatch) {
        self.state
            .lock()
            .block_msgs
            .insert((height, shard.to_u64()), batch);
    }

    /// Make subsequent `save_cross_shard_msg` calls fail.
    pub fn fail_save_msg(&self, fail: bool) {
        self.state.lock().fail_save_msg = fail;
    }

    /// Make subsequent `save_cross_shard_hash` calls fail.
    pub fn fail_save_pointer(&self, fail: bool) {
        self.state.lock().fail_save_pointer = fail;
    }

    /// Make subsequent `save_all_shard_ids` calls fail.
    pub fn fail_save_shard_ids(&self, fail: bool) {
        self.state.lock().fail_save_shard_ids = fail;
    }

    /// Number of messages persisted, for assertions.
    pub fn msg_count(&self) -> usize {
        self.state.lock().msgs.len()
    }
}

impl LedgerStore for InMemoryLedger {
    fn get_all_shard_ids(&self) -> Result<Option<Vec<ShardId>>, StoreError> {
        Ok(self.state.lock().shard_ids.clone())
    }

    fn save_all_shard_ids(&self, shard_ids: &[ShardId]) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.fail_save_shard_ids {
            return Err(StoreError::Io("injected shard-id write failure".into()));
        }
        state.shard_ids = Some(shard_ids.to_vec());
        Ok(())
    }

    fn get_cross_shard_hash(&self, shard: ShardId) -> Result<Option<Hash>, StoreError> {
        Ok(self.state.lock().pointers.get(&shard.to_u64()).copied())
    }

    fn save_cross_shard_hash(&self, shard: ShardId, hash: Hash) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.fail_save_pointer {
            return Err(StoreError::Io("injected pointer write failure".into()));
        }
        state.pointers.insert(shard.to_u64(), hash);
        Ok(())
    }

    fn get_cross_shard_msg(&self, hash: &Hash) -> Result<Option<CrossShardMsg>, StoreError> {
        Ok(self.state.lock().msgs.get(hash).cloned())
    }

    fn save_cross_shard_msg(&self, hash: &Hash, msg: &CrossShardMsg) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.fail_save_msg {
            return Err(StoreError::Io("injected msg write failure".into()));
        }
        state.msgs.insert(*hash, msg.clone());
        Ok(())
    }

    fn get_shard_msgs_in_block(
        &self,
        height: u32,
        shard: ShardId,
    ) -> Result<Option<ShardMsgBatch>, StoreError> {
        Ok(self
            .state
            .lock()
            .block_msgs
            .get(&(height, shard.to_u64()))
            .cloned())
    }

    fn parent(&self) -> Option<&dyn LedgerStore> {
        self.parent.as_ref().map(|p| p.as_ref() as &dyn LedgerStore)
    }
}

/// Test builder that wraps the payload in an unsigned transaction, with
/// optional per-height failure injection.
#[derive(Default)]
pub struct EncodingTxBuilder {
    fail_heights: Mutex<HashSet<u32>>,
}

impl EncodingTxBuilder {
    /// Create a builder that succeeds for every height.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make builds at the given height fail.
    pub fn fail_at_height(&self, height: u32) {
        self.fail_heights.lock().insert(height);
    }
}

impl CrossShardTxBuilder for EncodingTxBuilder {
    fn build_cross_shard_tx(
        &self,
        account: &Account,
        height: u32,
        _for_shard: ShardId,
        gas: &GasConfig,
        payload: &ShardMsgBatch,
    ) -> Result<Transaction, TxBuildError> {
        if self.fail_heights.lock().contains(&height) {
            return Err(TxBuildError(format!("injected build failure at {height}")));
        }
        let encoded = bincode::serialize(payload)
            .map_err(|err| TxBuildError(format!("encode payload: {err}")))?;
        Ok(Transaction {
            version: TX_VERSION,
            payer: account.public_key.clone(),
            gas_price: gas.gas_price,
            gas_limit: gas.gas_limit,
            payload: encoded,
            signature: Vec::new(),
        })
    }
}
