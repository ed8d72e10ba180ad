//! # Cross-Shard Pool
//!
//! Lock-guarded, write-through index of pending cross-shard messages per
//! source shard. The durable ledger store is the system of record; the
//! pool is rebuilt from it at startup and kept in sync on every ingest.
//!
//! One reader/writer lock guards the maps and the logically-coupled
//! store calls made while holding it: ingestion, eviction, and recovery
//! take the exclusive mode, collection the shared mode.

use crate::domain::entities::{CrossShardMsg, CrossShardMsgInfo, CrossShardTxInfo};
use crate::domain::errors::PoolError;
use crate::ports::outbound::{CrossShardTxBuilder, LedgerStore};
use parking_lot::RwLock;
use shared_types::{Account, GasConfig, Hash, ShardId, ZERO_HASH};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info};

struct PoolState {
    local_shard: ShardId,
    /// Pending messages per source shard, keyed by `pre_msg_hash`.
    shards: HashMap<u64, HashMap<Hash, CrossShardMsg>>,
    /// Every shard this node has observed traffic from or been told
    /// about; cached here and persisted through the ledger.
    shard_info: HashSet<ShardId>,
    max_block_cap: u32,
}

/// In-memory pool of pending cross-shard messages, backed by a durable
/// ledger store. Construct one instance at startup and pass it by
/// reference to every caller.
pub struct CrossShardPool {
    inner: RwLock<PoolState>,
}

impl CrossShardPool {
    /// Create an empty pool for the given local shard.
    pub fn new(local_shard: ShardId, history_cap: u32) -> Self {
        Self {
            inner: RwLock::new(PoolState {
                local_shard,
                shards: HashMap::new(),
                shard_info: HashSet::new(),
                max_block_cap: history_cap,
            }),
        }
    }

    /// Shard this pool serves.
    pub fn local_shard(&self) -> ShardId {
        self.inner.read().local_shard
    }

    /// Configured history capacity.
    pub fn history_cap(&self) -> u32 {
        self.inner.read().max_block_cap
    }

    /// Rebuild in-memory state from the durable store.
    ///
    /// For every shard the ledger has ever recorded: mark it known, read
    /// its consumed pointer, and walk the chain forward from there.
    /// Each step fetches the message stored at the cursor, indexes it
    /// under its `pre_msg_hash`, and moves the cursor to its `msg_root`,
    /// which is the storage key of the next message in the chain. A
    /// not-found lookup ends the shard's walk; a hash already indexed
    /// means the chain was already recovered and short-circuits the walk
    /// (cycle/overlap guard, not an error).
    pub fn init_shard_info(&self, ledger: &dyn LedgerStore) -> Result<(), PoolError> {
        let mut state = self.inner.write();
        let shard_ids = ledger
            .get_all_shard_ids()
            .map_err(PoolError::LoadShardIds)?
            .unwrap_or_default();
        for shard in shard_ids {
            state.shard_info.insert(shard);
            let pointer = ledger
                .get_cross_shard_hash(shard)
                .map_err(|source| PoolError::LoadPointer { shard, source })?;
            let Some(mut cursor) = pointer else {
                continue;
            };
            loop {
                let msg = match ledger.get_cross_shard_msg(&cursor) {
                    Ok(Some(msg)) => msg,
                    Ok(None) => break,
                    Err(source) => {
                        return Err(PoolError::LoadMsg {
                            shard,
                            hash: cursor,
                            source,
                        })
                    }
                };
                let entries = state.shards.entry(shard.to_u64()).or_default();
                if entries.contains_key(&msg.info.pre_msg_hash) {
                    debug!(shard = shard.to_u64(), hash = ?cursor, "chain already recovered");
                    break;
                }
                cursor = msg.info.msg_root;
                entries.insert(msg.info.pre_msg_hash, msg);
            }
        }
        Ok(())
    }

    /// Register a shard as known, persisting the updated set. No-op if
    /// already known; persistence failures are logged and absorbed (the
    /// set is rebuilt from scratch by future recovery).
    pub fn add_shard_info(&self, ledger: &dyn LedgerStore, shard: ShardId) {
        let mut state = self.inner.write();
        register_shard(&mut state, ledger, shard);
    }

    /// Snapshot of the known-shard set.
    pub fn shard_info(&self) -> HashSet<ShardId> {
        self.inner.read().shard_info.clone()
    }

    /// Insert an inbound cross-shard message into the pool and the
    /// durable store.
    ///
    /// Re-delivery of an already-indexed `pre_msg_hash` is a success
    /// no-op. The message is persisted before it becomes observable in
    /// memory, so no reader can collect a message the store might lose.
    pub fn add_cross_shard_msg(
        &self,
        ledger: &dyn LedgerStore,
        msg: CrossShardMsg,
    ) -> Result<(), PoolError> {
        let mut state = self.inner.write();
        let from = msg.info.from_shard;
        let pre_hash = msg.info.pre_msg_hash;
        let height = msg.info.msg_height;

        if let Some(entries) = state.shards.get(&from.to_u64()) {
            if entries.contains_key(&pre_hash) {
                debug!(shard = from.to_u64(), hash = ?pre_hash, "msg already queued");
                return Ok(());
            }
        }

        ledger
            .save_cross_shard_msg(&pre_hash, &msg)
            .map_err(|source| PoolError::SaveMsg {
                shard: from,
                hash: pre_hash,
                source,
            })?;

        let pointer = ledger
            .get_cross_shard_hash(from)
            .map_err(|source| PoolError::LoadPointer {
                shard: from,
                source,
            })?;
        if pointer.is_none() {
            ledger
                .save_cross_shard_hash(from, pre_hash)
                .map_err(|source| PoolError::SavePointer {
                    shard: from,
                    source,
                })?;
        }

        state
            .shards
            .entry(from.to_u64())
            .or_default()
            .insert(pre_hash, msg);
        register_shard(&mut state, ledger, from);
        info!(
            shard = from.to_u64(),
            hash = ?pre_hash,
            height,
            "queued cross-shard msg"
        );
        Ok(())
    }

    /// Collect all pending cross-shard messages as outbound
    /// transactions, grouped by source shard id.
    ///
    /// Two sources are merged: the parent ledger's recorded batch for
    /// this shard at `parent_height - 1` (non-root shards with a parent
    /// handle only), and every per-shard chain walked forward through
    /// `msg_root` from the consumed pointer — memory first, durable
    /// store as fallback — until a lookup finds nothing. Batches are
    /// ordered oldest to newest and must be applied in that order.
    ///
    /// A builder failure aborts the whole call on the parent path, but
    /// only truncates the affected shard's batch on the per-shard path.
    pub fn get_cross_shard_txs(
        &self,
        ledger: &dyn LedgerStore,
        builder: &dyn CrossShardTxBuilder,
        account: &Account,
        from_shard: ShardId,
        parent_height: u32,
        gas: &GasConfig,
    ) -> Result<HashMap<u64, Vec<CrossShardTxInfo>>, PoolError> {
        let state = self.inner.read();
        let mut collected: HashMap<u64, Vec<CrossShardTxInfo>> = HashMap::new();

        if let Some(parent_shard) = from_shard.parent() {
            if let Some(parent_ledger) = ledger.parent() {
                let lookup_height = parent_height.saturating_sub(1);
                match parent_ledger.get_shard_msgs_in_block(lookup_height, from_shard) {
                    Ok(Some(batch)) => {
                        let tx = builder
                            .build_cross_shard_tx(account, parent_height, from_shard, gas, &batch)
                            .map_err(|source| PoolError::BuildTx {
                                height: parent_height,
                                source,
                            })?;
                        let info = CrossShardMsgInfo {
                            from_shard: parent_shard,
                            msg_height: parent_height,
                            pre_msg_hash: ZERO_HASH,
                            msg_root: ZERO_HASH,
                        };
                        collected.insert(
                            parent_shard.to_u64(),
                            vec![CrossShardTxInfo { shard_msg: info, tx }],
                        );
                    }
                    Ok(None) => {}
                    Err(source) => {
                        return Err(PoolError::LoadParentMsgs {
                            height: lookup_height,
                            shard: from_shard,
                            source,
                        })
                    }
                }
            }
        }

        for (&shard_raw, entries) in &state.shards {
            let shard = ShardId::from_raw(shard_raw);
            let mut cursor = match ledger.get_cross_shard_hash(shard) {
                Ok(Some(hash)) => hash,
                Ok(None) => ZERO_HASH,
                Err(err) => {
                    error!(
                        shard = shard_raw,
                        error = %err,
                        "failed to load consumed pointer, skipping shard"
                    );
                    continue;
                }
            };

            let mut msgs: Vec<CrossShardMsg> = Vec::new();
            loop {
                let msg = match entries.get(&cursor) {
                    Some(msg) => msg.clone(),
                    None => match ledger.get_cross_shard_msg(&cursor) {
                        Ok(Some(msg)) => msg,
                        Ok(None) => break,
                        Err(source) => {
                            return Err(PoolError::LoadMsg {
                                shard,
                                hash: cursor,
                                source,
                            })
                        }
                    },
                };
                cursor = msg.info.msg_root;
                msgs.push(msg);
            }

            let mut txs = Vec::with_capacity(msgs.len());
            for msg in msgs {
                let tx = match builder.build_cross_shard_tx(
                    account,
                    msg.info.msg_height,
                    from_shard,
                    gas,
                    &msg.shard_msg,
                ) {
                    Ok(tx) => tx,
                    Err(err) => {
                        error!(
                            shard = shard_raw,
                            height = msg.info.msg_height,
                            error = %err,
                            "cross-shard tx build failed, truncating shard batch"
                        );
                        break;
                    }
                };
                txs.push(CrossShardTxInfo {
                    shard_msg: msg.info,
                    tx,
                });
            }
            collected.insert(shard_raw, txs);
        }

        Ok(collected)
    }

    /// Evict consumed transactions and advance the per-shard consumed
    /// pointers.
    ///
    /// For each transaction the entry keyed by its forward pointer
    /// (`msg_root`) is removed from the in-memory map and the consumed
    /// pointer is set to its `pre_msg_hash`. A shard with no pool entry
    /// at all ends the whole sweep successfully, abandoning any
    /// remaining input shards. Pointer writes are fire-and-forget:
    /// failures are logged, not surfaced.
    pub fn del_cross_shard_txs(
        &self,
        ledger: &dyn LedgerStore,
        consumed: &HashMap<u64, Vec<CrossShardTxInfo>>,
    ) -> Result<(), PoolError> {
        let mut state = self.inner.write();
        for (&shard_raw, shard_txs) in consumed {
            for tx_info in shard_txs {
                let Some(entries) = state.shards.get_mut(&shard_raw) else {
                    info!(shard = shard_raw, "no pool entries for shard, eviction done");
                    return Ok(());
                };
                entries.remove(&tx_info.shard_msg.msg_root);
                debug!(shard = shard_raw, hash = ?tx_info.shard_msg.msg_root, "evicted");
                let shard = ShardId::from_raw(shard_raw);
                if let Err(err) =
                    ledger.save_cross_shard_hash(shard, tx_info.shard_msg.pre_msg_hash)
                {
                    error!(
                        shard = shard_raw,
                        error = %err,
                        "failed to advance consumed pointer"
                    );
                }
            }
        }
        Ok(())
    }

    /// Number of pending entries indexed for a shard.
    pub fn pending_count(&self, shard: ShardId) -> usize {
        self.inner
            .read()
            .shards
            .get(&shard.to_u64())
            .map_or(0, |entries| entries.len())
    }

    /// True if a pending entry exists for `pre_msg_hash` of the shard.
    pub fn contains(&self, shard: ShardId, pre_msg_hash: &Hash) -> bool {
        self.inner
            .read()
            .shards
            .get(&shard.to_u64())
            .is_some_and(|entries| entries.contains_key(pre_msg_hash))
    }
}

/// Mark a shard known and persist the updated set, under the caller's
/// write lock. Best-effort: a failed write is logged and absorbed.
fn register_shard(state: &mut PoolState, ledger: &dyn LedgerStore, shard: ShardId) {
    if !state.shard_info.insert(shard) {
        return;
    }
    let mut shard_ids: Vec<ShardId> = state.shard_info.iter().copied().collect();
    shard_ids.sort();
    if let Err(err) = ledger.save_all_shard_ids(&shard_ids) {
        error!(shard = shard.to_u64(), error = %err, "failed to persist known shard set");
    }
}
