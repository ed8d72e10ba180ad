//! # Shared Types Crate
//!
//! Leaf primitives shared by every shard-relay crate: the hierarchical
//! [`ShardId`], the 32-byte [`Hash`] alias, and the signer/transaction
//! records exchanged with the external account and builder subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every cross-crate primitive lives here.
//! - **No external lookups**: shard parent/child relations are computable
//!   from the id encoding alone.

pub mod entities;
pub mod shard_id;

pub use entities::{Account, GasConfig, Transaction, TX_VERSION};
pub use shard_id::{ShardId, ShardIdError, ROOT_SHARD_ID};

/// Hash type (32-byte digest).
pub type Hash = [u8; 32];

/// The all-zero hash, used as the "no predecessor" sentinel in message
/// chains.
pub const ZERO_HASH: Hash = [0u8; 32];
