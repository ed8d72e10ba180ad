//! # Shard Identifiers
//!
//! Hierarchically encoded shard ids. A `u64` is split into four 16-bit
//! levels, low word first: the root shard is `0`, a child of the root
//! occupies the low word, a grandchild the next word up, and so on. The
//! parent of any shard is obtained by clearing its topmost occupied word,
//! so the parent relation needs no external lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of 16-bit levels a shard id can encode.
const MAX_LEVEL: u32 = 4;

/// Errors constructing or deriving shard ids.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShardIdError {
    /// The raw integer does not form a contiguous level prefix.
    #[error("invalid shard id encoding: {0:#x}")]
    InvalidEncoding(u64),

    /// Sub-shard index within a level must be non-zero.
    #[error("sub-shard index must be non-zero")]
    ZeroIndex,

    /// Shard is already at the deepest level.
    #[error("shard {0} is at maximum depth")]
    MaxDepth(u64),
}

/// An opaque shard address with a total order and an intrinsic
/// parent/child relation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShardId(u64);

/// The root shard id.
pub const ROOT_SHARD_ID: ShardId = ShardId(0);

impl ShardId {
    /// Create a shard id, validating the hierarchical encoding: the
    /// non-zero 16-bit words must form a contiguous prefix from the low
    /// word.
    pub fn new(id: u64) -> Result<Self, ShardIdError> {
        let shard = ShardId(id);
        let level = shard.level();
        for i in level..MAX_LEVEL {
            if shard.word(i) != 0 {
                return Err(ShardIdError::InvalidEncoding(id));
            }
        }
        Ok(shard)
    }

    /// Create a shard id without validating the encoding. For inputs
    /// already trusted (ids read back from our own storage).
    pub fn from_raw(id: u64) -> Self {
        ShardId(id)
    }

    /// The underlying integer.
    pub fn to_u64(self) -> u64 {
        self.0
    }

    /// True for the root shard.
    pub fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Depth of this shard: 0 for the root, 1 for its children, up to 4.
    pub fn level(self) -> u32 {
        (0..MAX_LEVEL)
            .take_while(|&i| self.word(i) != 0)
            .count() as u32
    }

    /// Parent shard id. The root has no parent.
    pub fn parent(self) -> Option<ShardId> {
        if self.is_root() {
            return None;
        }
        let top = self.level() - 1;
        Some(ShardId(self.0 & !(0xffffu64 << (16 * top))))
    }

    /// Derive the id of a sub-shard at the next level down. `index` is
    /// 1-based within the level.
    pub fn child(self, index: u16) -> Result<ShardId, ShardIdError> {
        if index == 0 {
            return Err(ShardIdError::ZeroIndex);
        }
        let level = self.level();
        if level >= MAX_LEVEL {
            return Err(ShardIdError::MaxDepth(self.0));
        }
        Ok(ShardId(self.0 | (u64::from(index) << (16 * level))))
    }

    fn word(self, i: u32) -> u16 {
        (self.0 >> (16 * i)) as u16
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
