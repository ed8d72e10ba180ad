//! # Shared Entities
//!
//! Records exchanged with the external account and transaction-builder
//! subsystems. The signing machinery itself lives outside this workspace;
//! these types only carry its observable outputs.

use serde::{Deserialize, Serialize};

/// Transaction format version emitted by the builder.
pub const TX_VERSION: u8 = 0;

/// Signer identity handed to the transaction builder. The key material
/// is opaque to the relay layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Serialized public key of the signer.
    pub public_key: Vec<u8>,
}

impl Account {
    /// Create an account from a serialized public key.
    pub fn new(public_key: Vec<u8>) -> Self {
        Self { public_key }
    }
}

/// An outbound transaction as produced by the external builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Format version.
    pub version: u8,
    /// Public key of the paying signer.
    pub payer: Vec<u8>,
    /// Gas price the payer committed to.
    pub gas_price: u64,
    /// Gas limit the payer committed to.
    pub gas_limit: u64,
    /// Opaque invocation payload.
    pub payload: Vec<u8>,
    /// Signature over the transaction body.
    pub signature: Vec<u8>,
}

/// Process-wide gas configuration applied to builder calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasConfig {
    /// Gas price for outbound cross-shard transactions.
    pub gas_price: u64,
    /// Gas limit for outbound cross-shard transactions.
    pub gas_limit: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            gas_price: 2500,
            gas_limit: 20000,
        }
    }
}
