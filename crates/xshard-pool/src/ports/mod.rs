//! # Ports
//!
//! Traits for the external collaborators of the pool: the durable ledger
//! store and the outbound transaction builder.

pub mod outbound;

pub use outbound::{CrossShardTxBuilder, EncodingTxBuilder, InMemoryLedger, LedgerStore};
