//! # Integration Scenarios
//!
//! Cross-crate choreography: ingest/collect/evict cycles, restart
//! recovery, parent propagation, and event decoding end to end.

pub mod pool_flows;
