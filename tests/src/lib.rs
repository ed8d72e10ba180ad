//! # shard-relay Test Suite
//!
//! Unified test crate for cross-crate choreography.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/     # Pool + events end-to-end scenarios
//!     ├── pool_flows.rs
//!     └── event_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p relay-tests
//! cargo test -p relay-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;

/// Install a test subscriber once so scenarios emit readable logs under
/// `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
