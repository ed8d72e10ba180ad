//! # Event Errors
//!
//! Decode failures for shard-management events and cross-shard request
//! batches. An unrecognized tag is a typed error, never a panic.

use thiserror::Error;

/// Errors decoding or encoding shard-management events.
#[derive(Debug, Error)]
pub enum EventError {
    /// Event type tag not in the known set.
    #[error("unknown shard event type: {0}")]
    UnknownEventType(u32),

    /// Payload did not parse as the tagged variant's encoding.
    #[error("malformed payload for shard event type {event_type}")]
    Malformed {
        /// Tag that selected the failing deserializer.
        event_type: u32,
        /// Underlying format error.
        #[source]
        source: serde_json::Error,
    },

    /// Event failed to serialize.
    #[error("encode shard event type {event_type}")]
    Encode {
        /// Tag of the event being serialized.
        event_type: u32,
        /// Underlying format error.
        #[source]
        source: serde_json::Error,
    },

    /// The cross-shard tx container did not parse.
    #[error("malformed cross-shard tx container")]
    MalformedContainer(#[source] serde_json::Error),

    /// One inner request of a batch did not parse; the whole batch is
    /// rejected.
    #[error("malformed shard request {raw:02x?}")]
    MalformedRequest {
        /// Raw bytes of the offending inner element.
        raw: Vec<u8>,
        /// Underlying format error.
        #[source]
        source: bincode::Error,
    },
}
