//! # Event Decoding
//!
//! Tag-dispatch decoding of shard-management events and all-or-nothing
//! decoding of cross-shard request batches.

use crate::errors::EventError;
use crate::events::{
    CommonShardRequest, ConfigShardEvent, CreateShardEvent, DepositGasEvent, PeerJoinShardEvent,
    PeerLeaveShardEvent, ShardActiveEvent, ShardEvent, WithdrawGasReqEvent, EVENT_SHARD_ACTIVATED,
    EVENT_SHARD_CONFIG_UPDATE, EVENT_SHARD_CREATE, EVENT_SHARD_GAS_DEPOSIT,
    EVENT_SHARD_GAS_WITHDRAW_DONE, EVENT_SHARD_GAS_WITHDRAW_REQ, EVENT_SHARD_PEER_JOIN,
    EVENT_SHARD_PEER_LEAVE,
};
use serde::{Deserialize, Serialize};

fn decode_variant<'a, T>(event_type: u32, payload: &'a [u8]) -> Result<T, EventError>
where
    T: Deserialize<'a>,
{
    serde_json::from_slice(payload).map_err(|source| EventError::Malformed { event_type, source })
}

/// Decode a shard-management event from its type tag and encoded payload.
///
/// Returns `Ok(None)` for `EVENT_SHARD_GAS_WITHDRAW_DONE`: the tag is
/// recognized but its handling is not wired up yet, and callers must
/// skip such events rather than treat them as failures.
///
/// # Errors
/// - `UnknownEventType` if the tag is not in the known set
/// - `Malformed` if the payload does not parse as the tagged variant
pub fn decode_shard_event(
    event_type: u32,
    payload: &[u8],
) -> Result<Option<ShardEvent>, EventError> {
    let event = match event_type {
        EVENT_SHARD_CREATE => {
            ShardEvent::Create(decode_variant::<CreateShardEvent>(event_type, payload)?)
        }
        EVENT_SHARD_CONFIG_UPDATE => {
            ShardEvent::Config(decode_variant::<ConfigShardEvent>(event_type, payload)?)
        }
        EVENT_SHARD_PEER_JOIN => {
            ShardEvent::PeerJoin(decode_variant::<PeerJoinShardEvent>(event_type, payload)?)
        }
        EVENT_SHARD_PEER_LEAVE => {
            ShardEvent::PeerLeave(decode_variant::<PeerLeaveShardEvent>(event_type, payload)?)
        }
        EVENT_SHARD_ACTIVATED => {
            ShardEvent::Active(decode_variant::<ShardActiveEvent>(event_type, payload)?)
        }
        EVENT_SHARD_GAS_DEPOSIT => {
            ShardEvent::DepositGas(decode_variant::<DepositGasEvent>(event_type, payload)?)
        }
        EVENT_SHARD_GAS_WITHDRAW_REQ => {
            ShardEvent::WithdrawGasReq(decode_variant::<WithdrawGasReqEvent>(event_type, payload)?)
        }
        // TODO: wire up withdraw-done handling once the gas settlement
        // flow lands; until then consumers ignore these events.
        EVENT_SHARD_GAS_WITHDRAW_DONE => return Ok(None),
        unknown => return Err(EventError::UnknownEventType(unknown)),
    };
    Ok(Some(event))
}

/// Container of independently-encoded cross-shard requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossShardTxPayload {
    /// Encoded inner requests, in delivery order.
    pub txs: Vec<Vec<u8>>,
}

/// Decode a batch of cross-shard requests from a container payload.
///
/// A single malformed inner element invalidates the whole batch; no
/// partial results are returned.
pub fn decode_shard_common_requests(payload: &[u8]) -> Result<Vec<CommonShardRequest>, EventError> {
    let container: CrossShardTxPayload =
        serde_json::from_slice(payload).map_err(EventError::MalformedContainer)?;

    let mut requests = Vec::with_capacity(container.txs.len());
    for raw in container.txs {
        let request: CommonShardRequest =
            bincode::deserialize(&raw).map_err(|source| EventError::MalformedRequest {
                raw: raw.clone(),
                source,
            })?;
        requests.push(request);
    }
    Ok(requests)
}
