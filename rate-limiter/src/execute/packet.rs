//! Packet lifecycle hooks.
//!
//! The transfer middleware calls these through `sudo`:
//! - `SendPacket` / `RecvPacket` before the transfer takes effect; an error
//!   aborts the send or turns the receive into an error acknowledgement
//! - `AckPacket` / `TimeoutPacket` once the fate of a sent packet is known
//! - `HourEpoch` once per hour to roll accounting windows over

use std::collections::HashMap;

use cosmwasm_std::{DepsMut, Order, Response, StdResult, Storage, Uint128};

use common::{Packet, PacketDirection};

use crate::denom::{resolve_on_receive, resolve_on_send};
use crate::error::ContractError;
use crate::flow::{check_and_record, reset_flow, revert_flow};
use crate::msg::ChannelValue;
use crate::state::{
    Path, DENOM_BLACKLIST, PENDING_SEND_PACKETS, RATE_LIMITS, WHITELISTED_ADDRESS_PAIRS,
};

/// How an admitted packet was treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketOutcome {
    /// Flow was checked and recorded against a rate limit
    Recorded,
    /// No rate limit exists for the path
    Unrestricted,
    /// Sender/receiver pair is exempt
    Whitelisted,
}

impl PacketOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacketOutcome::Recorded => "recorded",
            PacketOutcome::Unrestricted => "unrestricted",
            PacketOutcome::Whitelisted => "whitelisted",
        }
    }
}

fn packet_amount(packet: &Packet) -> Result<Uint128, ContractError> {
    packet
        .data
        .parse_amount()
        .map_err(|_| ContractError::InvalidPacketAmount {
            amount: packet.data.amount.clone(),
        })
}

/// Canonical denom the packet's rate limit is keyed under.
pub fn packet_denom(direction: PacketDirection, packet: &Packet) -> String {
    match direction {
        PacketDirection::Send => resolve_on_send(&packet.data.denom),
        PacketDirection::Recv => resolve_on_receive(
            &packet.source_port,
            &packet.source_channel,
            &packet.destination_port,
            &packet.destination_channel,
            &packet.data.denom,
        ),
    }
}

/// Run the blacklist, whitelist and quota checks for a packet.
fn rate_limit_packet(
    storage: &mut dyn Storage,
    direction: PacketDirection,
    path: &Path,
    packet: &Packet,
    amount: Uint128,
) -> Result<PacketOutcome, ContractError> {
    if DENOM_BLACKLIST.has(storage, &path.denom) {
        return Err(ContractError::DenomIsBlacklisted {
            denom: path.denom.clone(),
        });
    }

    let pair = (packet.data.sender.as_str(), packet.data.receiver.as_str());
    if WHITELISTED_ADDRESS_PAIRS.has(storage, pair) {
        return Ok(PacketOutcome::Whitelisted);
    }

    if check_and_record(storage, direction, path, amount)? {
        Ok(PacketOutcome::Recorded)
    } else {
        Ok(PacketOutcome::Unrestricted)
    }
}

fn packet_response(
    method: &str,
    path: Path,
    packet: &Packet,
    amount: Uint128,
    outcome: PacketOutcome,
) -> Response {
    Response::new()
        .add_attribute("method", method)
        .add_attribute("denom", path.denom)
        .add_attribute("channel_id", path.channel_id)
        .add_attribute("sequence", packet.sequence.to_string())
        .add_attribute("amount", amount)
        .add_attribute("outcome", outcome.as_str())
}

// ============================================================================
// Send / Receive
// ============================================================================

/// Rate limit an outgoing packet on its source channel.
pub fn sudo_send_packet(deps: DepsMut, packet: Packet) -> Result<Response, ContractError> {
    let direction = PacketDirection::Send;
    let amount = packet_amount(&packet)?;
    let path = Path::new(
        packet_denom(direction, &packet),
        packet.local_channel(direction),
    );

    let outcome = rate_limit_packet(deps.storage, direction, &path, &packet, amount)?;

    // Only recorded sends can be reverted on failure
    if outcome == PacketOutcome::Recorded {
        PENDING_SEND_PACKETS.save(
            deps.storage,
            (path.channel_id.as_str(), packet.sequence),
            &path.denom,
        )?;
    }

    Ok(packet_response("send_packet", path, &packet, amount, outcome))
}

/// Rate limit an incoming packet on its destination channel.
pub fn sudo_recv_packet(deps: DepsMut, packet: Packet) -> Result<Response, ContractError> {
    let direction = PacketDirection::Recv;
    let amount = packet_amount(&packet)?;
    let path = Path::new(
        packet_denom(direction, &packet),
        packet.local_channel(direction),
    );

    let outcome = rate_limit_packet(deps.storage, direction, &path, &packet, amount)?;

    Ok(packet_response("recv_packet", path, &packet, amount, outcome))
}

// ============================================================================
// Acknowledgement / Timeout
// ============================================================================

/// Revert the outflow of a send that never completed.
///
/// Only packets sent during the current window are still pending; anything
/// older was already wiped by a reset and is left alone.
fn undo_send(storage: &mut dyn Storage, packet: &Packet) -> Result<Option<Path>, ContractError> {
    let key = (packet.source_channel.as_str(), packet.sequence);
    let Some(denom) = PENDING_SEND_PACKETS.may_load(storage, key)? else {
        return Ok(None);
    };

    let amount = packet_amount(packet)?;
    let path = Path::new(denom, packet.source_channel.as_str());
    revert_flow(storage, PacketDirection::Send, &path, amount)?;
    PENDING_SEND_PACKETS.remove(storage, key);

    Ok(Some(path))
}

fn undo_response(method: &str, packet: &Packet, reverted: Option<Path>) -> Response {
    let response = Response::new()
        .add_attribute("method", method)
        .add_attribute("channel_id", packet.source_channel.as_str())
        .add_attribute("sequence", packet.sequence.to_string())
        .add_attribute("reverted", reverted.is_some().to_string());
    match reverted {
        Some(path) => response.add_attribute("denom", path.denom),
        None => response,
    }
}

pub fn sudo_ack_packet(
    deps: DepsMut,
    packet: Packet,
    success: bool,
) -> Result<Response, ContractError> {
    if success {
        PENDING_SEND_PACKETS.remove(
            deps.storage,
            (packet.source_channel.as_str(), packet.sequence),
        );
        return Ok(undo_response("ack_packet", &packet, None));
    }

    let reverted = undo_send(deps.storage, &packet)?;
    Ok(undo_response("ack_packet", &packet, reverted))
}

pub fn sudo_timeout_packet(deps: DepsMut, packet: Packet) -> Result<Response, ContractError> {
    let reverted = undo_send(deps.storage, &packet)?;
    Ok(undo_response("timeout_packet", &packet, reverted))
}

// ============================================================================
// Epoch Rollover
// ============================================================================

/// Drop the pending send packets of `denom` on `channel_id`.
pub fn clear_pending_send_packets(
    storage: &mut dyn Storage,
    channel_id: &str,
    denom: &str,
) -> StdResult<()> {
    let sequences = PENDING_SEND_PACKETS
        .prefix(channel_id)
        .range(storage, None, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((sequence, pending_denom)) if pending_denom == denom => Some(Ok(sequence)),
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        })
        .collect::<StdResult<Vec<u64>>>()?;

    for sequence in sequences {
        PENDING_SEND_PACKETS.remove(storage, (channel_id, sequence));
    }
    Ok(())
}

/// Reset every rate limit whose window ends on `epoch_hour`.
///
/// Channel values are taken from the supplied snapshot; a rate limit whose
/// denom is missing from the snapshot keeps its previous channel value.
/// A snapshot listing the same denom twice is rejected.
pub fn sudo_hour_epoch(
    deps: DepsMut,
    epoch_hour: u64,
    channel_values: Vec<ChannelValue>,
) -> Result<Response, ContractError> {
    let mut snapshot: HashMap<String, Uint128> = HashMap::with_capacity(channel_values.len());
    for cv in channel_values {
        if snapshot.contains_key(&cv.denom) {
            return Err(ContractError::DuplicateChannelValue { denom: cv.denom });
        }
        snapshot.insert(cv.denom, cv.value);
    }

    let due = RATE_LIMITS
        .range(deps.storage, None, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((_, rate_limit)) => {
                let duration = rate_limit.quota.duration_hours;
                (duration != 0 && epoch_hour % duration == 0).then_some(Ok(rate_limit))
            }
            Err(err) => Some(Err(err)),
        })
        .collect::<StdResult<Vec<_>>>()?;

    let mut reset_count = 0u32;
    for rate_limit in due {
        let path = rate_limit.path;
        let channel_value = snapshot
            .get(&path.denom)
            .copied()
            .unwrap_or(rate_limit.flow.channel_value);
        reset_flow(deps.storage, &path, channel_value)?;
        clear_pending_send_packets(deps.storage, &path.channel_id, &path.denom)?;
        reset_count += 1;
    }

    Ok(Response::new()
        .add_attribute("method", "hour_epoch")
        .add_attribute("epoch_hour", epoch_hour.to_string())
        .add_attribute("reset_count", reset_count.to_string()))
}
