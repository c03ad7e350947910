//! Query handlers for the rate limiter contract.

use cosmwasm_std::{Deps, Order, StdResult};
use cw_storage_plus::Bound;

use common::{Packet, PacketDirection};

use crate::execute::packet_denom;
use crate::msg::{
    BlacklistedDenomsResponse, ConfigResponse, PendingSendPacketsResponse, RateLimitResponse,
    RateLimitsResponse, ResolveDenomResponse, WhitelistedAddressPair,
    WhitelistedAddressesResponse,
};
use crate::state::{
    CONFIG, DENOM_BLACKLIST, PENDING_SEND_PACKETS, RATE_LIMITS, WHITELISTED_ADDRESS_PAIRS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        ibc_module: config.ibc_module,
    })
}

pub fn query_rate_limit(
    deps: Deps,
    denom: String,
    channel_id: String,
) -> StdResult<RateLimitResponse> {
    let rate_limit = RATE_LIMITS.may_load(deps.storage, (denom.as_str(), channel_id.as_str()))?;
    Ok(RateLimitResponse { rate_limit })
}

/// Query paginated list of rate limits.
pub fn query_all_rate_limits(
    deps: Deps,
    start_after: Option<(String, String)>,
    limit: Option<u32>,
) -> StdResult<RateLimitsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after
        .as_ref()
        .map(|(denom, channel_id)| Bound::exclusive((denom.as_str(), channel_id.as_str())));

    let rate_limits = RATE_LIMITS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, rate_limit)| rate_limit))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(RateLimitsResponse { rate_limits })
}

pub fn query_rate_limits_by_channel(
    deps: Deps,
    channel_id: String,
) -> StdResult<RateLimitsResponse> {
    let rate_limits = RATE_LIMITS
        .range(deps.storage, None, None, Order::Ascending)
        .filter(|item| match item {
            Ok((_, rate_limit)) => rate_limit.path.channel_id == channel_id,
            Err(_) => true,
        })
        .map(|item| item.map(|(_, rate_limit)| rate_limit))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(RateLimitsResponse { rate_limits })
}

pub fn query_blacklisted_denoms(deps: Deps) -> StdResult<BlacklistedDenomsResponse> {
    let denoms = DENOM_BLACKLIST
        .keys(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<_>>>()?;
    Ok(BlacklistedDenomsResponse { denoms })
}

pub fn query_whitelisted_addresses(deps: Deps) -> StdResult<WhitelistedAddressesResponse> {
    let address_pairs = WHITELISTED_ADDRESS_PAIRS
        .keys(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(sender, receiver)| WhitelistedAddressPair { sender, receiver }))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(WhitelistedAddressesResponse { address_pairs })
}

pub fn query_pending_send_packets(
    deps: Deps,
    channel_id: String,
) -> StdResult<PendingSendPacketsResponse> {
    let sequences = PENDING_SEND_PACKETS
        .prefix(&channel_id)
        .keys(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<_>>>()?;
    Ok(PendingSendPacketsResponse {
        channel_id,
        sequences,
    })
}

pub fn query_resolve_denom(direction: PacketDirection, packet: Packet) -> ResolveDenomResponse {
    ResolveDenomResponse {
        denom: packet_denom(direction, &packet),
    }
}
