//! Rate Limiter Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Governance and packet lifecycle handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    create_rate_limit, execute_add_blacklisted_denom, execute_add_rate_limit,
    execute_add_whitelisted_address_pair, execute_remove_blacklisted_denom,
    execute_remove_rate_limit, execute_remove_whitelisted_address_pair, execute_reset_rate_limit,
    execute_transfer_admin, execute_update_rate_limit, sudo_ack_packet, sudo_hour_epoch,
    sudo_recv_packet, sudo_send_packet, sudo_timeout_packet,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, SudoMsg};
use crate::query::{
    query_all_rate_limits, query_blacklisted_denoms, query_config, query_pending_send_packets,
    query_rate_limit, query_rate_limits_by_channel, query_resolve_denom,
    query_whitelisted_addresses,
};
use crate::state::{Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        admin: deps.api.addr_validate(&msg.admin)?,
        ibc_module: deps.api.addr_validate(&msg.ibc_module)?,
    };
    CONFIG.save(deps.storage, &config)?;

    let rate_limit_count = msg.rate_limits.len();
    for rate_limit in msg.rate_limits {
        create_rate_limit(deps.storage, rate_limit)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("ibc_module", config.ibc_module)
        .add_attribute("rate_limit_count", rate_limit_count.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Rate limit management
        ExecuteMsg::AddRateLimit(rate_limit) => execute_add_rate_limit(deps, info, rate_limit),
        ExecuteMsg::UpdateRateLimit(rate_limit) => {
            execute_update_rate_limit(deps, info, rate_limit)
        }
        ExecuteMsg::RemoveRateLimit { denom, channel_id } => {
            execute_remove_rate_limit(deps, info, denom, channel_id)
        }
        ExecuteMsg::ResetRateLimit {
            denom,
            channel_id,
            channel_value,
        } => execute_reset_rate_limit(deps, info, denom, channel_id, channel_value),

        // Blacklist
        ExecuteMsg::AddBlacklistedDenom { denom } => {
            execute_add_blacklisted_denom(deps, info, denom)
        }
        ExecuteMsg::RemoveBlacklistedDenom { denom } => {
            execute_remove_blacklisted_denom(deps, info, denom)
        }

        // Whitelist
        ExecuteMsg::AddWhitelistedAddressPair { sender, receiver } => {
            execute_add_whitelisted_address_pair(deps, info, sender, receiver)
        }
        ExecuteMsg::RemoveWhitelistedAddressPair { sender, receiver } => {
            execute_remove_whitelisted_address_pair(deps, info, sender, receiver)
        }

        // Admin
        ExecuteMsg::TransferAdmin { new_admin } => execute_transfer_admin(deps, info, new_admin),
    }
}

// ============================================================================
// Sudo
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, _env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    match msg {
        SudoMsg::SendPacket { packet } => sudo_send_packet(deps, packet),
        SudoMsg::RecvPacket { packet } => sudo_recv_packet(deps, packet),
        SudoMsg::AckPacket { packet, success } => sudo_ack_packet(deps, packet, success),
        SudoMsg::TimeoutPacket { packet } => sudo_timeout_packet(deps, packet),
        SudoMsg::HourEpoch {
            epoch_hour,
            channel_values,
        } => sudo_hour_epoch(deps, epoch_hour, channel_values),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::RateLimit { denom, channel_id } => {
            to_json_binary(&query_rate_limit(deps, denom, channel_id)?)
        }
        QueryMsg::AllRateLimits { start_after, limit } => {
            to_json_binary(&query_all_rate_limits(deps, start_after, limit)?)
        }
        QueryMsg::RateLimitsByChannel { channel_id } => {
            to_json_binary(&query_rate_limits_by_channel(deps, channel_id)?)
        }
        QueryMsg::BlacklistedDenoms {} => to_json_binary(&query_blacklisted_denoms(deps)?),
        QueryMsg::WhitelistedAddresses {} => to_json_binary(&query_whitelisted_addresses(deps)?),
        QueryMsg::PendingSendPackets { channel_id } => {
            to_json_binary(&query_pending_send_packets(deps, channel_id)?)
        }
        QueryMsg::ResolveDenom { direction, packet } => {
            to_json_binary(&query_resolve_denom(direction, packet))
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
