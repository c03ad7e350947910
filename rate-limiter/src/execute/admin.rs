//! Governance handlers.
//!
//! This module handles:
//! - Rate limit management (add/update/remove/reset)
//! - Denom blacklist
//! - Whitelisted address pairs
//! - Admin transfer

use cosmwasm_std::{DepsMut, MessageInfo, Response, Storage, Uint128};

use crate::error::ContractError;
use crate::execute::packet::clear_pending_send_packets;
use crate::flow::reset_flow;
use crate::msg::RateLimitMsg;
use crate::state::{
    Flow, Path, Quota, RateLimit, CONFIG, DENOM_BLACKLIST, PERCENT_DENOMINATOR, RATE_LIMITS,
    WHITELISTED_ADDRESS_PAIRS,
};

fn ensure_admin(storage: &dyn Storage, info: &MessageInfo) -> Result<(), ContractError> {
    let config = CONFIG.load(storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

// ============================================================================
// Rate Limit Management
// ============================================================================

/// Validate a rate limit definition and build the record it describes.
pub fn build_rate_limit(msg: RateLimitMsg) -> Result<RateLimit, ContractError> {
    let max_percent = Uint128::new(PERCENT_DENOMINATOR);
    if msg.max_percent_send > max_percent || msg.max_percent_recv > max_percent {
        return Err(ContractError::InvalidQuota {
            reason: "percentages must be between 0 and 100".to_string(),
        });
    }
    if msg.max_percent_send.is_zero() && msg.max_percent_recv.is_zero() {
        return Err(ContractError::InvalidQuota {
            reason: "send and recv percentages cannot both be zero".to_string(),
        });
    }
    if msg.duration_hours == 0 {
        return Err(ContractError::InvalidQuota {
            reason: "duration_hours must be greater than zero".to_string(),
        });
    }
    if msg.channel_value.is_zero() {
        return Err(ContractError::ZeroChannelValue { denom: msg.denom });
    }

    Ok(RateLimit {
        path: Path::new(msg.denom, msg.channel_id),
        quota: Quota {
            max_percent_send: msg.max_percent_send,
            max_percent_recv: msg.max_percent_recv,
            duration_hours: msg.duration_hours,
        },
        flow: Flow::new(msg.channel_value),
    })
}

/// Store a new rate limit, refusing to overwrite an existing one.
pub fn create_rate_limit(
    storage: &mut dyn Storage,
    msg: RateLimitMsg,
) -> Result<RateLimit, ContractError> {
    let rate_limit = build_rate_limit(msg)?;
    let path = &rate_limit.path;
    if RATE_LIMITS.has(storage, path.key()) {
        return Err(ContractError::RateLimitAlreadyExists {
            denom: path.denom.clone(),
            channel_id: path.channel_id.clone(),
        });
    }
    RATE_LIMITS.save(storage, path.key(), &rate_limit)?;
    Ok(rate_limit)
}

/// Add a rate limit for a (denom, channel) pair.
pub fn execute_add_rate_limit(
    deps: DepsMut,
    info: MessageInfo,
    msg: RateLimitMsg,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    let rate_limit = create_rate_limit(deps.storage, msg)?;

    Ok(Response::new()
        .add_attribute("method", "add_rate_limit")
        .add_attribute("denom", rate_limit.path.denom)
        .add_attribute("channel_id", rate_limit.path.channel_id)
        .add_attribute("max_percent_send", rate_limit.quota.max_percent_send)
        .add_attribute("max_percent_recv", rate_limit.quota.max_percent_recv)
        .add_attribute("duration_hours", rate_limit.quota.duration_hours.to_string())
        .add_attribute("channel_value", rate_limit.flow.channel_value))
}

/// Replace the quota of an existing rate limit. The flow restarts from zero.
pub fn execute_update_rate_limit(
    deps: DepsMut,
    info: MessageInfo,
    msg: RateLimitMsg,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    let rate_limit = build_rate_limit(msg)?;
    let path = &rate_limit.path;
    if !RATE_LIMITS.has(deps.storage, path.key()) {
        return Err(ContractError::RateLimitNotFound {
            denom: path.denom.clone(),
            channel_id: path.channel_id.clone(),
        });
    }
    RATE_LIMITS.save(deps.storage, path.key(), &rate_limit)?;
    clear_pending_send_packets(deps.storage, &path.channel_id, &path.denom)?;

    Ok(Response::new()
        .add_attribute("method", "update_rate_limit")
        .add_attribute("denom", rate_limit.path.denom)
        .add_attribute("channel_id", rate_limit.path.channel_id)
        .add_attribute("max_percent_send", rate_limit.quota.max_percent_send)
        .add_attribute("max_percent_recv", rate_limit.quota.max_percent_recv)
        .add_attribute("duration_hours", rate_limit.quota.duration_hours.to_string()))
}

/// Remove a rate limit. Transfers on the pair become unrestricted.
pub fn execute_remove_rate_limit(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
    channel_id: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    let path = Path::new(denom, channel_id);
    if !RATE_LIMITS.has(deps.storage, path.key()) {
        return Err(ContractError::RateLimitNotFound {
            denom: path.denom,
            channel_id: path.channel_id,
        });
    }
    RATE_LIMITS.remove(deps.storage, path.key());
    clear_pending_send_packets(deps.storage, &path.channel_id, &path.denom)?;

    Ok(Response::new()
        .add_attribute("method", "remove_rate_limit")
        .add_attribute("denom", path.denom)
        .add_attribute("channel_id", path.channel_id))
}

/// Start a new accounting window for a single rate limit.
pub fn execute_reset_rate_limit(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
    channel_id: String,
    channel_value: Uint128,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    let path = Path::new(denom, channel_id);
    reset_flow(deps.storage, &path, channel_value)?;
    clear_pending_send_packets(deps.storage, &path.channel_id, &path.denom)?;

    Ok(Response::new()
        .add_attribute("method", "reset_rate_limit")
        .add_attribute("denom", path.denom)
        .add_attribute("channel_id", path.channel_id)
        .add_attribute("channel_value", channel_value))
}

// ============================================================================
// Blacklist
// ============================================================================

pub fn execute_add_blacklisted_denom(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    DENOM_BLACKLIST.save(deps.storage, &denom, &true)?;

    Ok(Response::new()
        .add_attribute("method", "add_blacklisted_denom")
        .add_attribute("denom", denom))
}

pub fn execute_remove_blacklisted_denom(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    DENOM_BLACKLIST.remove(deps.storage, &denom);

    Ok(Response::new()
        .add_attribute("method", "remove_blacklisted_denom")
        .add_attribute("denom", denom))
}

// ============================================================================
// Whitelist
// ============================================================================

pub fn execute_add_whitelisted_address_pair(
    deps: DepsMut,
    info: MessageInfo,
    sender: String,
    receiver: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    // Counterparty addresses use foreign bech32 prefixes, so they are stored as given
    WHITELISTED_ADDRESS_PAIRS.save(deps.storage, (sender.as_str(), receiver.as_str()), &true)?;

    Ok(Response::new()
        .add_attribute("method", "add_whitelisted_address_pair")
        .add_attribute("sender", sender)
        .add_attribute("receiver", receiver))
}

pub fn execute_remove_whitelisted_address_pair(
    deps: DepsMut,
    info: MessageInfo,
    sender: String,
    receiver: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    WHITELISTED_ADDRESS_PAIRS.remove(deps.storage, (sender.as_str(), receiver.as_str()));

    Ok(Response::new()
        .add_attribute("method", "remove_whitelisted_address_pair")
        .add_attribute("sender", sender)
        .add_attribute("receiver", receiver))
}

// ============================================================================
// Admin
// ============================================================================

/// Hand governance over to a new address (takes effect immediately).
pub fn execute_transfer_admin(
    deps: DepsMut,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info)?;

    let new_admin = deps.api.addr_validate(&new_admin)?;
    CONFIG.update(deps.storage, |mut config| -> Result<_, ContractError> {
        config.admin = new_admin.clone();
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("method", "transfer_admin")
        .add_attribute("new_admin", new_admin))
}
