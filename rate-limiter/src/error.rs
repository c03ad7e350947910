//! Error types for the rate limiter contract

use cosmwasm_std::{ConversionOverflowError, OverflowError, StdError, Uint128};
use thiserror::Error;

use crate::state::FlowSide;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    // ========================================================================
    // Quota Errors
    // ========================================================================

    #[error("{side} exceeds quota - attempted: {attempted}, current: {current}, threshold: {threshold}")]
    QuotaExceeded {
        side: FlowSide,
        attempted: Uint128,
        current: Uint128,
        threshold: Uint128,
    },

    #[error("Denom is blacklisted: {denom}")]
    DenomIsBlacklisted { denom: String },

    // ========================================================================
    // Rate Limit Configuration Errors
    // ========================================================================

    #[error("Rate limit not found for denom {denom} on {channel_id}")]
    RateLimitNotFound { denom: String, channel_id: String },

    #[error("Rate limit already exists for denom {denom} on {channel_id}")]
    RateLimitAlreadyExists { denom: String, channel_id: String },

    #[error("Invalid quota: {reason}")]
    InvalidQuota { reason: String },

    #[error("Channel value is zero for denom {denom}")]
    ZeroChannelValue { denom: String },

    #[error("Duplicate channel value for denom {denom}")]
    DuplicateChannelValue { denom: String },

    // ========================================================================
    // Packet Errors
    // ========================================================================

    #[error("Invalid packet amount: {amount}")]
    InvalidPacketAmount { amount: String },
}
