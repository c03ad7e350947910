//! Message types for the rate limiter contract
//!
//! Governance drives `ExecuteMsg`, the chain's transfer middleware drives
//! `SudoMsg`, and `QueryMsg` exposes the stored records.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

use common::{Packet, PacketDirection};

use crate::state::RateLimit;

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Rate limit definition used at instantiation and by `AddRateLimit`
#[cw_serde]
pub struct RateLimitMsg {
    /// Canonical denom (native base denom or `ibc/{HASH}`)
    pub denom: String,
    pub channel_id: String,
    /// Whole percent of channel value allowed out per window (0-100)
    pub max_percent_send: Uint128,
    /// Whole percent of channel value allowed in per window (0-100)
    pub max_percent_recv: Uint128,
    pub duration_hours: u64,
    /// Current total value of the denom
    pub channel_value: Uint128,
}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Governance address for rate limit management
    pub admin: String,
    /// Transfer middleware module address
    pub ibc_module: String,
    /// Rate limits to create at genesis
    #[serde(default)]
    pub rate_limits: Vec<RateLimitMsg>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages (admin only)
#[cw_serde]
pub enum ExecuteMsg {
    /// Create a rate limit for a (denom, channel) pair
    AddRateLimit(RateLimitMsg),

    /// Replace the quota of an existing rate limit and restart its window
    UpdateRateLimit(RateLimitMsg),

    /// Delete a rate limit; the pair becomes unrestricted
    RemoveRateLimit { denom: String, channel_id: String },

    /// Manually start a new window for a rate limit
    ResetRateLimit {
        denom: String,
        channel_id: String,
        channel_value: Uint128,
    },

    /// Reject every transfer of a canonical denom
    AddBlacklistedDenom { denom: String },
    RemoveBlacklistedDenom { denom: String },

    /// Exempt transfers between a sender and receiver from rate limiting
    AddWhitelistedAddressPair { sender: String, receiver: String },
    RemoveWhitelistedAddressPair { sender: String, receiver: String },

    /// Hand governance over to a new address
    TransferAdmin { new_admin: String },
}

// ============================================================================
// Sudo Messages
// ============================================================================

/// Channel value snapshot for a denom, supplied on epoch rollover
#[cw_serde]
pub struct ChannelValue {
    pub denom: String,
    pub value: Uint128,
}

/// Packet lifecycle hooks, callable only by the chain
#[cw_serde]
pub enum SudoMsg {
    /// Outgoing packet about to be committed
    SendPacket { packet: Packet },

    /// Incoming packet about to be processed
    RecvPacket { packet: Packet },

    /// Acknowledgement for a packet sent from this chain
    AckPacket { packet: Packet, success: bool },

    /// A packet sent from this chain timed out
    TimeoutPacket { packet: Packet },

    /// Hourly epoch tick; resets every rate limit whose duration divides `epoch_hour`
    HourEpoch {
        epoch_hour: u64,
        #[serde(default)]
        channel_values: Vec<ChannelValue>,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    /// A single rate limit, if one exists
    #[returns(RateLimitResponse)]
    RateLimit { denom: String, channel_id: String },

    /// Paginated list of all rate limits ordered by (denom, channel_id)
    #[returns(RateLimitsResponse)]
    AllRateLimits {
        start_after: Option<(String, String)>,
        limit: Option<u32>,
    },

    /// All rate limits on a channel
    #[returns(RateLimitsResponse)]
    RateLimitsByChannel { channel_id: String },

    #[returns(BlacklistedDenomsResponse)]
    BlacklistedDenoms {},

    #[returns(WhitelistedAddressesResponse)]
    WhitelistedAddresses {},

    /// Sequences of send packets awaiting acknowledgement on a channel
    #[returns(PendingSendPacketsResponse)]
    PendingSendPackets { channel_id: String },

    /// Canonical denom this contract would key a packet under
    #[returns(ResolveDenomResponse)]
    ResolveDenom {
        direction: PacketDirection,
        packet: Packet,
    },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub ibc_module: Addr,
}

#[cw_serde]
pub struct RateLimitResponse {
    pub rate_limit: Option<RateLimit>,
}

#[cw_serde]
pub struct RateLimitsResponse {
    pub rate_limits: Vec<RateLimit>,
}

#[cw_serde]
pub struct BlacklistedDenomsResponse {
    pub denoms: Vec<String>,
}

#[cw_serde]
pub struct WhitelistedAddressPair {
    pub sender: String,
    pub receiver: String,
}

#[cw_serde]
pub struct WhitelistedAddressesResponse {
    pub address_pairs: Vec<WhitelistedAddressPair>,
}

#[cw_serde]
pub struct PendingSendPacketsResponse {
    pub channel_id: String,
    pub sequences: Vec<u64>,
}

#[cw_serde]
pub struct ResolveDenomResponse {
    pub denom: String,
}
