//! State definitions for the rate limiter contract
//!
//! Rate limits are keyed by `(denom, channel_id)` where `denom` is always the
//! canonical identifier produced by [`crate::denom`], never a raw trace.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

use common::PacketDirection;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Address allowed to add, update and remove rate limits
    pub admin: Addr,
    /// Transfer middleware module that forwards packets to this contract
    pub ibc_module: Addr,
}

// ============================================================================
// Rate Limit Records
// ============================================================================

/// Identifies a rate-limited resource
#[cw_serde]
#[derive(Eq, Hash)]
pub struct Path {
    /// Canonical denom (native base denom or `ibc/{HASH}`)
    pub denom: String,
    /// Channel on this chain
    pub channel_id: String,
}

impl Path {
    pub fn new(denom: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Path {
            denom: denom.into(),
            channel_id: channel_id.into(),
        }
    }

    /// Storage key for [`RATE_LIMITS`]
    pub fn key(&self) -> (&str, &str) {
        (&self.denom, &self.channel_id)
    }
}

/// Quota policy for a path
///
/// Percentages are whole percents of the channel value, in `0..=100`.
#[cw_serde]
pub struct Quota {
    pub max_percent_send: Uint128,
    pub max_percent_recv: Uint128,
    /// Length of the accounting window; flow is reset on every epoch hour divisible by this
    pub duration_hours: u64,
}

impl Quota {
    pub fn max_percent(&self, direction: PacketDirection) -> Uint128 {
        match direction {
            PacketDirection::Send => self.max_percent_send,
            PacketDirection::Recv => self.max_percent_recv,
        }
    }
}

/// Accounting state for the current window
#[cw_serde]
#[derive(Default)]
pub struct Flow {
    pub inflow: Uint128,
    pub outflow: Uint128,
    /// Snapshot of the total value of the denom, refreshed on reset
    pub channel_value: Uint128,
}

impl Flow {
    pub fn new(channel_value: Uint128) -> Self {
        Flow {
            inflow: Uint128::zero(),
            outflow: Uint128::zero(),
            channel_value,
        }
    }
}

/// A rate limit record: one per `(denom, channel_id)`
#[cw_serde]
pub struct RateLimit {
    pub path: Path,
    pub quota: Quota,
    pub flow: Flow,
}

/// Which counter of a [`Flow`] a quota violation was measured on
#[cw_serde]
#[derive(Copy, Eq)]
pub enum FlowSide {
    Inflow,
    Outflow,
}

impl From<PacketDirection> for FlowSide {
    fn from(direction: PacketDirection) -> Self {
        match direction {
            PacketDirection::Send => FlowSide::Outflow,
            PacketDirection::Recv => FlowSide::Inflow,
        }
    }
}

impl fmt::Display for FlowSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowSide::Inflow => write!(f, "Inflow"),
            FlowSide::Outflow => write!(f, "Outflow"),
        }
    }
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:ibc-rate-limiter";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quota percentages are expressed out of this denominator
pub const PERCENT_DENOMINATOR: u128 = 100;

// ============================================================================
// Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Rate limit records
/// Key: (canonical denom, channel_id), Value: RateLimit
pub const RATE_LIMITS: Map<(&str, &str), RateLimit> = Map::new("rate_limits");

/// Send packets admitted during the current window, eligible for flow reversal
/// Key: (source channel_id, sequence), Value: canonical denom of the packet
pub const PENDING_SEND_PACKETS: Map<(&str, u64), String> = Map::new("pending_send_packets");

/// Canonical denoms for which all transfers are rejected
pub const DENOM_BLACKLIST: Map<&str, bool> = Map::new("denom_blacklist");

/// (sender, receiver) pairs whose transfers bypass rate limiting
pub const WHITELISTED_ADDRESS_PAIRS: Map<(&str, &str), bool> =
    Map::new("whitelisted_address_pairs");
