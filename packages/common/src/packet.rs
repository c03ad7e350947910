//! Decoded IBC packet types.
//!
//! The middleware decodes the ICS-20 packet before handing it to the contract,
//! so only the fields the rate limiter reads are carried here.

use std::fmt;
use std::str::FromStr;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Uint128};

/// Direction a packet travels relative to this chain
#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum PacketDirection {
    /// Packet leaves this chain (outflow)
    Send,
    /// Packet arrives on this chain (inflow)
    Recv,
}

impl fmt::Display for PacketDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketDirection::Send => write!(f, "send"),
            PacketDirection::Recv => write!(f, "recv"),
        }
    }
}

/// ICS-20 fungible token transfer payload
#[cw_serde]
pub struct FungibleTokenPacketData {
    /// Raw denom trace as it appears on the wire (e.g. `transfer/channel-0/uatom`)
    pub denom: String,
    /// Amount in the asset's base denomination, as a base-10 string
    pub amount: String,
    pub sender: String,
    pub receiver: String,
    #[serde(default)]
    pub memo: String,
}

impl FungibleTokenPacketData {
    /// Parse the string amount carried by the packet.
    pub fn parse_amount(&self) -> StdResult<Uint128> {
        Uint128::from_str(&self.amount)
    }
}

/// An IBC packet with its routing information
#[cw_serde]
pub struct Packet {
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
    pub data: FungibleTokenPacketData,
}

impl Packet {
    /// Channel whose rate limit governs this packet.
    ///
    /// Outgoing packets are limited on the channel they leave through (the
    /// source channel); incoming packets on the channel they arrive on.
    pub fn local_channel(&self, direction: PacketDirection) -> &str {
        match direction {
            PacketDirection::Send => &self.source_channel,
            PacketDirection::Recv => &self.destination_channel,
        }
    }
}
