//! Common - Shared IBC Packet Types
//!
//! This package provides the decoded ICS-20 packet shapes exchanged between the
//! chain's transfer middleware and the rate limiter contract.

pub mod packet;

pub use packet::{FungibleTokenPacketData, Packet, PacketDirection};
