//! IBC Rate Limiter Contract - Per-Channel Quotas on Cross-Chain Asset Flow
//!
//! This contract sits behind the chain's ICS-20 transfer middleware and decides
//! whether each transfer packet may proceed.
//!
//! # Outgoing Packets
//! 1. Middleware forwards the decoded packet via `SudoMsg::SendPacket`
//! 2. The denom trace is resolved to its canonical identifier
//! 3. Net outflow on the packet's source channel is checked against the quota
//! 4. If admitted, the packet is tracked until it is acknowledged or times out
//!
//! # Incoming Packets
//! 1. Middleware forwards the decoded packet via `SudoMsg::RecvPacket`
//! 2. The denom is resolved the way the transfer module will mint/unescrow it
//! 3. Net inflow on the destination channel is checked against the quota
//!
//! # Accounting Windows
//! Every hour the chain sends `SudoMsg::HourEpoch`; rate limits whose
//! `duration_hours` divides the epoch hour have their flow reset.

pub mod contract;
pub mod denom;
pub mod error;
mod execute;
pub mod flow;
pub mod msg;
mod query;
pub mod state;

pub use crate::denom::{hash_denom_trace, resolve_on_receive, resolve_on_send};
pub use crate::error::ContractError;
pub use crate::flow::{check_and_record, reset_flow, revert_flow};
