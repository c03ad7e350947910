//! Execute and sudo handlers for the rate limiter contract.
//!
//! - `admin` - Rate limit, blacklist, whitelist and admin management
//! - `packet` - Packet lifecycle hooks and epoch rollover

mod admin;
mod packet;

pub use admin::*;
pub use packet::*;
