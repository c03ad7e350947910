//! Denom canonicalization for ICS-20 packets
//!
//! Rate limits are keyed by the denom as it exists on *this* chain, which is
//! not always the denom carried in the packet. The transfer module hashes any
//! denom that has travelled through at least one channel into an
//! `ibc/{HASH}` identifier, and adds or strips a `port/channel` hop depending
//! on which chain the asset is native to. The rules here must match the
//! transfer module byte-for-byte, since both sides derive the identifier
//! independently.
//!
//! # Format
//! `"ibc/" + UPPERCASE_HEX(sha256(trace))` where `trace` is a `/`-separated
//! list of `port/channel` hops followed by the base denom.

use sha2::{Digest, Sha256};

/// Prefix for hashed denoms
pub const IBC_DENOM_PREFIX: &str = "ibc/";

const SEPARATOR: char = '/';

/// Where an incoming asset sits relative to this hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOrigin {
    /// The asset left through the packet's source channel earlier and is
    /// coming home; the leading hop has already been stripped.
    SourceReturning { unprefixed: String },
    /// The asset is foreign to this chain; the destination hop has been
    /// prepended.
    SinkArriving { prefixed: String },
}

impl TraceOrigin {
    /// Classify an incoming trace.
    ///
    /// The source prefix is matched on the whole `port/channel/` segment, so
    /// `transfer/channel-10/x` is not treated as returning on `channel-1`.
    pub fn classify(
        source_port: &str,
        source_channel: &str,
        dest_port: &str,
        dest_channel: &str,
        trace: &str,
    ) -> Self {
        let source_prefix = format!("{source_port}/{source_channel}/");
        match trace.strip_prefix(&source_prefix) {
            Some(unprefixed) => TraceOrigin::SourceReturning {
                unprefixed: unprefixed.to_string(),
            },
            None => TraceOrigin::SinkArriving {
                prefixed: format!("{dest_port}/{dest_channel}/{trace}"),
            },
        }
    }

    /// Denom the transfer module will credit for this asset.
    pub fn into_denom(self) -> String {
        match self {
            TraceOrigin::SourceReturning { unprefixed } => to_local_denom(&unprefixed),
            TraceOrigin::SinkArriving { prefixed } => hash_denom_trace(&prefixed),
        }
    }
}

/// Compute the `ibc/{HASH}` identifier of a full denom trace.
pub fn hash_denom_trace(trace: &str) -> String {
    let digest = Sha256::digest(trace.as_bytes());
    format!("{IBC_DENOM_PREFIX}{}", hex::encode_upper(digest))
}

/// Whether a trace has no channel hop (a native base denom).
pub fn is_native(trace: &str) -> bool {
    !trace.contains(SEPARATOR)
}

/// Native denoms are kept as is, anything with a hop is hashed.
fn to_local_denom(trace: &str) -> String {
    if is_native(trace) {
        trace.to_string()
    } else {
        hash_denom_trace(trace)
    }
}

/// Canonical denom of an outgoing packet.
///
/// The packet carries the full trace of the asset as held on this chain, so
/// native denoms pass through and everything else is hashed.
pub fn resolve_on_send(trace: &str) -> String {
    to_local_denom(trace)
}

/// Canonical denom of an incoming packet, as this chain will hold it.
pub fn resolve_on_receive(
    source_port: &str,
    source_channel: &str,
    dest_port: &str,
    dest_channel: &str,
    trace: &str,
) -> String {
    TraceOrigin::classify(source_port, source_channel, dest_port, dest_channel, trace).into_denom()
}
