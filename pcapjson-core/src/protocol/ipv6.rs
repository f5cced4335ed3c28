//! IPv6 header decoder with extension header support.

use std::net::Ipv6Addr;

use etherparse::Ipv6HeaderSlice;

use crate::error::ProtocolError;

/// Fixed IPv6 header length.
pub const HEADER_LEN: usize = 40;

/// IPv6 Next Header values for extension headers.
pub mod next_header {
    pub const HOP_BY_HOP: u8 = 0;
    pub const ROUTING: u8 = 43;
    pub const FRAGMENT: u8 = 44;
    pub const AH: u8 = 51;
    pub const NO_NEXT_HEADER: u8 = 59;
    pub const DESTINATION: u8 = 60;
    pub const MOBILITY: u8 = 135;
}

/// Check if a next header value is an extension header we can step over.
fn is_extension_header(nh: u8) -> bool {
    matches!(
        nh,
        next_header::HOP_BY_HOP
            | next_header::ROUTING
            | next_header::FRAGMENT
            | next_header::DESTINATION
            | next_header::AH
            | next_header::MOBILITY
    )
}

fn malformed(reason: String) -> ProtocolError {
    ProtocolError::MalformedNetworkHeader {
        protocol: "ipv6",
        reason,
    }
}

/// Fields of an IPv6 Fragment extension header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Fragment {
    /// Offset in 8-byte units.
    pub offset: u16,
    pub more_fragments: bool,
    pub identification: u32,
}

/// Decoded IPv6 header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Header {
    pub src: Ipv6Addr,
    pub dst: Ipv6Addr,
    pub payload_length: u16,
    /// Next Header of the fixed header.
    pub next_header: u8,
    pub hop_limit: u8,
    /// Upper-layer protocol after walking extension headers.
    pub protocol: u8,
    /// Bytes of extension headers stepped over.
    pub extension_len: usize,
    /// Present when a Fragment extension header was seen.
    pub fragment: Option<Ipv6Fragment>,
}

impl Ipv6Header {
    /// Decode an IPv6 header from the start of `data`.
    ///
    /// The version field must be 6 and the 40-byte fixed header must be present.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let first = *data
            .first()
            .ok_or_else(|| malformed("empty header".to_string()))?;

        let version = first >> 4;
        if version != 6 {
            return Err(malformed(format!("version field is {version}, expected 6")));
        }
        if data.len() < HEADER_LEN {
            return Err(malformed(format!(
                "header needs {HEADER_LEN} bytes, {} available",
                data.len()
            )));
        }

        let ipv6 = Ipv6HeaderSlice::from_slice(data).map_err(|e| malformed(e.to_string()))?;

        let first_next_header = ipv6.next_header().0;
        let chain = walk_extension_headers(first_next_header, &data[HEADER_LEN..]);

        Ok(Self {
            src: Ipv6Addr::from(ipv6.source()),
            dst: Ipv6Addr::from(ipv6.destination()),
            payload_length: ipv6.payload_length(),
            next_header: first_next_header,
            hop_limit: ipv6.hop_limit(),
            protocol: chain.protocol,
            extension_len: chain.consumed,
            fragment: chain.fragment,
        })
    }

    /// True for any piece of a fragmented datagram.
    pub fn is_fragment(&self) -> bool {
        self.fragment
            .map(|f| f.more_fragments || f.offset != 0)
            .unwrap_or(false)
    }
}

/// Where the extension header walk ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExtensionChain {
    protocol: u8,
    consumed: usize,
    fragment: Option<Ipv6Fragment>,
}

/// Step over extension headers starting at `data`.
///
/// Stops at the first non-extension header, or where a header would run
/// past the end of the captured bytes; the last known next-header value is
/// reported either way.
fn walk_extension_headers(first_nh: u8, data: &[u8]) -> ExtensionChain {
    let mut offset = 0;
    let mut current_nh = first_nh;
    let mut fragment = None;

    while is_extension_header(current_nh) {
        let rest = &data[offset..];
        let parsed = match current_nh {
            next_header::FRAGMENT => parse_fragment_header(rest).map(|(nh, frag)| {
                fragment = Some(frag);
                (nh, 8)
            }),
            next_header::AH => parse_ah_header(rest),
            _ => parse_generic_ext_header(rest),
        };

        match parsed {
            Some((next_nh, consumed)) => {
                current_nh = next_nh;
                offset += consumed;
            }
            None => break,
        }
    }

    ExtensionChain {
        protocol: current_nh,
        consumed: offset,
        fragment,
    }
}

/// Hop-by-Hop, Routing, Destination, Mobility: length in 8-octet units, excluding the first 8.
fn parse_generic_ext_header(data: &[u8]) -> Option<(u8, usize)> {
    let (&next, rest) = data.split_first()?;
    let len = (usize::from(*rest.first()?) + 1) * 8;
    (data.len() >= len).then_some((next, len))
}

/// Authentication Header: length in 4-octet units, minus 2.
fn parse_ah_header(data: &[u8]) -> Option<(u8, usize)> {
    let (&next, rest) = data.split_first()?;
    let len = (usize::from(*rest.first()?) + 2) * 4;
    (data.len() >= len).then_some((next, len))
}

/// Fragment header: fixed 8 bytes.
fn parse_fragment_header(data: &[u8]) -> Option<(u8, Ipv6Fragment)> {
    let header = data.get(..8)?;
    let offset_flags = u16::from_be_bytes([header[2], header[3]]);
    let fragment = Ipv6Fragment {
        offset: offset_flags >> 3,
        more_fragments: offset_flags & 0x0001 != 0,
        identification: u32::from_be_bytes([header[4], header[5], header[6], header[7]]),
    };
    Some((header[0], fragment))
}
