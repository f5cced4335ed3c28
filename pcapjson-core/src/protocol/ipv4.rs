//! IPv4 header decoder.

use std::net::Ipv4Addr;

use etherparse::Ipv4HeaderSlice;

use crate::error::ProtocolError;

/// Minimum IPv4 header length (IHL = 5).
pub const MIN_HEADER_LEN: usize = 20;

fn malformed(reason: String) -> ProtocolError {
    ProtocolError::MalformedNetworkHeader {
        protocol: "ipv4",
        reason,
    }
}

/// Decoded IPv4 header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    /// Header length in bytes, options included.
    pub header_len: usize,
    pub total_length: u16,
    pub identification: u16,
    pub dont_fragment: bool,
    pub more_fragments: bool,
    /// Fragment offset in 8-byte units.
    pub fragment_offset: u16,
    pub ttl: u8,
    /// Transport protocol number.
    pub protocol: u8,
}

impl Ipv4Header {
    /// Decode an IPv4 header from the start of `data`.
    ///
    /// The version field must be 4 and the header length must fit in `data`.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let first = *data
            .first()
            .ok_or_else(|| malformed("empty header".to_string()))?;

        let version = first >> 4;
        if version != 4 {
            return Err(malformed(format!("version field is {version}, expected 4")));
        }

        let header_len = usize::from(first & 0x0f) * 4;
        if header_len < MIN_HEADER_LEN {
            return Err(malformed(format!(
                "header length {header_len} below minimum {MIN_HEADER_LEN}"
            )));
        }
        if header_len > data.len() {
            return Err(malformed(format!(
                "header length {header_len} exceeds {} available bytes",
                data.len()
            )));
        }

        let ipv4 = Ipv4HeaderSlice::from_slice(data).map_err(|e| malformed(e.to_string()))?;

        Ok(Self {
            src: Ipv4Addr::from(ipv4.source()),
            dst: Ipv4Addr::from(ipv4.destination()),
            header_len: ipv4.slice().len(),
            total_length: ipv4.total_len(),
            identification: ipv4.identification(),
            dont_fragment: ipv4.dont_fragment(),
            more_fragments: ipv4.more_fragments(),
            fragment_offset: ipv4.fragments_offset().value(),
            ttl: ipv4.ttl(),
            protocol: ipv4.protocol().0,
        })
    }

    /// True for any piece of a fragmented datagram.
    pub fn is_fragment(&self) -> bool {
        self.more_fragments || self.fragment_offset != 0
    }
}
