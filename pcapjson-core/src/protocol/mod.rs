//! Frame decoding: link, network and transport layers.
//!
//! Decoding runs one frame at a time and keeps no state between frames:
//!
//! ```text
//! link type + bytes -> ethernet::dispatch -> Ipv4Header / Ipv6Header -> TransportProtocol
//! ```
//!
//! Every failure is a [`ProtocolError`] describing why this frame can't
//! produce a record.
//!
//! ## Example
//!
//! ```rust
//! use pcapjson_core::protocol::{decode_frame, LINKTYPE_ETHERNET};
//!
//! let frame: &[u8] = &[
//!     0xff, 0xff, 0xff, 0xff, 0xff, 0xff,  // dst mac
//!     0x00, 0x11, 0x22, 0x33, 0x44, 0x55,  // src mac
//!     0x08, 0x00,                          // ethertype (IPv4)
//!     0x45, 0x00, 0x00, 0x14, 0x00, 0x01, 0x00, 0x00, 0x40, 0x06, 0x00, 0x00,
//!     10, 0, 0, 1,                         // src
//!     10, 0, 0, 2,                         // dst
//! ];
//!
//! let headers = decode_frame(LINKTYPE_ETHERNET, frame).unwrap();
//! assert_eq!(headers.src().to_string(), "10.0.0.1");
//! assert_eq!(headers.transport().to_string(), "TCP");
//! ```

mod ethernet;
mod ipv4;
mod ipv6;
mod transport;

#[cfg(test)]
pub mod test_utils;

use std::net::IpAddr;

pub use ethernet::{
    dispatch, ethertype, LinkLayer, NetworkHint, ETHERNET_HEADER_LEN, LINKTYPE_ETHERNET,
    VLAN_TAG_LEN,
};
pub use ipv4::Ipv4Header;
pub use ipv6::{next_header, Ipv6Fragment, Ipv6Header};
pub use transport::{ip_protocol, TransportProtocol};

use crate::error::ProtocolError;

/// Decoded network-layer header, one variant per IP version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkHeader {
    V4(Ipv4Header),
    V6(Ipv6Header),
}

impl NetworkHeader {
    /// Short protocol name ("ipv4" / "ipv6").
    pub fn name(&self) -> &'static str {
        match self {
            NetworkHeader::V4(_) => "ipv4",
            NetworkHeader::V6(_) => "ipv6",
        }
    }

    pub fn src(&self) -> IpAddr {
        match self {
            NetworkHeader::V4(h) => IpAddr::V4(h.src),
            NetworkHeader::V6(h) => IpAddr::V6(h.src),
        }
    }

    pub fn dst(&self) -> IpAddr {
        match self {
            NetworkHeader::V4(h) => IpAddr::V4(h.dst),
            NetworkHeader::V6(h) => IpAddr::V6(h.dst),
        }
    }

    /// Packet length declared by the header: IPv4 total length, or the
    /// fixed IPv6 header plus its payload length.
    pub fn declared_length(&self) -> usize {
        match self {
            NetworkHeader::V4(h) => usize::from(h.total_length),
            NetworkHeader::V6(h) => ipv6::HEADER_LEN + usize::from(h.payload_length),
        }
    }

    /// Transport protocol number.
    pub fn protocol_number(&self) -> u8 {
        match self {
            NetworkHeader::V4(h) => h.protocol,
            NetworkHeader::V6(h) => h.protocol,
        }
    }

    pub fn is_fragment(&self) -> bool {
        match self {
            NetworkHeader::V4(h) => h.is_fragment(),
            NetworkHeader::V6(h) => h.is_fragment(),
        }
    }
}

/// Everything decoded from one frame. Lives only for that frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedHeaders {
    pub link_type: u16,
    pub link: LinkLayer,
    pub network: NetworkHeader,
}

impl DecodedHeaders {
    pub fn src(&self) -> IpAddr {
        self.network.src()
    }

    pub fn dst(&self) -> IpAddr {
        self.network.dst()
    }

    pub fn transport(&self) -> TransportProtocol {
        TransportProtocol::from(self.network.protocol_number())
    }
}

/// Decode the link and network headers of one frame.
pub fn decode_frame(link_type: u16, data: &[u8]) -> Result<DecodedHeaders, ProtocolError> {
    let link = dispatch(link_type, data)?;
    let payload = &data[link.network_offset..];

    let network = match link.hint {
        NetworkHint::Ipv4 => NetworkHeader::V4(Ipv4Header::decode(payload)?),
        NetworkHint::Ipv6 => NetworkHeader::V6(Ipv6Header::decode(payload)?),
        NetworkHint::Other(ethertype) => return Err(ProtocolError::NonIpPayload { ethertype }),
    };

    Ok(DecodedHeaders {
        link_type,
        link,
        network,
    })
}
