//! Transport-layer identification by IP protocol number.
//!
//! Only the protocol number from the network header is used; transport
//! headers and payloads are never parsed.

use std::fmt;

/// IANA protocol numbers with symbolic names.
pub mod ip_protocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
    pub const ICMPV6: u8 = 58;
}

/// Transport protocol carried by an IP packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportProtocol {
    Icmp,
    Tcp,
    Udp,
    Icmpv6,
    /// Any other protocol number.
    Other(u8),
}

impl TransportProtocol {
    /// The IP protocol number.
    pub fn number(&self) -> u8 {
        match self {
            TransportProtocol::Icmp => ip_protocol::ICMP,
            TransportProtocol::Tcp => ip_protocol::TCP,
            TransportProtocol::Udp => ip_protocol::UDP,
            TransportProtocol::Icmpv6 => ip_protocol::ICMPV6,
            TransportProtocol::Other(n) => *n,
        }
    }

    /// Symbolic name, if the protocol has one.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            TransportProtocol::Icmp => Some("ICMP"),
            TransportProtocol::Tcp => Some("TCP"),
            TransportProtocol::Udp => Some("UDP"),
            TransportProtocol::Icmpv6 => Some("ICMPv6"),
            TransportProtocol::Other(_) => None,
        }
    }
}

impl From<u8> for TransportProtocol {
    fn from(number: u8) -> Self {
        match number {
            ip_protocol::ICMP => TransportProtocol::Icmp,
            ip_protocol::TCP => TransportProtocol::Tcp,
            ip_protocol::UDP => TransportProtocol::Udp,
            ip_protocol::ICMPV6 => TransportProtocol::Icmpv6,
            other => TransportProtocol::Other(other),
        }
    }
}

/// Symbolic name for known protocols, decimal number otherwise.
impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.number()),
        }
    }
}
