//! Ethernet II link-layer dispatch.
//!
//! Locates the network-layer header inside an Ethernet frame, walking any
//! 802.1Q / 802.1ad VLAN tags on the way.

use etherparse::Ethernet2HeaderSlice;

use crate::error::ProtocolError;

/// Link type constant for Ethernet.
pub const LINKTYPE_ETHERNET: u16 = 1;

/// Ethernet II header length (two MACs plus EtherType).
pub const ETHERNET_HEADER_LEN: usize = 14;

/// One VLAN tag: TCI plus the inner EtherType.
pub const VLAN_TAG_LEN: usize = 4;

/// Well-known EtherType values (IEEE 802).
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
    pub const LLDP: u16 = 0x88CC;
    pub const QINQ: u16 = 0x88A8;
    pub const QINQ_OLD: u16 = 0x9100;
}

fn is_vlan_tag(ether_type: u16) -> bool {
    matches!(
        ether_type,
        ethertype::VLAN | ethertype::QINQ | ethertype::QINQ_OLD
    )
}

/// Which network protocol the link layer says comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkHint {
    Ipv4,
    Ipv6,
    /// Anything else, with its EtherType.
    Other(u16),
}

impl From<u16> for NetworkHint {
    fn from(ether_type: u16) -> Self {
        match ether_type {
            ethertype::IPV4 => NetworkHint::Ipv4,
            ethertype::IPV6 => NetworkHint::Ipv6,
            other => NetworkHint::Other(other),
        }
    }
}

/// Result of link-layer dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkLayer {
    /// Byte offset of the network-layer header within the frame.
    pub network_offset: usize,
    /// Protocol expected at `network_offset`.
    pub hint: NetworkHint,
    /// Number of VLAN tags skipped.
    pub vlan_tags: u8,
}

/// Find the network-layer header in a frame of the given link type.
///
/// Only Ethernet is supported; other link types fail with
/// [`ProtocolError::UnsupportedLinkLayer`]. Frames shorter than the Ethernet
/// header (or a declared VLAN tag) fail with [`ProtocolError::TruncatedFrame`].
pub fn dispatch(link_type: u16, data: &[u8]) -> Result<LinkLayer, ProtocolError> {
    if link_type != LINKTYPE_ETHERNET {
        return Err(ProtocolError::UnsupportedLinkLayer { link_type });
    }

    let eth = Ethernet2HeaderSlice::from_slice(data).map_err(|_| ProtocolError::TruncatedFrame {
        layer: "ethernet",
        needed: ETHERNET_HEADER_LEN,
        have: data.len(),
    })?;

    let mut ether_type = eth.ether_type().0;
    let mut offset = eth.slice().len();
    let mut vlan_tags = 0u8;

    while is_vlan_tag(ether_type) {
        let end = offset + VLAN_TAG_LEN;
        let tag = data.get(offset..end).ok_or(ProtocolError::TruncatedFrame {
            layer: "vlan",
            needed: end,
            have: data.len(),
        })?;
        ether_type = u16::from_be_bytes([tag[2], tag[3]]);
        offset = end;
        vlan_tags = vlan_tags.saturating_add(1);
    }

    Ok(LinkLayer {
        network_offset: offset,
        hint: NetworkHint::from(ether_type),
        vlan_tags,
    })
}
