//! Fuzz target for link/network frame decoding.
//!
//! Exercises Ethernet and VLAN dispatch, IPv4 header validation and the
//! IPv6 extension header walk on arbitrary bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pcapjson_core::protocol::{decode_frame, Ipv4Header, Ipv6Header, LINKTYPE_ETHERNET};

fuzz_target!(|data: &[u8]| {
    if let Ok(headers) = decode_frame(LINKTYPE_ETHERNET, data) {
        // Decoded headers must describe bytes that were present
        assert!(headers.link.network_offset <= data.len());
        let _ = headers.transport().to_string();
    }

    // Unsupported link type must be rejected, never decoded
    assert!(decode_frame(101, data).is_err());

    // Network decoders directly, without a link header
    let _ = Ipv4Header::decode(data);
    let _ = Ipv6Header::decode(data);
});
