//! Network address formatting.

use std::net::IpAddr;

/// Format an IP address in its standard textual form.
///
/// IPv4 uses dotted-decimal; IPv6 uses the RFC 5952 compressed colon-hex form.
///
/// # Example
///
/// ```
/// use std::net::IpAddr;
/// use pcapjson_core::format::format_ip;
///
/// assert_eq!(format_ip(IpAddr::from([10, 0, 0, 1])), "10.0.0.1");
///
/// let v6: IpAddr = "FE80:0:0:0:0:0:0:1".parse().unwrap();
/// assert_eq!(format_ip(v6), "fe80::1");
/// ```
pub fn format_ip(addr: IpAddr) -> String {
    addr.to_string()
}
