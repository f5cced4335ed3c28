//! Text rendering of decoded values.
//!
//! - [`format_ip`] - canonical address text (dotted-decimal / RFC 5952)
//! - [`format_timestamp`] - ISO-8601 UTC capture time

mod address;
mod timestamp;

pub use address::format_ip;
pub use timestamp::format_timestamp;
