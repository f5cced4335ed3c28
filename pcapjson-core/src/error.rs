//! Error types for pcapjson-core.
//!
//! Errors are split by how far they reach:
//!
//! - [`PcapError`] - the capture container itself is unusable. Always fatal.
//! - [`ProtocolError`] - one frame could not be decoded. The
//!   [`MalformedFramePolicy`](crate::policy::MalformedFramePolicy) decides
//!   whether that skips the frame or ends the pass.
//! - [`enum@Error`] - wraps both, plus I/O failures.
//!
//! All errors implement `std::error::Error` and can be converted to `anyhow::Error`.

use thiserror::Error;

/// Main error type for pcapjson-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or parsing the capture container
    #[error("PCAP error: {0}")]
    Pcap(#[from] PcapError),

    /// A per-frame decode failure escalated by strict mode
    #[error("frame {frame}: {source}")]
    Frame {
        frame: u64,
        #[source]
        source: ProtocolError,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error came from the container rather than a single frame.
    pub fn is_container_error(&self) -> bool {
        matches!(self, Error::Pcap(_) | Error::Io(_))
    }
}

/// Errors related to reading the capture container.
#[derive(Error, Debug)]
pub enum PcapError {
    /// File not found or not readable
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Invalid PCAP format
    #[error("Invalid PCAP format: {reason}")]
    InvalidFormat { reason: String },

    /// File ends inside a record whose length was already declared
    #[error("Truncated capture: file ends inside record {frame}")]
    TruncatedRecord { frame: u64 },
}

/// Errors raised while decoding a single frame.
///
/// Every variant is a recoverable, per-frame condition. Anything else is
/// reported through [`enum@Error`] and aborts the pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Link type other than Ethernet
    #[error("unsupported link layer type {link_type}")]
    UnsupportedLinkLayer { link_type: u16 },

    /// Frame too short for its link-layer header
    #[error("{layer}: frame too short (need {needed} bytes, have {have})")]
    TruncatedFrame {
        layer: &'static str,
        needed: usize,
        have: usize,
    },

    /// Link layer carries something other than IPv4/IPv6
    #[error("non-IP payload (ethertype {ethertype:#06x})")]
    NonIpPayload { ethertype: u16 },

    /// IPv4/IPv6 header failed validation
    #[error("{protocol}: malformed header: {reason}")]
    MalformedNetworkHeader {
        protocol: &'static str,
        reason: String,
    },

    /// Capture timestamp cannot be represented as a calendar date
    #[error("timestamp out of range ({secs}s since epoch)")]
    InvalidTimestamp { secs: i64 },
}

impl ProtocolError {
    /// Short, stable name for the error kind, used in logs and statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolError::UnsupportedLinkLayer { .. } => "unsupported_link_layer",
            ProtocolError::TruncatedFrame { .. } => "truncated_frame",
            ProtocolError::NonIpPayload { .. } => "non_ip_payload",
            ProtocolError::MalformedNetworkHeader { .. } => "malformed_network_header",
            ProtocolError::InvalidTimestamp { .. } => "invalid_timestamp",
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
