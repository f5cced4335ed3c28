//! Malformed-frame policy.
//!
//! Every per-frame decode failure passes through [`MalformedFramePolicy::admit`],
//! which either drops the frame and counts it, or (in strict mode) turns it
//! into a fatal [`Error::Frame`]. Errors that are not [`ProtocolError`]s
//! never reach the policy; they propagate unchanged.

use crate::error::{Error, ProtocolError};

/// What to do with a frame that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyMode {
    /// Drop the frame and keep going.
    #[default]
    Skip,
    /// Abort the pass on the first malformed frame.
    Strict,
}

/// Counts of skipped frames, by error kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipStats {
    pub unsupported_link_layer: u64,
    pub truncated_frame: u64,
    pub non_ip_payload: u64,
    pub malformed_network_header: u64,
    pub invalid_timestamp: u64,
}

impl SkipStats {
    /// Count one skipped frame.
    pub fn record(&mut self, err: &ProtocolError) {
        let counter = match err {
            ProtocolError::UnsupportedLinkLayer { .. } => &mut self.unsupported_link_layer,
            ProtocolError::TruncatedFrame { .. } => &mut self.truncated_frame,
            ProtocolError::NonIpPayload { .. } => &mut self.non_ip_payload,
            ProtocolError::MalformedNetworkHeader { .. } => &mut self.malformed_network_header,
            ProtocolError::InvalidTimestamp { .. } => &mut self.invalid_timestamp,
        };
        *counter += 1;
    }

    /// Total frames skipped.
    pub fn total(&self) -> u64 {
        self.unsupported_link_layer
            + self.truncated_frame
            + self.non_ip_payload
            + self.malformed_network_header
            + self.invalid_timestamp
    }

    /// Format statistics as a human-readable string.
    pub fn format_summary(&self) -> String {
        format!(
            "Skipped frames:     {:>10}\n\
             \x20 Unsupported link: {:>10}\n\
             \x20 Truncated:        {:>10}\n\
             \x20 Non-IP:           {:>10}\n\
             \x20 Malformed IP:     {:>10}\n\
             \x20 Bad timestamp:    {:>10}",
            self.total(),
            self.unsupported_link_layer,
            self.truncated_frame,
            self.non_ip_payload,
            self.malformed_network_header,
            self.invalid_timestamp,
        )
    }
}

/// Single decision point for per-frame decode failures.
#[derive(Debug, Clone, Default)]
pub struct MalformedFramePolicy {
    mode: PolicyMode,
    stats: SkipStats,
}

impl MalformedFramePolicy {
    pub fn new(mode: PolicyMode) -> Self {
        Self {
            mode,
            stats: SkipStats::default(),
        }
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    pub fn stats(&self) -> &SkipStats {
        &self.stats
    }

    /// Decide the fate of one frame's decode result.
    ///
    /// - `Ok(value)` passes through as `Ok(Some(value))`
    /// - a [`ProtocolError`] in skip mode is counted and becomes `Ok(None)`
    /// - a [`ProtocolError`] in strict mode becomes [`Error::Frame`]
    pub fn admit<T>(
        &mut self,
        frame: u64,
        result: Result<T, ProtocolError>,
    ) -> Result<Option<T>, Error> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(source) => match self.mode {
                PolicyMode::Skip => {
                    tracing::debug!(frame, kind = source.kind(), "Skipping frame: {}", source);
                    self.stats.record(&source);
                    Ok(None)
                }
                PolicyMode::Strict => Err(Error::Frame { frame, source }),
            },
        }
    }
}
