//! pcapjson - Decode packet captures into flat JSON records.
//!
//! The decoding engine lives in [`pcapjson_core`]; this crate adds the
//! command-line surface and output formatting.
//!
//! # Example
//!
//! ```no_run
//! use pcapjson::cli::{OutputFormat, OutputFormatter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let records = pcapjson::parse_capture("capture.pcap")?;
//!     OutputFormatter::new(OutputFormat::Json, true).write(&records, &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod cli;

pub use pcapjson_core::{parse_capture, Error, Record, Records, Result};
