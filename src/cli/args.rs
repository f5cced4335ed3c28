//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

use pcapjson_core::PolicyMode;

use super::OutputFormat;

/// Decode a pcap/pcapng capture into JSON packet records.
#[derive(Parser, Debug)]
#[command(name = "pcapjson")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Capture file to decode (pcap or pcapng, optionally gzip-compressed)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print the JSON array (ignored for jsonl)
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Fail on the first malformed frame instead of skipping it
    #[arg(long = "strict")]
    pub strict: bool,

    /// Print skipped-frame statistics to stderr
    #[arg(long = "stats")]
    pub stats: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Malformed-frame handling selected on the command line.
    pub fn policy_mode(&self) -> PolicyMode {
        if self.strict {
            PolicyMode::Strict
        } else {
            PolicyMode::Skip
        }
    }

    /// Default log filter for the verbosity count.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
