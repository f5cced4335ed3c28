//! Output formatting for decoded records.

use std::io::Write;

use clap::ValueEnum;
use pcapjson_core::Record;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON array of records (default)
    Json,
    /// JSON Lines (one JSON object per record)
    Jsonl,
}

/// Writes records in the selected format.
pub struct OutputFormatter {
    format: OutputFormat,
    pretty: bool,
}

impl OutputFormatter {
    /// Create a new formatter. `pretty` only affects the JSON array format.
    pub fn new(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }

    /// Write all records, followed by a trailing newline.
    pub fn write<W: Write>(&self, records: &[Record], writer: &mut W) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(records, writer),
            OutputFormat::Jsonl => self.write_jsonl(records, writer),
        }
    }

    fn write_json<W: Write>(&self, records: &[Record], writer: &mut W) -> std::io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, records)?;
        } else {
            serde_json::to_writer(&mut *writer, records)?;
        }
        writeln!(writer)
    }

    fn write_jsonl<W: Write>(&self, records: &[Record], writer: &mut W) -> std::io::Result<()> {
        for record in records {
            serde_json::to_writer(&mut *writer, record)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}
