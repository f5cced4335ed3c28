//! pcapjson CLI entry point.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pcapjson::cli::{Args, OutputFormatter};
use pcapjson::{Record, Records};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging; stdout carries only records
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_filter().into()),
        )
        .with_writer(io::stderr)
        .init();

    debug!(file = %args.file.display(), mode = ?args.policy_mode(), "Decoding capture");

    let mut records = Records::open_with_mode(&args.file, args.policy_mode())
        .with_context(|| format!("Failed to open capture: {}", args.file.display()))?;

    // Decode everything before writing so a fatal error leaves no partial output
    let decoded: Vec<Record> = records
        .by_ref()
        .collect::<pcapjson::Result<_>>()
        .with_context(|| format!("Failed to decode capture: {}", args.file.display()))?;

    let formatter = OutputFormatter::new(args.format, args.pretty);
    debug!(
        records = decoded.len(),
        format = ?args.format,
        pretty = args.pretty,
        output = ?args.output,
        "Writing records"
    );

    if let Some(output_path) = &args.output {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
        let mut writer = BufWriter::new(file);
        formatter.write(&decoded, &mut writer)?;
        writer.flush()?;
    } else {
        let mut stdout = io::stdout().lock();
        formatter.write(&decoded, &mut stdout)?;
        stdout.flush()?;
    }

    if args.stats {
        eprintln!("Frames read:        {:>10}", records.frames_read());
        eprintln!("Records written:    {:>10}", decoded.len());
        eprintln!("{}", records.stats().format_summary());
    }

    Ok(())
}
