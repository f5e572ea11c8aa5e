//! Akaibu CLI (akaibu)
//!
//! Command-line tool for inspecting and producing Akaibu archives.
//!
//! ## Quick Start
//!
//! ```bash
//! # Header and record statistics
//! akaibu info events.akaibu
//!
//! # Print the first ten records as hex
//! akaibu dump events.akaibu --limit 10 --format hex
//!
//! # Turn every line of a log file into a record
//! akaibu pack events.akaibu --compression snappy app.log
//!
//! # Write one sample archive per compression variant
//! akaibu samples ./fixtures --records 25
//! ```
//!
//! ## Logging
//!
//! Diagnostics go to stderr. `RUST_LOG` selects the filter (default: info);
//! `--verbose` raises it to debug.

use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod format;

use format::OutputFormat;

#[derive(Parser)]
#[command(name = "akaibu")]
#[command(about = "Akaibu archival log tool", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header and record statistics of an archive
    Info {
        /// Archive path
        file: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the records of an archive
    Dump {
        /// Archive path
        file: String,
        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<u64>,
        /// Record output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Write every input line as one record of a new archive
    Pack {
        /// Output archive path
        output: String,
        /// Compression: none, zlib or snappy
        #[arg(short, long, default_value = "none")]
        compression: akaibu_core::Compression,
        /// zlib compression level (0-9)
        #[arg(short, long)]
        level: Option<u32>,
        /// Input files (stdin when omitted)
        inputs: Vec<String>,
    },
    /// Write one sample archive per compression variant
    Samples {
        /// Output directory
        dir: String,
        /// Records per archive; record i holds i * 100 bytes
        #[arg(short, long, default_value = "10")]
        records: u64,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Info { file, json } => commands::info::handle_info(&file, json, &mut out)?,
        Commands::Dump {
            file,
            limit,
            format,
        } => {
            commands::dump::handle_dump(&file, limit, format, &mut out)?;
        }
        Commands::Pack {
            output,
            compression,
            level,
            inputs,
        } => {
            let stats = commands::pack::handle_pack(&output, compression, level, &inputs)?;
            writeln!(
                out,
                "Wrote {} records ({} payload bytes) to {}",
                stats.records, stats.bytes, output
            )?;
        }
        Commands::Samples { dir, records } => {
            for path in commands::samples::handle_samples(&dir, records)? {
                writeln!(out, "{}", path.display())?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
