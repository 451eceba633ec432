//! `minion` CLI — encode, decode, and inspect MINION documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to MINION (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | minion encode
//!
//! # Encode from file to file
//! minion encode -i data.json -o data.minion
//!
//! # Decode MINION back to pretty-printed JSON
//! minion decode -i data.minion
//!
//! # Show size comparison against JSON
//! minion stats -i data.json
//!
//! # List the record shapes a JSON document would declare
//! minion shapes -i data.json --json
//! ```
//!
//! Set `RUST_LOG=minion_core=debug` (or pass `--verbose`) to see codec events on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "minion",
    version,
    about = "MINION (shape-deduplicating object notation) CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log codec events to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON to MINION format
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode MINION back to JSON format
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Show encoding statistics (sizes, reduction, shape count)
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the record shapes a JSON document declares when encoded
    Shapes {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the shapes as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Size comparison between the JSON input and its MINION encoding.
#[derive(Serialize)]
struct StatsReport {
    json_bytes: usize,
    minion_bytes: usize,
    reduction_percent: f64,
    shapes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode { input, output } => {
            let json = read_input(input.as_deref())?;
            let text =
                minion_core::encode_json(&json).context("Failed to encode JSON to MINION")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Decode {
            input,
            output,
            compact,
        } => {
            let text = read_input(input.as_deref())?;
            let value = minion_core::decode(&text).context("Failed to decode MINION to JSON")?;
            let json = value
                .to_json()
                .context("Failed to convert decoded value to JSON")?;
            let rendered = if compact {
                serde_json::to_string(&json)?
            } else {
                serde_json::to_string_pretty(&json)?
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Stats { input, json } => {
            let source = read_input(input.as_deref())?;
            let report = stats(&source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("JSON size:    {} bytes", report.json_bytes);
                println!("MINION size:  {} bytes", report.minion_bytes);
                println!("Reduction:    {:.1}%", report.reduction_percent);
                println!("Shapes:       {}", report.shapes);
            }
        }
        Commands::Shapes { input, json } => {
            let source = read_input(input.as_deref())?;
            let value: serde_json::Value =
                serde_json::from_str(&source).context("Failed to parse JSON input")?;
            let (_, shapes) = minion_core::encode_with_shapes(&minion_core::Value::from(value))
                .context("Failed to encode JSON to MINION")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&shapes)?);
            } else {
                for shape in &shapes {
                    println!("{}: {}", shape.name, shape.fields.join(","));
                }
            }
        }
    }

    Ok(())
}

fn stats(source: &str) -> Result<StatsReport> {
    let value: serde_json::Value =
        serde_json::from_str(source).context("Failed to parse JSON input")?;
    // Compare against compact JSON so formatting whitespace does not count.
    let json_bytes = serde_json::to_string(&value)?.len();
    let (text, shapes) = minion_core::encode_with_shapes(&minion_core::Value::from(value))
        .context("Failed to encode JSON to MINION")?;
    let minion_bytes = text.len();
    let reduction_percent = if json_bytes > 0 {
        (1.0 - (minion_bytes as f64 / json_bytes as f64)) * 100.0
    } else {
        0.0
    };
    debug!(json_bytes, minion_bytes, "computed stats");
    Ok(StatsReport {
        json_bytes,
        minion_bytes,
        reduction_percent,
        shapes: shapes.len(),
    })
}

/// Route logs to stderr so stdout carries only command output.
fn init_logging(verbose: bool) {
    let default = if verbose { "minion_core=debug,minion=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
