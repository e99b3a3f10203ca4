//! Causeway CLI: inspect serialized error records and chains from the terminal.
//!
//! # Commands
//! ```
//! causeway decode   --file <path|->  [--json]
//! causeway chain    --file <path|->  [--json]
//! causeway respond  --file <path|->  [--stack]
//! causeway taxonomy
//! ```

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use causeway_adapter::{init_tracing, ErrorHandler, HandlerOptions, LogConfig, NoopLogger};
use causeway_core::{taxonomy, ErrorCodec, ErrorValue};
use causeway_json::JsonErrorCodec;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "causeway",
    about = "Inspect classified error records and cause chains",
    version
)]
struct Cli {
    /// Log codec decisions (truncation, unrecognised tags) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild an error from one JSON record (nested causes included)
    Decode {
        /// Path to the record file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        file: String,
        /// Print the normalized record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild an error from a JSON array of records, head first
    Chain {
        /// Path to the array file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        file: String,
        /// Print the normalized record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the response body a service would send for one record
    Respond {
        /// Path to the record file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        file: String,
        /// Include the clean stack in the body
        #[arg(long)]
        stack: bool,
    },

    /// List the error taxonomy and its default classifications
    Taxonomy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    init_tracing(&log_config).context("failed to initialise logging")?;

    let codec = JsonErrorCodec::new();
    match cli.command {
        Commands::Decode { file, json } => {
            let text = read_input(&file)?;
            let error = codec
                .decode_json(&text)
                .with_context(|| format!("cannot decode record from {file}"))?;
            print_error(&codec, &error, json)
        }

        Commands::Chain { file, json } => {
            let text = read_input(&file)?;
            let error = codec
                .decode_chain_json(&text)
                .with_context(|| format!("cannot reconstruct chain from {file}"))?;
            print_error(&codec, &error, json)
        }

        Commands::Respond { file, stack } => {
            let text = read_input(&file)?;
            let error = codec
                .decode_json(&text)
                .with_context(|| format!("cannot decode record from {file}"))?;
            cmd_respond(&error, stack)
        }

        Commands::Taxonomy => cmd_taxonomy(),
    }
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read {file}"))
    }
}

fn print_error(codec: &JsonErrorCodec, error: &ErrorValue, json: bool) -> Result<()> {
    if json {
        let record = codec.serialize(error);
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let chain = error.error_chain();
    println!("Chain ({} error{})", chain.len(), if chain.len() == 1 { "" } else { "s" });
    for (depth, node) in chain.iter().enumerate() {
        let kind = node.subtype().map_or("generic", |t| t.name());
        println!(
            "  [{depth}] {} ({kind}) {} {}{}",
            node.name(),
            node.status_code(),
            node.code(),
            if node.is_operational() { "" } else { " [non-operational]" }
        );
        if !node.message().is_empty() {
            println!("      message: {}", node.message());
        }
        for (key, value) in node.details().iter() {
            println!("      {key} = {value}");
        }
    }
    println!();
    println!("Stack:");
    for line in error.clean_stack().lines() {
        println!("  {line}");
    }
    Ok(())
}

fn cmd_respond(error: &ErrorValue, include_stack: bool) -> Result<()> {
    let handler = ErrorHandler::new(HandlerOptions {
        include_stack_trace: include_stack,
        log_errors: false,
    })
    .with_logger(Arc::new(NoopLogger));
    let handled = handler.handle(error, None);
    println!("HTTP {}", handled.status_code);
    println!("{}", serde_json::to_string_pretty(&handled.body)?);
    Ok(())
}

fn cmd_taxonomy() -> Result<()> {
    println!("{:<22} {:>6}  {:<24} OPERATIONAL", "SUBTYPE", "STATUS", "CODE");
    for entry in taxonomy::entries() {
        println!(
            "{:<22} {:>6}  {:<24} {}",
            entry.name,
            entry.defaults.status_code,
            entry.defaults.code,
            entry.defaults.is_operational
        );
    }
    Ok(())
}
