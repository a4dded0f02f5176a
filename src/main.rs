//! # gemini-probe - Gemini API access checker
//!
//! Lists the text models visible to a Google Generative Language API key,
//! sends each one a minimal request, and reports which ones are usable,
//! quota-limited, forbidden, rejected, or missing.
//!
//! ## Features
//! - Default mode probes every model and prints a status/latency table
//! - `list` enumerates models without probing
//! - `config` shows and stores the API key
//! - JSON output for scripting

mod cli;
mod core;
mod run;

use clap::Parser;
use dotenv::dotenv;

/// Main application entry point
///
/// Handles:
/// - Environment configuration via dotenv
/// - CLI argument parsing and logger setup
/// - Command dispatch; fatal errors exit with status 1
#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = cli::Args::parse();
    run::init_logger(&args);

    // Print user-friendly message; exit uses Display not Debug
    if let Err(e) = run::run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
