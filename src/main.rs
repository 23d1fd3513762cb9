//! Damian.AI relay (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                     RELAY                            │
//!  POST           │  ┌────────┐   ┌──────────┐   ┌──────────┐            │
//!  /api/damianai ─┼─▶│  http  │──▶│  relay   │──▶│ upstream │────────────┼──▶ Gemini
//!                 │  │ server │   │ handler  │   │  client  │            │    generateContent
//!  text/plain  ◀──┼──│        │◀──│          │◀──│          │◀───────────┼───
//!                 │  └────────┘   └──────────┘   └──────────┘            │
//!                 │                                                      │
//!                 │  config · observability · lifecycle                  │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use damian_relay::config::load_config;
use damian_relay::lifecycle::startup;
use damian_relay::observability::logging;

#[derive(Parser)]
#[command(name = "damian-relay")]
#[command(about = "Relay that forwards prompts to Gemini without exposing the API key", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("damian-relay v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await
}
