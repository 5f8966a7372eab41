//! Kong provider CLI entry point
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 3: Invalid settings or arguments
//! - 6: Admin API unreachable or credentials rejected
//! - 10: Internal error

use clap::Parser;
use kong_provider_cli::{run, ProviderCli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = ProviderCli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    let exit_code = run(cli).await;
    std::process::exit(exit_code.into());
}
