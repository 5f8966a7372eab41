//! CLI command definitions
//!
//! Clap-based commands for printing the provider schema, resolving the
//! effective configuration, listing registered resources and checking
//! connectivity to the Kong admin API.

use clap::{Args, Parser, Subcommand};
use kong_provider_core::SettingValue;
use std::path::PathBuf;

use super::output::OutputFormat;

/// Kong provider configuration tool
#[derive(Parser, Debug)]
#[command(name = "kong-provider")]
#[command(about = "Inspect and check Kong provider configuration", long_about = None)]
#[command(version)]
pub struct ProviderCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: ProviderCommands,
}

/// Where settings come from
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Load variables from a .env file, layered over the process environment
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Do not read the process environment
    #[arg(long)]
    pub ignore_env: bool,

    /// Set a provider setting explicitly (repeatable), e.g. --set tls_skip_verify=true
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_setting)]
    pub overrides: Vec<(String, SettingValue)>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum ProviderCommands {
    /// Print the provider settings schema
    Schema {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Resolve the effective provider configuration
    ///
    /// Secrets are masked in the output.
    Resolve {
        #[command(flatten)]
        settings: SettingsArgs,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List registered resources and data sources
    Registry {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Resolve the configuration and contact the admin API
    Check {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Request timeout in milliseconds
        #[arg(long, default_value = "10000")]
        timeout: u64,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Parse a `NAME=VALUE` override
///
/// The value is kept as a string; bool settings convert it at decode.
pub fn parse_setting(raw: &str) -> Result<(String, SettingValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing setting name in '{}'", raw));
    }

    Ok((name.to_string(), SettingValue::from(value)))
}
