//! Kong Provider CLI
//!
//! Operator tooling around the provider configuration: print the settings
//! schema, resolve the effective configuration from the environment, list
//! registered resources and data sources, and check the admin API.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Show recognised settings and their environment variables
//! kong-provider schema
//!
//! # Resolve the configuration from a .env file plus an explicit override
//! kong-provider resolve --env-file kong.env --set tls_skip_verify=true --format json
//!
//! # Contact the admin API with the resolved credentials
//! kong-provider check --timeout 2000
//! ```

pub mod cli;

pub use cli::{execute, run, CliError, ExitCode, OutputFormat, ProviderCli, ProviderCommands};
