//! CLI module for the Kong provider
//!
//! Command dispatch, exit codes and error mapping.

pub mod commands;
pub mod output;

pub use commands::{ProviderCli, ProviderCommands, SettingsArgs};
pub use output::{OutputFormat, Render};

use kong_provider_core::{
    EnvSnapshot, KongClient, KongProvider, ProviderConfig, ProviderError, RawSettings,
};
use output::{CheckOutput, RegistryOutput, ResolvedOutput, SchemaOutput};
use thiserror::Error;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// Invalid settings or arguments
    InvalidInput = 3,
    /// Admin API unreachable or credentials rejected
    ConnectionError = 6,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Errors surfaced by the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Provider(e) if e.is_user_error() => ExitCode::InvalidInput,
            CliError::Provider(e) if e.is_remote_error() => ExitCode::ConnectionError,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialization(format!("YAML error: {}", err))
    }
}

/// Build the environment snapshot the settings resolve against
pub fn load_env(args: &SettingsArgs) -> Result<EnvSnapshot, CliError> {
    let base = if args.ignore_env {
        EnvSnapshot::new()
    } else {
        EnvSnapshot::from_process()
    };

    let env = match &args.env_file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading env file");
            base.layered(EnvSnapshot::from_dotenv_file(path)?)
        }
        None => base,
    };

    Ok(env)
}

fn resolve(provider: &KongProvider, args: &SettingsArgs) -> Result<(RawSettings, ProviderConfig), CliError> {
    let env = load_env(args)?;
    let raw = provider.resolve(&env, args.overrides.iter().cloned())?;
    let config = ProviderConfig::decode(&raw)?;
    Ok((raw, config))
}

/// Run a command, returning the text to print and the exit code
pub async fn execute(cli: ProviderCli) -> Result<(String, ExitCode), CliError> {
    let provider = KongProvider::new();

    match cli.command {
        ProviderCommands::Schema { format } => {
            let text = SchemaOutput::from_schema(provider.schema()).render(format)?;
            Ok((text, ExitCode::Success))
        }

        ProviderCommands::Resolve { settings, format } => {
            let (raw, config) = resolve(&provider, &settings)?;
            let text = ResolvedOutput::from_config(&raw, &config)?.render(format)?;
            Ok((text, ExitCode::Success))
        }

        ProviderCommands::Registry { format } => {
            let text = RegistryOutput::from_registry(provider.registry()).render(format)?;
            Ok((text, ExitCode::Success))
        }

        ProviderCommands::Check {
            settings,
            timeout,
            format,
        } => {
            let (_, config) = resolve(&provider, &settings)?;
            let client = KongClient::builder((&config).into())
                .timeout_ms(timeout)
                .build()?;

            let (output, code) = match client.verify_connectivity().await {
                Ok(status) => (
                    CheckOutput {
                        host: config.kong_admin_uri.clone(),
                        reachable: true,
                        status: Some(status),
                        error: None,
                    },
                    ExitCode::Success,
                ),
                Err(e) if e.is_remote_error() => {
                    tracing::warn!(error = %e, "Admin API check failed");
                    (
                        CheckOutput {
                            host: config.kong_admin_uri.clone(),
                            reachable: false,
                            status: None,
                            error: Some(e.to_string()),
                        },
                        ExitCode::ConnectionError,
                    )
                }
                Err(e) => return Err(e.into()),
            };

            Ok((output.render(format)?, code))
        }
    }
}

/// Run the CLI, printing output and returning the exit code
pub async fn run(cli: ProviderCli) -> ExitCode {
    match execute(cli).await {
        Ok((text, code)) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            code
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::InvalidInput), 3);
        assert_eq!(i32::from(ExitCode::ConnectionError), 6);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }

    #[test]
    fn test_error_exit_codes() {
        let err = CliError::from(ProviderError::UnknownSetting("x".into()));
        assert_eq!(err.exit_code(), ExitCode::InvalidInput);

        let err = CliError::from(ProviderError::Authentication { status: 403 });
        assert_eq!(err.exit_code(), ExitCode::ConnectionError);

        let err = CliError::from(ProviderError::ClientBuild("tls".into()));
        assert_eq!(err.exit_code(), ExitCode::InternalError);
    }

    #[test]
    fn test_load_env_ignores_process_env() {
        let args = SettingsArgs {
            ignore_env: true,
            ..Default::default()
        };
        assert!(load_env(&args).unwrap().is_empty());
    }
}
