//! Output formatting for the CLI
//!
//! Structured output in JSON and YAML, plus a human-readable table format.

use clap::ValueEnum;
use colored::Colorize;
use kong_provider_core::{
    AdminStatus, EntryKind, ProviderConfig, ProviderSchema, RawSettings, Registry, ValueSource,
};
use serde::Serialize;
use std::fmt::Write;

use super::CliError;

/// Output format options
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Something the CLI can print
pub trait Render: Serialize {
    fn render_table(&self) -> String;

    fn render(&self, format: OutputFormat) -> Result<String, CliError> {
        match format {
            OutputFormat::Table => Ok(self.render_table()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(self)?),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaRow {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    pub env_var: String,
    pub default: String,
    pub description: String,
}

/// Provider settings schema
#[derive(Debug, Clone, Serialize)]
pub struct SchemaOutput {
    pub settings: Vec<SchemaRow>,
}

impl SchemaOutput {
    pub fn from_schema(schema: &ProviderSchema) -> Self {
        let settings = schema
            .settings()
            .iter()
            .map(|s| SchemaRow {
                name: s.name.to_string(),
                kind: s.kind.as_str().to_string(),
                required: s.required,
                env_var: s.env_var.to_string(),
                default: s.default.to_string(),
                description: s.description.to_string(),
            })
            .collect();
        Self { settings }
    }
}

impl Render for SchemaOutput {
    fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<22} {:<7} {:<9} {:<22} {}",
            "NAME".bold(),
            "TYPE".bold(),
            "REQUIRED".bold(),
            "ENV VAR".bold(),
            "DEFAULT".bold()
        );
        for row in &self.settings {
            let default = if row.default.is_empty() {
                "\"\"".to_string()
            } else {
                row.default.clone()
            };
            let _ = writeln!(
                out,
                "{:<22} {:<7} {:<9} {:<22} {}",
                row.name,
                row.kind,
                if row.required { "yes" } else { "no" },
                row.env_var,
                default
            );
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRow {
    pub name: String,
    pub value: serde_json::Value,
    pub source: ValueSource,
}

/// Effective configuration, secrets masked
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedOutput {
    pub settings: Vec<ResolvedRow>,
}

impl ResolvedOutput {
    pub fn from_config(raw: &RawSettings, config: &ProviderConfig) -> Result<Self, CliError> {
        let redacted = serde_json::to_value(config.redacted())?;

        let settings = raw
            .schema()
            .settings()
            .iter()
            .map(|s| ResolvedRow {
                name: s.name.to_string(),
                value: redacted.get(s.name).cloned().unwrap_or(serde_json::Value::Null),
                source: raw.source(s.name).unwrap_or(ValueSource::Default),
            })
            .collect();

        Ok(Self { settings })
    }
}

fn source_label(source: ValueSource) -> colored::ColoredString {
    match source {
        ValueSource::Env => "env".cyan(),
        ValueSource::Default => "default".dimmed(),
        ValueSource::Override => "override".yellow(),
    }
}

impl Render for ResolvedOutput {
    fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<22} {:<10} {}", "NAME".bold(), "SOURCE".bold(), "VALUE".bold());
        for row in &self.settings {
            let value = match &row.value {
                serde_json::Value::String(s) if s.is_empty() => "\"\"".to_string(),
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let _ = writeln!(out, "{:<22} {:<10} {}", row.name, source_label(row.source), value);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryRow {
    pub name: String,
    pub kind: EntryKind,
    pub collection_path: String,
}

/// Registered resources and data sources
#[derive(Debug, Clone, Serialize)]
pub struct RegistryOutput {
    pub entries: Vec<RegistryRow>,
}

impl RegistryOutput {
    pub fn from_registry(registry: &Registry) -> Self {
        let entries = registry
            .definitions()
            .into_iter()
            .map(|d| RegistryRow {
                name: d.type_name.to_string(),
                kind: d.kind,
                collection_path: d.collection_path.to_string(),
            })
            .collect();
        Self { entries }
    }
}

impl Render for RegistryOutput {
    fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<30} {:<12} {}", "NAME".bold(), "KIND".bold(), "PATH".bold());
        for row in &self.entries {
            let kind = match row.kind {
                EntryKind::Resource => "resource",
                EntryKind::DataSource => "data source",
            };
            let _ = writeln!(out, "{:<30} {:<12} {}", row.name, kind, row.collection_path);
        }
        out
    }
}

/// Result of an admin API connectivity check
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    pub host: String,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AdminStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Render for CheckOutput {
    fn render_table(&self) -> String {
        let mut out = String::new();
        if self.reachable {
            let _ = writeln!(out, "{} {}", "✓".green(), self.host);
        } else {
            let _ = writeln!(out, "{} {}", "✗".red(), self.host);
        }
        if let Some(status) = &self.status {
            let db = if status.database.reachable {
                "reachable".green()
            } else {
                "unreachable".red()
            };
            let _ = writeln!(out, "  database:            {}", db);
            let _ = writeln!(out, "  total requests:      {}", status.server.total_requests);
            let _ = writeln!(out, "  active connections:  {}", status.server.connections_active);
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "  {}", error.red());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kong_provider_core::EnvSnapshot;

    #[test]
    fn test_schema_json_output() {
        let output = SchemaOutput::from_schema(&ProviderSchema::kong());
        let json = output.render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["settings"].as_array().unwrap().len(), 5);
        assert_eq!(value["settings"][0]["name"], "kong_admin_uri");
        assert_eq!(value["settings"][0]["type"], "string");
        assert_eq!(value["settings"][3]["type"], "bool");
    }

    #[test]
    fn test_resolved_output_masks_secrets() {
        let env = EnvSnapshot::from_pairs([("KONG_API_KEY", "abc123"), ("TLS_SKIP_VERIFY", "true")]);
        let raw = ProviderSchema::kong().resolve_defaults(&env);
        let config = ProviderConfig::decode(&raw).unwrap();
        let output = ResolvedOutput::from_config(&raw, &config).unwrap();

        let json = output.render(OutputFormat::Json).unwrap();
        assert!(!json.contains("abc123"));

        let skip = output.settings.iter().find(|r| r.name == "tls_skip_verify").unwrap();
        assert_eq!(skip.value, serde_json::Value::Bool(true));
        assert_eq!(skip.source, ValueSource::Env);
    }

    #[test]
    fn test_registry_yaml_output() {
        let output = RegistryOutput::from_registry(&Registry::kong());
        let yaml = output.render(OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("kong_consumer_plugin_config"));
        assert!(yaml.contains("data_source"));
    }

    #[test]
    fn test_check_table_shows_error() {
        colored::control::set_override(false);
        let output = CheckOutput {
            host: "http://localhost:8001".into(),
            reachable: false,
            status: None,
            error: Some("Connection error: refused".into()),
        };
        let table = output.render(OutputFormat::Table).unwrap();
        assert!(table.contains("http://localhost:8001"));
        assert!(table.contains("Connection error: refused"));
    }
}
