//! Provider settings schema
//!
//! Declares the provider-level settings presented to the orchestration
//! engine, each bound to an environment variable and a literal fallback.

use crate::env::{resolve_setting, EnvSnapshot, SettingValue};
use crate::error::{ProviderError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

pub const KONG_ADMIN_URI: &str = "kong_admin_uri";
pub const KONG_ADMIN_USERNAME: &str = "kong_admin_username";
pub const KONG_ADMIN_PASSWORD: &str = "kong_admin_password";
pub const TLS_SKIP_VERIFY: &str = "tls_skip_verify";
pub const KONG_API_KEY: &str = "kong_api_key";

/// Declared type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    String,
    Bool,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::String => "string",
            SettingKind::Bool => "bool",
        }
    }
}

/// Declaration of a single provider setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingSchema {
    pub name: &'static str,
    pub kind: SettingKind,
    pub required: bool,
    pub env_var: &'static str,
    pub default: &'static str,
    pub description: &'static str,
    /// Value must never be logged or printed
    pub sensitive: bool,
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Env,
    Default,
    Override,
}

/// The fixed set of settings the provider recognises
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSchema {
    settings: Vec<SettingSchema>,
}

impl Default for ProviderSchema {
    fn default() -> Self {
        Self::kong()
    }
}

impl ProviderSchema {
    /// Schema for the Kong admin API provider
    pub fn kong() -> Self {
        Self {
            settings: vec![
                SettingSchema {
                    name: KONG_ADMIN_URI,
                    kind: SettingKind::String,
                    required: true,
                    env_var: "KONG_ADMIN_ADDR",
                    default: "http://localhost:8001",
                    description: "The address of the kong admin url e.g. http://localhost:8001",
                    sensitive: false,
                },
                SettingSchema {
                    name: KONG_ADMIN_USERNAME,
                    kind: SettingKind::String,
                    required: false,
                    env_var: "KONG_ADMIN_USERNAME",
                    default: "",
                    description: "A basic auth user for kong admin",
                    sensitive: false,
                },
                SettingSchema {
                    name: KONG_ADMIN_PASSWORD,
                    kind: SettingKind::String,
                    required: false,
                    env_var: "KONG_ADMIN_PASSWORD",
                    default: "",
                    description: "A basic auth password for kong admin",
                    sensitive: true,
                },
                SettingSchema {
                    name: TLS_SKIP_VERIFY,
                    kind: SettingKind::Bool,
                    required: false,
                    env_var: "TLS_SKIP_VERIFY",
                    default: "false",
                    description: "Whether to skip tls verify for https kong api endpoint using self signed or untrusted certs",
                    sensitive: false,
                },
                SettingSchema {
                    name: KONG_API_KEY,
                    kind: SettingKind::String,
                    required: false,
                    env_var: "KONG_API_KEY",
                    default: "",
                    description: "API key for the kong api (if you have locked it down)",
                    sensitive: true,
                },
            ],
        }
    }

    /// All settings in declaration order
    pub fn settings(&self) -> &[SettingSchema] {
        &self.settings
    }

    /// Look up a setting by name
    pub fn get(&self, name: &str) -> Option<&SettingSchema> {
        self.settings.iter().find(|s| s.name == name)
    }

    /// Resolve every setting's default against the environment
    pub fn resolve_defaults(&self, env: &EnvSnapshot) -> RawSettings {
        let mut values = BTreeMap::new();

        for setting in &self.settings {
            let value = resolve_setting(env, setting.env_var, setting.default);
            let source = if env.get(setting.env_var).is_some() {
                ValueSource::Env
            } else {
                ValueSource::Default
            };

            if setting.sensitive {
                tracing::debug!(setting = setting.name, source = ?source, "Resolved setting");
            } else {
                tracing::debug!(setting = setting.name, source = ?source, value = %value, "Resolved setting");
            }

            values.insert(setting.name, (value, source));
        }

        RawSettings {
            schema: self.clone(),
            values,
        }
    }
}

/// Untyped settings after defaults and overrides, before decode
#[derive(Debug, Clone)]
pub struct RawSettings {
    schema: ProviderSchema,
    values: BTreeMap<&'static str, (SettingValue, ValueSource)>,
}

impl RawSettings {
    /// Layer a user-supplied value over the resolved default
    pub fn with_override(mut self, name: &str, value: impl Into<SettingValue>) -> Result<Self> {
        self.set(name, value.into())?;
        Ok(self)
    }

    /// Apply many overrides; user values always win
    pub fn with_overrides<I, K>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, SettingValue)>,
        K: AsRef<str>,
    {
        for (name, value) in overrides {
            self.set(name.as_ref(), value)?;
        }
        Ok(self)
    }

    fn set(&mut self, name: &str, value: SettingValue) -> Result<()> {
        let setting = self
            .schema
            .get(name)
            .ok_or_else(|| ProviderError::UnknownSetting(name.to_string()))?;
        tracing::debug!(setting = setting.name, "Applied user override");
        self.values.insert(setting.name, (value, ValueSource::Override));
        Ok(())
    }

    /// Resolved value for a setting
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name).map(|(v, _)| v)
    }

    /// Where a setting's value came from
    pub fn source(&self, name: &str) -> Option<ValueSource> {
        self.values.get(name).map(|(_, s)| *s)
    }

    pub fn schema(&self) -> &ProviderSchema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_declares_five_unique_settings() {
        let schema = ProviderSchema::kong();
        assert_eq!(schema.settings().len(), 5);

        let mut names: Vec<_> = schema.settings().iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_only_admin_uri_is_required() {
        let schema = ProviderSchema::kong();
        let required: Vec<_> = schema
            .settings()
            .iter()
            .filter(|s| s.required)
            .map(|s| s.name)
            .collect();
        assert_eq!(required, vec![KONG_ADMIN_URI]);
    }

    #[test]
    fn test_env_var_bindings() {
        let schema = ProviderSchema::kong();
        assert_eq!(schema.get(KONG_ADMIN_URI).unwrap().env_var, "KONG_ADMIN_ADDR");
        assert_eq!(schema.get(TLS_SKIP_VERIFY).unwrap().kind, SettingKind::Bool);
        assert!(schema.get(KONG_API_KEY).unwrap().sensitive);
        assert!(schema.get("kong_admin_token").is_none());
    }

    #[test]
    fn test_resolve_defaults_tracks_source() {
        let env = EnvSnapshot::from_pairs([("KONG_ADMIN_USERNAME", "admin")]);
        let raw = ProviderSchema::kong().resolve_defaults(&env);

        assert_eq!(raw.source(KONG_ADMIN_USERNAME), Some(ValueSource::Env));
        assert_eq!(raw.source(KONG_ADMIN_URI), Some(ValueSource::Default));
        assert_eq!(
            raw.get(KONG_ADMIN_URI),
            Some(&SettingValue::String("http://localhost:8001".into()))
        );
    }

    #[test]
    fn test_override_beats_env() {
        let env = EnvSnapshot::from_pairs([("KONG_ADMIN_ADDR", "http://from-env:8001")]);
        let raw = ProviderSchema::kong()
            .resolve_defaults(&env)
            .with_override(KONG_ADMIN_URI, "http://from-user:8001")
            .unwrap();

        assert_eq!(raw.get(KONG_ADMIN_URI), Some(&SettingValue::from("http://from-user:8001")));
        assert_eq!(raw.source(KONG_ADMIN_URI), Some(ValueSource::Override));
    }

    #[test]
    fn test_unknown_override_rejected() {
        let raw = ProviderSchema::kong().resolve_defaults(&EnvSnapshot::new());
        let result = raw.with_override("kong_admin_token", "x");
        assert!(matches!(result, Err(ProviderError::UnknownSetting(name)) if name == "kong_admin_token"));
    }
}
