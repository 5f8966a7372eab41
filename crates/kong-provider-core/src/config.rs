//! Typed provider configuration
//!
//! [`ProviderConfig::decode`] is the single place where untyped settings are
//! validated and converted.

use crate::env::SettingValue;
use crate::error::{ProviderError, Result};
use crate::schema::{
    RawSettings, SettingKind, SettingSchema, ValueSource, KONG_ADMIN_PASSWORD, KONG_ADMIN_URI,
    KONG_ADMIN_USERNAME, KONG_API_KEY, TLS_SKIP_VERIFY,
};
use serde::Serialize;
use std::fmt;

const REDACTED: &str = "<redacted>";

/// Resolved provider settings
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kong_admin_uri: String,
    pub kong_admin_username: String,
    pub kong_admin_password: String,
    pub tls_skip_verify: bool,
    pub kong_api_key: String,
}

impl ProviderConfig {
    /// Validate and convert resolved settings
    pub fn decode(raw: &RawSettings) -> Result<Self> {
        Ok(Self {
            kong_admin_uri: decode_string(raw, KONG_ADMIN_URI)?,
            kong_admin_username: decode_string(raw, KONG_ADMIN_USERNAME)?,
            kong_admin_password: decode_string(raw, KONG_ADMIN_PASSWORD)?,
            tls_skip_verify: decode_bool(raw, TLS_SKIP_VERIFY)?,
            kong_api_key: decode_string(raw, KONG_API_KEY)?,
        })
    }

    /// View with sensitive values masked, suitable for printing
    pub fn redacted(&self) -> RedactedConfig<'_> {
        RedactedConfig {
            kong_admin_uri: &self.kong_admin_uri,
            kong_admin_username: &self.kong_admin_username,
            kong_admin_password: mask(&self.kong_admin_password),
            tls_skip_verify: self.tls_skip_verify,
            kong_api_key: mask(&self.kong_api_key),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.redacted();
        f.debug_struct("ProviderConfig")
            .field("kong_admin_uri", &r.kong_admin_uri)
            .field("kong_admin_username", &r.kong_admin_username)
            .field("kong_admin_password", &r.kong_admin_password)
            .field("tls_skip_verify", &r.tls_skip_verify)
            .field("kong_api_key", &r.kong_api_key)
            .finish()
    }
}

/// Printable configuration with secrets masked
#[derive(Debug, Clone, Serialize)]
pub struct RedactedConfig<'a> {
    pub kong_admin_uri: &'a str,
    pub kong_admin_username: &'a str,
    pub kong_admin_password: &'static str,
    pub tls_skip_verify: bool,
    pub kong_api_key: &'static str,
}

// Empty stays empty so "not configured" remains visible.
fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        REDACTED
    }
}

fn lookup<'a>(raw: &'a RawSettings, name: &str) -> Result<(&'a SettingSchema, Option<&'a SettingValue>)> {
    let setting = raw
        .schema()
        .get(name)
        .ok_or_else(|| ProviderError::UnknownSetting(name.to_string()))?;
    let value = raw.get(name);

    if setting.required && value.map_or(true, SettingValue::is_empty) {
        return Err(ProviderError::MissingRequired {
            name: setting.name.to_string(),
            env_var: setting.env_var.to_string(),
        });
    }

    Ok((setting, value))
}

fn mismatch(raw: &RawSettings, setting: &SettingSchema, value: &SettingValue) -> ProviderError {
    let origin = match raw.source(setting.name) {
        Some(ValueSource::Env) => setting.env_var,
        Some(ValueSource::Override) => "explicit value",
        Some(ValueSource::Default) | None => "default",
    };
    ProviderError::TypeMismatch {
        name: setting.name.to_string(),
        origin: origin.to_string(),
        expected: setting.kind.as_str(),
        value: value.to_string(),
    }
}

fn decode_string(raw: &RawSettings, name: &str) -> Result<String> {
    let (setting, value) = lookup(raw, name)?;
    debug_assert_eq!(setting.kind, SettingKind::String);

    match value {
        Some(SettingValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(mismatch(raw, setting, other)),
        None => Ok(setting.default.to_string()),
    }
}

fn decode_bool(raw: &RawSettings, name: &str) -> Result<bool> {
    let (setting, value) = lookup(raw, name)?;
    debug_assert_eq!(setting.kind, SettingKind::Bool);

    let value = match value {
        Some(v) => v.clone(),
        None => SettingValue::from(setting.default),
    };

    // The literal default arrives uncoerced, so accept the two exact strings here.
    match &value {
        SettingValue::Bool(b) => Ok(*b),
        SettingValue::String(s) if s == "true" => Ok(true),
        SettingValue::String(s) if s == "false" => Ok(false),
        other => Err(mismatch(raw, setting, other)),
    }
}
