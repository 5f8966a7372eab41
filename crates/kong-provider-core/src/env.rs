//! Environment snapshots and setting resolution
//!
//! Defaults are resolved against an explicit [`EnvSnapshot`] rather than by
//! reading the process environment ad hoc, which keeps resolution pure.
//!
//! # Example
//!
//! ```rust
//! use kong_provider_core::env::{resolve_setting, EnvSnapshot, SettingValue};
//!
//! let env = EnvSnapshot::from_pairs([("TLS_SKIP_VERIFY", "true")]);
//! assert_eq!(resolve_setting(&env, "TLS_SKIP_VERIFY", "false"), SettingValue::Bool(true));
//! assert_eq!(
//!     resolve_setting(&env, "KONG_ADMIN_ADDR", "http://localhost:8001"),
//!     SettingValue::String("http://localhost:8001".into()),
//! );
//! ```

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// An untyped setting value as produced by resolution or supplied by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    String(String),
    Bool(bool),
}

impl SettingValue {
    /// Parse user input, coercing the literals `true` and `false` to booleans
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => SettingValue::Bool(true),
            "false" => SettingValue::Bool(false),
            other => SettingValue::String(other.to_string()),
        }
    }

    /// Returns true for an empty string value
    pub fn is_empty(&self) -> bool {
        matches!(self, SettingValue::String(s) if s.is_empty())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(s) => write!(f, "{}", s),
            SettingValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::String(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::String(s)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

/// Immutable key-value view of an environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Build a snapshot from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load a snapshot from a `.env` file
    ///
    /// # File Format
    ///
    /// ```text
    /// # Comment
    /// KONG_ADMIN_ADDR=https://kong.internal:8444
    /// KONG_ADMIN_PASSWORD="value with spaces"
    /// ```
    pub fn from_dotenv_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::EnvFile(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self::parse_dotenv(&content))
    }

    /// Parse `.env` formatted content
    pub fn parse_dotenv(content: &str) -> Self {
        let mut vars = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);

            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim().to_string();
                let mut value = line[eq_pos + 1..].trim().to_string();

                if value.len() >= 2
                    && ((value.starts_with('"') && value.ends_with('"'))
                        || (value.starts_with('\'') && value.ends_with('\'')))
                {
                    value = value[1..value.len() - 1].to_string();
                }

                value = value
                    .replace("\\n", "\n")
                    .replace("\\t", "\t")
                    .replace("\\r", "\r");

                vars.insert(key, value);
            }
        }

        Self { vars }
    }

    /// Overlay `other` on top of this snapshot; its values win
    pub fn layered(mut self, other: EnvSnapshot) -> Self {
        self.vars.extend(other.vars);
        self
    }

    /// Look up a variable, returning `None` when it is unset or empty
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Number of variables in the snapshot
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Resolve a setting default from the environment
///
/// A non-empty variable wins, with `"true"`/`"false"` coerced to booleans.
/// Otherwise the literal default is returned as a string, untouched. A
/// variable set to the empty string counts as unset.
pub fn resolve_setting(env: &EnvSnapshot, key: &str, literal_default: &str) -> SettingValue {
    match env.get(key) {
        Some(value) => SettingValue::parse(value),
        None => SettingValue::String(literal_default.to_string()),
    }
}
