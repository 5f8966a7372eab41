//! Provider facade
//!
//! Bundles the settings schema and the registry, and turns resolved settings
//! into the shared client handle.

use crate::client::{ClientConfig, KongClient};
use crate::config::ProviderConfig;
use crate::env::{EnvSnapshot, SettingValue};
use crate::error::Result;
use crate::registry::Registry;
use crate::schema::{ProviderSchema, RawSettings};
use std::sync::Arc;

/// Read-only client handle shared by every resource operation in a run
pub type ClientHandle = Arc<KongClient>;

/// The Kong provider: schema, registry and configure step
#[derive(Debug, Clone)]
pub struct KongProvider {
    schema: ProviderSchema,
    registry: Registry,
}

impl Default for KongProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KongProvider {
    pub fn new() -> Self {
        Self {
            schema: ProviderSchema::kong(),
            registry: Registry::kong(),
        }
    }

    pub fn schema(&self) -> &ProviderSchema {
        &self.schema
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve defaults from `env` and layer user-supplied values on top
    pub fn resolve<I, K>(&self, env: &EnvSnapshot, overrides: I) -> Result<RawSettings>
    where
        I: IntoIterator<Item = (K, SettingValue)>,
        K: AsRef<str>,
    {
        self.schema.resolve_defaults(env).with_overrides(overrides)
    }

    /// Build the client handle from resolved settings
    ///
    /// No network I/O happens here.
    pub fn configure(&self, raw: &RawSettings) -> Result<ClientHandle> {
        let config = ProviderConfig::decode(raw)?;
        configure(&config)
    }

    /// Resolve, decode and configure in one step
    pub fn configure_from<I, K>(&self, env: &EnvSnapshot, overrides: I) -> Result<ClientHandle>
    where
        I: IntoIterator<Item = (K, SettingValue)>,
        K: AsRef<str>,
    {
        let raw = self.resolve(env, overrides)?;
        self.configure(&raw)
    }
}

/// Copy the decoded settings into a client configuration and build the handle
pub fn configure(config: &ProviderConfig) -> Result<ClientHandle> {
    let client = KongClient::new(ClientConfig::from(config))?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TLS_SKIP_VERIFY;

    fn no_overrides() -> Vec<(&'static str, SettingValue)> {
        Vec::new()
    }

    #[test]
    fn test_configure_copies_values() {
        let env = EnvSnapshot::from_pairs([
            ("KONG_ADMIN_ADDR", "https://kong.internal:8444"),
            ("KONG_ADMIN_USERNAME", "admin"),
            ("KONG_ADMIN_PASSWORD", "pw"),
            ("KONG_API_KEY", "key"),
        ]);
        let handle = KongProvider::new().configure_from(&env, no_overrides()).unwrap();
        let config = handle.config();

        assert_eq!(config.host_address, "https://kong.internal:8444");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "pw");
        assert!(!config.insecure_skip_verify);
        assert_eq!(config.api_key, "key");
    }

    #[test]
    fn test_configure_is_idempotent() {
        let provider = KongProvider::new();
        let env = EnvSnapshot::from_pairs([("TLS_SKIP_VERIFY", "true")]);
        let raw = provider.resolve(&env, no_overrides()).unwrap();

        let a = provider.configure(&raw).unwrap();
        let b = provider.configure(&raw).unwrap();
        assert_eq!(a.config(), b.config());
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_override_applies_before_decode() {
        let provider = KongProvider::new();
        let handle = provider
            .configure_from(&EnvSnapshot::new(), [(TLS_SKIP_VERIFY, SettingValue::Bool(true))])
            .unwrap();
        assert!(handle.config().insecure_skip_verify);
    }

    #[test]
    fn test_handle_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientHandle>();
    }
}
