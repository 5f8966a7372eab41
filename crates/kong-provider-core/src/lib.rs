//! Kong Provider Core
//!
//! Provider-level configuration for managing Kong gateway resources (APIs,
//! consumers, plugins, certificates, SNIs, upstreams) through the admin API.
//!
//! ## Architecture
//!
//! 1. **Environment** (`env`): explicit environment snapshots and the
//!    resolve-setting rule (non-empty variable wins, `true`/`false` coerced,
//!    literal default otherwise).
//!
//! 2. **Schema** (`schema`): the five provider settings with their
//!    environment bindings and defaults.
//!
//! 3. **Config** (`config`): single decode step into a typed
//!    [`ProviderConfig`].
//!
//! 4. **Client** (`client`): the [`KongClient`] handle shared by every
//!    resource operation. Building it performs no I/O.
//!
//! 5. **Registry** (`registry`): resource and data source factories by name.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kong_provider_core::{EnvSnapshot, KongProvider, SettingValue};
//!
//! let provider = KongProvider::new();
//! let env = EnvSnapshot::from_process();
//! let handle = provider
//!     .configure_from(&env, Vec::<(&str, SettingValue)>::new())
//!     .unwrap();
//! println!("{}", handle.url("/status"));
//! ```

pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod provider;
pub mod registry;
pub mod schema;

pub use client::{AdminStatus, ClientConfig, KongClient, KongClientBuilder};
pub use config::{ProviderConfig, RedactedConfig};
pub use env::{resolve_setting, EnvSnapshot, SettingValue};
pub use error::{ProviderError, Result};
pub use provider::{configure, ClientHandle, KongProvider};
pub use registry::{EntryKind, Registry, ResourceDefinition, ResourceFactory};
pub use schema::{ProviderSchema, RawSettings, SettingKind, SettingSchema, ValueSource};

/// Crate version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
