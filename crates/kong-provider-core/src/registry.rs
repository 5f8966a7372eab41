//! Resource and data source registry
//!
//! A name → factory table built once at startup and handed to whatever
//! orchestrator drives the provider.

use serde::Serialize;
use std::collections::BTreeMap;

/// Whether an entry manages state or only reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Resource,
    DataSource,
}

/// Description of a registered resource or data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDefinition {
    pub type_name: &'static str,
    pub kind: EntryKind,
    /// Admin API collection, with `{placeholders}` for parent entities
    pub collection_path: &'static str,
    /// Attribute that identifies an entity in the collection
    pub id_attribute: &'static str,
}

/// Constructor stored in the registry
pub type ResourceFactory = fn() -> ResourceDefinition;

macro_rules! definition {
    ($fn_name:ident, $kind:expr, $type_name:literal, $path:literal, $id:literal) => {
        fn $fn_name() -> ResourceDefinition {
            ResourceDefinition {
                type_name: $type_name,
                kind: $kind,
                collection_path: $path,
                id_attribute: $id,
            }
        }
    };
}

definition!(resource_api, EntryKind::Resource, "kong_api", "/apis", "id");
definition!(resource_certificate, EntryKind::Resource, "kong_certificate", "/certificates", "id");
definition!(resource_consumer, EntryKind::Resource, "kong_consumer", "/consumers", "id");
definition!(
    resource_consumer_plugin_config,
    EntryKind::Resource,
    "kong_consumer_plugin_config",
    "/consumers/{consumer_id}/{plugin_name}",
    "id"
);
definition!(resource_plugin, EntryKind::Resource, "kong_plugin", "/plugins", "id");
definition!(resource_sni, EntryKind::Resource, "kong_sni", "/snis", "name");
definition!(resource_upstream, EntryKind::Resource, "kong_upstream", "/upstreams", "id");

definition!(data_source_api, EntryKind::DataSource, "kong_api", "/apis", "id");
definition!(data_source_certificate, EntryKind::DataSource, "kong_certificate", "/certificates", "id");
definition!(data_source_consumer, EntryKind::DataSource, "kong_consumer", "/consumers", "id");
definition!(data_source_plugin, EntryKind::DataSource, "kong_plugin", "/plugins", "id");
definition!(data_source_upstream, EntryKind::DataSource, "kong_upstream", "/upstreams", "id");

/// Registry of resource and data source factories
#[derive(Debug, Clone, Default)]
pub struct Registry {
    resources: BTreeMap<&'static str, ResourceFactory>,
    data_sources: BTreeMap<&'static str, ResourceFactory>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every Kong resource and data source
    pub fn kong() -> Self {
        Self::new()
            .with_resource("kong_api", resource_api)
            .with_resource("kong_certificate", resource_certificate)
            .with_resource("kong_consumer", resource_consumer)
            .with_resource("kong_consumer_plugin_config", resource_consumer_plugin_config)
            .with_resource("kong_plugin", resource_plugin)
            .with_resource("kong_sni", resource_sni)
            .with_resource("kong_upstream", resource_upstream)
            .with_data_source("kong_api", data_source_api)
            .with_data_source("kong_certificate", data_source_certificate)
            .with_data_source("kong_consumer", data_source_consumer)
            .with_data_source("kong_plugin", data_source_plugin)
            .with_data_source("kong_upstream", data_source_upstream)
    }

    /// Register a resource (builder pattern)
    pub fn with_resource(mut self, name: &'static str, factory: ResourceFactory) -> Self {
        self.resources.insert(name, factory);
        self
    }

    /// Register a data source (builder pattern)
    pub fn with_data_source(mut self, name: &'static str, factory: ResourceFactory) -> Self {
        self.data_sources.insert(name, factory);
        self
    }

    /// Look up and construct an entry
    pub fn get(&self, kind: EntryKind, name: &str) -> Option<ResourceDefinition> {
        let table = match kind {
            EntryKind::Resource => &self.resources,
            EntryKind::DataSource => &self.data_sources,
        };
        table.get(name).map(|factory| factory())
    }

    /// Resource names in sorted order
    pub fn resource_names(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    /// Data source names in sorted order
    pub fn data_source_names(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    /// Construct every registered entry, resources first
    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        self.resources
            .values()
            .chain(self.data_sources.values())
            .map(|factory| factory())
            .collect()
    }
}
