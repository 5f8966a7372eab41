//! Kong admin API client
//!
//! The handle every resource and data source operation receives. Building it
//! performs no network I/O; credentials and reachability are only exercised
//! on the first request or by an explicit [`KongClient::verify_connectivity`].

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Header Kong's key-auth plugin reads the API key from
pub const API_KEY_HEADER: &str = "apikey";

/// Default request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Client settings copied verbatim from the provider configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host_address: String,
    pub username: String,
    pub password: String,
    pub insecure_skip_verify: bool,
    pub api_key: String,
}

impl From<&ProviderConfig> for ClientConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            host_address: config.kong_admin_uri.clone(),
            username: config.kong_admin_username.clone(),
            password: config.kong_admin_password.clone(),
            insecure_skip_verify: config.tls_skip_verify,
            api_key: config.kong_api_key.clone(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host_address", &self.host_address)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "<redacted>" })
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

/// Response of `GET /status`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminStatus {
    #[serde(default)]
    pub database: DatabaseStatus,
    #[serde(default)]
    pub server: ServerStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseStatus {
    #[serde(default)]
    pub reachable: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerStatus {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub connections_active: u64,
    #[serde(default)]
    pub connections_accepted: u64,
    #[serde(default)]
    pub connections_handled: u64,
    #[serde(default)]
    pub connections_reading: u64,
    #[serde(default)]
    pub connections_writing: u64,
    #[serde(default)]
    pub connections_waiting: u64,
}

/// HTTP client for the Kong admin API
#[derive(Clone)]
pub struct KongClient {
    client: Client,
    config: ClientConfig,
    timeout: Duration,
}

impl fmt::Debug for KongClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KongClient")
            .field("config", &self.config)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl KongClient {
    /// Create a client with the default timeout
    pub fn new(config: ClientConfig) -> Result<Self> {
        KongClientBuilder::new(config).build()
    }

    /// Start a builder for custom timeouts
    pub fn builder(config: ClientConfig) -> KongClientBuilder {
        KongClientBuilder::new(config)
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for an admin API path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.host_address.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Prepare a request with credentials attached
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.url(path))
            .timeout(self.timeout);

        if !self.config.username.is_empty() {
            request = request.basic_auth(&self.config.username, Some(&self.config.password));
        }
        if !self.config.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.config.api_key);
        }

        request
    }

    /// Fetch node status
    pub async fn status(&self) -> Result<AdminStatus> {
        let response = self.send(self.request(Method::GET, "/status")).await?;
        let response = check_status(response).await?;
        decode_json(response).await
    }

    /// Eagerly confirm the admin API is reachable and accepts our credentials
    pub async fn verify_connectivity(&self) -> Result<AdminStatus> {
        tracing::debug!(host = %self.config.host_address, "Verifying admin API connectivity");
        let status = self.status().await?;

        if !status.database.reachable {
            tracing::warn!(host = %self.config.host_address, "Kong reports its database as unreachable");
        }

        Ok(status)
    }

    /// Fetch an entity, returning `None` when it does not exist
    pub async fn get_entity<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        let path = entity_path(collection, id);
        let response = self.send(self.request(Method::GET, &path)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response).await?;
        decode_json(response).await.map(Some)
    }

    /// Create an entity in a collection
    pub async fn create_entity<B, T>(&self, collection: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, collection).json(body))
            .await?;
        let response = check_status(response).await?;
        decode_json(response).await
    }

    /// Patch an existing entity
    pub async fn update_entity<B, T>(&self, collection: &str, id: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = entity_path(collection, id);
        let response = self
            .send(self.request(Method::PATCH, &path).json(body))
            .await?;
        let response = check_status(response).await?;
        decode_json(response).await
    }

    /// Delete an entity; deleting something already gone is not an error
    pub async fn delete_entity(&self, collection: &str, id: &str) -> Result<()> {
        let path = entity_path(collection, id);
        let response = self.send(self.request(Method::DELETE, &path)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(path = %path, "Entity already absent");
            return Ok(());
        }

        check_status(response).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Connection(format!("request timed out after {:?}", self.timeout))
            } else {
                ProviderError::Connection(e.to_string())
            }
        })
    }
}

fn entity_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection.trim_end_matches('/'), id)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(ProviderError::Authentication {
            status: status.as_u16(),
        })
    } else {
        let message = match response.text().await {
            Ok(body) if !body.is_empty() => body,
            Ok(_) => status_reason(status),
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read admin API error body");
                status_reason(status)
            }
        };
        Err(ProviderError::AdminApi {
            status: status.as_u16(),
            message,
        })
    }
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Builder for [`KongClient`]
pub struct KongClientBuilder {
    config: ClientConfig,
    timeout_ms: u64,
}

impl KongClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set the request timeout
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout_ms = timeout;
        self
    }

    /// Build the client; no request is sent
    pub fn build(self) -> Result<KongClient> {
        if self.config.insecure_skip_verify {
            tracing::warn!(
                host = %self.config.host_address,
                "TLS certificate verification is disabled for the admin API"
            );
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(self.config.insecure_skip_verify)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;

        let auth = match (self.config.username.is_empty(), self.config.api_key.is_empty()) {
            (true, true) => "none",
            (false, true) => "basic",
            (true, false) => "api-key",
            (false, false) => "basic+api-key",
        };
        tracing::info!(
            host = %self.config.host_address,
            tls_skip_verify = self.config.insecure_skip_verify,
            auth = auth,
            "Configured Kong admin API client"
        );

        Ok(KongClient {
            client,
            config: self.config,
            timeout: Duration::from_millis(self.timeout_ms),
        })
    }
}
