//! Registry backed by the managed database's auto-generated REST API.
//!
//! Rows live in a table (default `feature_flags`) and are read with
//! PostgREST-style filters:
//!
//! ```text
//! GET {base_url}/rest/v1/feature_flags?select=*&name=eq.{name}
//! apikey: {api_key}
//! Authorization: Bearer {api_key}
//! ```

use crate::error::{RegistryError, RegistryResult};
use crate::flag::{FeatureFlag, FlagRow};
use crate::registry::FlagRegistry;
use async_trait::async_trait;
use std::time::Duration;
use tradegate_log::debug;
use url::Url;

/// Connection settings for [`RestFlagRegistry`].
#[derive(Debug, Clone)]
pub struct RestRegistryConfig {
    /// Project URL, e.g. `https://abc.example.co`
    pub base_url: String,
    /// Key sent as both `apikey` and bearer token
    pub api_key: String,
    /// Table holding the flags
    pub table: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RestRegistryConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: "feature_flags".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reads flags over HTTP.
#[derive(Debug, Clone)]
pub struct RestFlagRegistry {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl RestFlagRegistry {
    pub fn new(config: RestRegistryConfig) -> RegistryResult<Self> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(&format!("rest/v1/{}", config.table))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch(&self, name: Option<&str>) -> RegistryResult<Vec<FeatureFlag>> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("select", "*")]);

        match name {
            Some(name) => request = request.query(&[("name", format!("eq.{}", name))]),
            None => request = request.query(&[("order", "name.asc")]),
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                RegistryError::Unavailable(e.to_string())
            } else {
                RegistryError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RegistryError::Response {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let rows: Vec<FlagRow> =
            serde_json::from_slice(&body).map_err(|e| RegistryError::Decode(e.to_string()))?;

        debug!(target: "tradegate::features", "Registry returned {} row(s)", rows.len());

        rows.into_iter().map(FeatureFlag::try_from).collect()
    }
}

#[async_trait]
impl FlagRegistry for RestFlagRegistry {
    async fn get(&self, name: &str) -> RegistryResult<Option<FeatureFlag>> {
        let flags = self.fetch(Some(name)).await?;
        Ok(flags.into_iter().find(|flag| flag.name == name))
    }

    async fn list(&self) -> RegistryResult<Vec<FeatureFlag>> {
        self.fetch(None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let registry =
            RestFlagRegistry::new(RestRegistryConfig::new("https://db.example.com", "key")).unwrap();
        assert_eq!(
            registry.endpoint().as_str(),
            "https://db.example.com/rest/v1/feature_flags"
        );

        let registry = RestFlagRegistry::new(
            RestRegistryConfig::new("https://db.example.com/proxy", "key").with_table("flags"),
        )
        .unwrap();
        assert_eq!(
            registry.endpoint().as_str(),
            "https://db.example.com/proxy/rest/v1/flags"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = RestFlagRegistry::new(RestRegistryConfig::new("not a url", "key")).unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }
}
