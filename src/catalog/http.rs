//! Catalog source backed by an `index.json` document served over HTTP

use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::error::CatalogError;
use crate::catalog::source::CatalogSource;
use crate::catalog::types::{CatalogEntry, CatalogKind};
use crate::config::{CatalogConfig, USER_AGENT};
use crate::resolve::semver::parse_node_version;

/// Builds the HTTP client shared by both catalog sources
pub fn build_client(timeout_ms: u64) -> Result<reqwest::Client, CatalogError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    Ok(client)
}

/// Catalog source implementation for a release index URL
#[derive(Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    index_url: String,
    kind: CatalogKind,
}

impl HttpCatalogSource {
    /// Creates a source for the given index URL
    pub fn new(client: reqwest::Client, index_url: &str, kind: CatalogKind) -> Self {
        Self {
            client,
            index_url: index_url.to_string(),
            kind,
        }
    }

    /// Creates a source from a catalog configuration block
    pub fn from_config(client: reqwest::Client, config: &CatalogConfig, kind: CatalogKind) -> Self {
        Self::new(client, &config.index_url, kind)
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalogSource {
    fn kind(&self) -> CatalogKind {
        self.kind
    }

    async fn fetch_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        debug!("Fetching {} catalog from {}", self.kind.as_str(), self.index_url);

        let response = self.client.get(&self.index_url).send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned status {}", self.index_url, status);
            return Err(CatalogError::UnexpectedStatus {
                url: self.index_url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let entries: Vec<CatalogEntry> = response.json().await.map_err(|e| {
            warn!("Failed to parse catalog {}: {}", self.index_url, e);
            CatalogError::InvalidResponse {
                url: self.index_url.clone(),
                reason: e.to_string(),
            }
        })?;

        if let Some(bad) = entries
            .iter()
            .find(|entry| parse_node_version(&entry.version).is_none())
        {
            return Err(CatalogError::InvalidResponse {
                url: self.index_url.clone(),
                reason: format!("invalid version {:?}", bad.version),
            });
        }

        debug!(
            "Fetched {} entries from {} catalog",
            entries.len(),
            self.kind.as_str()
        );

        Ok(entries)
    }
}
