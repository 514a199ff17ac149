//! Loads and tags both release catalogs

use std::sync::Arc;

use futures::future::try_join;
use tracing::{debug, error};

use crate::catalog::error::CatalogError;
use crate::catalog::http::{HttpCatalogSource, build_client};
use crate::catalog::source::CatalogSource;
use crate::catalog::types::{CatalogKind, Catalogs, ReleaseRecord};
use crate::config::CatalogsConfig;

/// Fetches the official and unofficial catalogs for a lookup.
///
/// Nothing is cached: every call to [`CatalogLoader::load_all`] hits both
/// sources.
#[derive(Clone)]
pub struct CatalogLoader {
    official: Arc<dyn CatalogSource>,
    unofficial: Arc<dyn CatalogSource>,
}

impl CatalogLoader {
    pub fn new(official: Arc<dyn CatalogSource>, unofficial: Arc<dyn CatalogSource>) -> Self {
        Self {
            official,
            unofficial,
        }
    }

    /// Creates a loader that talks to the configured index URLs
    pub fn from_config(config: &CatalogsConfig) -> Result<Self, CatalogError> {
        let client = build_client(config.fetch_timeout_ms)?;
        Ok(Self::new(
            Arc::new(HttpCatalogSource::from_config(
                client.clone(),
                &config.official,
                CatalogKind::Official,
            )),
            Arc::new(HttpCatalogSource::from_config(
                client,
                &config.unofficial,
                CatalogKind::Unofficial,
            )),
        ))
    }

    /// Fetches one catalog and stamps every record with the source's kind
    pub async fn load_catalog(
        source: &dyn CatalogSource,
    ) -> Result<Vec<ReleaseRecord>, CatalogError> {
        let kind = source.kind();
        let entries = source.fetch_entries().await.inspect_err(|e| {
            error!("Failed to load {} catalog: {}", kind.as_str(), e);
        })?;

        Ok(entries
            .into_iter()
            .map(|entry| ReleaseRecord::new(entry, kind))
            .collect())
    }

    /// Fetches both catalogs concurrently. Either failure aborts the load.
    pub async fn load_all(&self) -> Result<Catalogs, CatalogError> {
        let (official, unofficial) = try_join(
            Self::load_catalog(self.official.as_ref()),
            Self::load_catalog(self.unofficial.as_ref()),
        )
        .await?;

        let catalogs = Catalogs::new(official, unofficial);
        debug!(
            "Loaded {} releases ({} official, {} unofficial)",
            catalogs.len(),
            catalogs.official.len(),
            catalogs.unofficial.len()
        );

        Ok(catalogs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::MockCatalogSource;
    use crate::catalog::types::CatalogEntry;

    fn entry(version: &str) -> CatalogEntry {
        CatalogEntry {
            version: version.to_string(),
            ..Default::default()
        }
    }

    fn mock_source(kind: CatalogKind, versions: Vec<&'static str>) -> MockCatalogSource {
        let mut source = MockCatalogSource::new();
        source.expect_kind().return_const(kind);
        source
            .expect_fetch_entries()
            .returning(move || Ok(versions.iter().map(|v| entry(v)).collect()));
        source
    }

    fn failing_source(kind: CatalogKind) -> MockCatalogSource {
        let mut source = MockCatalogSource::new();
        source.expect_kind().return_const(kind);
        source.expect_fetch_entries().times(1).returning(|| {
            Err(CatalogError::UnexpectedStatus {
                url: "http://example.test/index.json".to_string(),
                status: 500,
                body: "boom".to_string(),
            })
        });
        source
    }

    #[tokio::test]
    async fn load_catalog_stamps_unofficial_flag() {
        let source = mock_source(CatalogKind::Unofficial, vec!["v14.13.0", "v12.18.4"]);

        let records = CatalogLoader::load_catalog(&source).await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.unofficial));
    }

    #[tokio::test]
    async fn load_all_returns_both_catalogs() {
        let loader = CatalogLoader::new(
            Arc::new(mock_source(CatalogKind::Official, vec!["v14.13.0"])),
            Arc::new(mock_source(
                CatalogKind::Unofficial,
                vec!["v14.13.0", "v14.12.0"],
            )),
        );

        let catalogs = loader.load_all().await.unwrap();

        assert_eq!(catalogs.official.len(), 1);
        assert!(!catalogs.official[0].unofficial);
        assert_eq!(catalogs.unofficial.len(), 2);
        assert!(catalogs.unofficial.iter().all(|r| r.unofficial));
    }

    #[tokio::test]
    async fn load_all_fails_when_official_catalog_fails() {
        let loader = CatalogLoader::new(
            Arc::new(failing_source(CatalogKind::Official)),
            Arc::new(mock_source(CatalogKind::Unofficial, vec!["v14.13.0"])),
        );

        let result = loader.load_all().await;

        assert!(matches!(
            result,
            Err(CatalogError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn load_all_fails_when_unofficial_catalog_fails() {
        let loader = CatalogLoader::new(
            Arc::new(mock_source(CatalogKind::Official, vec!["v14.13.0"])),
            Arc::new(failing_source(CatalogKind::Unofficial)),
        );

        assert!(loader.load_all().await.is_err());
    }
}
