//! Catalog test utilities

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use resolve_node::catalog::source::CatalogSource;
use resolve_node::catalog::{CatalogEntry, CatalogError, CatalogKind, CatalogLoader};
use resolve_node::resolve::{DownloadBases, VersionResolver};
use resolve_node::server::router;
use resolve_node::service::LookupService;

pub const OFFICIAL_FIXTURE: &str = include_str!("../fixtures/index.json");
pub const UNOFFICIAL_FIXTURE: &str = include_str!("../fixtures/unofficial.json");

/// Catalog source serving a fixed document, or failing with a fixed status
pub struct FixtureSource {
    kind: CatalogKind,
    body: Result<String, u16>,
}

impl FixtureSource {
    pub fn new(kind: CatalogKind, json: &str) -> Self {
        Self {
            kind,
            body: Ok(json.to_string()),
        }
    }

    pub fn failing(kind: CatalogKind, status: u16) -> Self {
        Self {
            kind,
            body: Err(status),
        }
    }
}

#[async_trait]
impl CatalogSource for FixtureSource {
    fn kind(&self) -> CatalogKind {
        self.kind
    }

    async fn fetch_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        match &self.body {
            Ok(json) => serde_json::from_str(json).map_err(|e| CatalogError::InvalidResponse {
                url: "fixture".to_string(),
                reason: e.to_string(),
            }),
            Err(status) => Err(CatalogError::UnexpectedStatus {
                url: "fixture".to_string(),
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

pub fn create_service(official: FixtureSource, unofficial: FixtureSource) -> LookupService {
    let loader = CatalogLoader::new(Arc::new(official), Arc::new(unofficial));
    LookupService::new(loader, VersionResolver::new(DownloadBases::default()))
}

/// Lookup service backed by the bundled fixtures
pub fn create_fixture_service() -> LookupService {
    create_service(
        FixtureSource::new(CatalogKind::Official, OFFICIAL_FIXTURE),
        FixtureSource::new(CatalogKind::Unofficial, UNOFFICIAL_FIXTURE),
    )
}

/// Router backed by the bundled fixtures
pub fn create_fixture_router() -> Router {
    router(create_fixture_service())
}
