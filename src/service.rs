//! Lookup service coordinating catalog loading and version resolution
//!
//! Groups the loader and resolver that together answer one lookup, so the
//! HTTP boundary and the CLI share a single entry point.

use tracing::info;

use crate::catalog::error::CatalogError;
use crate::catalog::loader::CatalogLoader;
use crate::config::CatalogsConfig;
use crate::resolve::resolver::VersionResolver;
use crate::resolve::types::{DownloadBases, ResolutionRequest, ResolutionResult};

#[derive(Clone)]
pub struct LookupService {
    loader: CatalogLoader,
    resolver: VersionResolver,
}

impl LookupService {
    pub fn new(loader: CatalogLoader, resolver: VersionResolver) -> Self {
        Self { loader, resolver }
    }

    /// Create a service that fetches the configured catalogs over HTTP
    pub fn from_config(config: &CatalogsConfig) -> Result<Self, CatalogError> {
        Ok(Self::new(
            CatalogLoader::from_config(config)?,
            VersionResolver::new(DownloadBases::from_config(config)),
        ))
    }

    /// Load both catalogs and resolve the request against them.
    ///
    /// `Ok(None)` means the catalogs loaded but nothing matched.
    pub async fn lookup(
        &self,
        request: &ResolutionRequest,
    ) -> Result<Option<ResolutionResult>, CatalogError> {
        let catalogs = self.loader.load_all().await?;
        let result = self.resolver.resolve(&catalogs, request);

        match &result {
            Some(matched) => info!("Resolved {:?} to {}", request.tag, matched.version()),
            None => info!("No match for {:?}", request.tag),
        }

        Ok(result)
    }
}
