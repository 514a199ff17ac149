//! Catalog source trait for fetching release indexes

#[cfg(test)]
use mockall::automock;

use crate::catalog::error::CatalogError;
use crate::catalog::types::{CatalogEntry, CatalogKind};

/// Trait for fetching the raw entries of one release catalog
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns which distribution channel this source serves
    fn kind(&self) -> CatalogKind;

    /// Fetches every entry of the catalog
    ///
    /// # Returns
    /// * `Ok(Vec<CatalogEntry>)` - Entries in the order the catalog lists them
    /// * `Err(CatalogError)` - If the fetch fails or the body cannot be decoded
    async fn fetch_entries(&self) -> Result<Vec<CatalogEntry>, CatalogError>;
}
