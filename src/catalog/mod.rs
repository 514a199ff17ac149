//! Release catalog loading
//!
//! Fetches the official and unofficial Node.js release indexes and turns
//! their entries into [`types::ReleaseRecord`]s tagged with the catalog they
//! came from.
//!
//! # Modules
//!
//! - [`source`]: `CatalogSource` trait for fetching one release index
//! - [`http`]: reqwest-backed `CatalogSource` for `index.json` URLs
//! - [`loader`]: joins both catalogs for a lookup
//! - [`types`]: wire entries, release records, and the merged catalog pair
//! - [`error`]: error type for catalog fetches

pub mod error;
pub mod http;
pub mod loader;
pub mod source;
pub mod types;

pub use error::CatalogError;
pub use loader::CatalogLoader;
pub use types::{CatalogEntry, CatalogKind, Catalogs, ReleaseRecord};
