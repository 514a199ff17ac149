use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Catalog endpoints
// =============================================================================

/// Release index published by the official distribution
pub const DEFAULT_OFFICIAL_INDEX_URL: &str = "https://nodejs.org/dist/index.json";

/// Release index published by the unofficial-builds project
pub const DEFAULT_UNOFFICIAL_INDEX_URL: &str =
    "https://unofficial-builds.nodejs.org/download/release/index.json";

/// Base URL that official release artifacts are served from
pub const DEFAULT_OFFICIAL_DOWNLOAD_BASE: &str = "https://nodejs.org/dist";

/// Base URL that unofficial release artifacts are served from
pub const DEFAULT_UNOFFICIAL_DOWNLOAD_BASE: &str =
    "https://unofficial-builds.nodejs.org/download/release";

// =============================================================================
// Server / transport constants
// =============================================================================

/// Address the HTTP service binds to when nothing else is configured
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Timeout for a single catalog fetch in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// User agent sent with catalog requests
pub const USER_AGENT: &str = concat!("resolve-node/", env!("CARGO_PKG_VERSION"));

/// Service configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub catalogs: CatalogsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Both release catalogs plus the transport timeout used to fetch them
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogsConfig {
    pub official: CatalogConfig,
    pub unofficial: CatalogConfig,
    /// Fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            official: CatalogConfig {
                index_url: DEFAULT_OFFICIAL_INDEX_URL.to_string(),
                download_base: DEFAULT_OFFICIAL_DOWNLOAD_BASE.to_string(),
            },
            unofficial: CatalogConfig {
                index_url: DEFAULT_UNOFFICIAL_INDEX_URL.to_string(),
                download_base: DEFAULT_UNOFFICIAL_DOWNLOAD_BASE.to_string(),
            },
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

/// Location of one catalog and of the artifacts it describes
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    pub index_url: String,
    pub download_base: String,
}

impl ServiceConfig {
    /// Loads configuration from a JSON file. Missing fields fall back to defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}
