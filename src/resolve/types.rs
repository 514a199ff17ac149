use serde::Serialize;

use crate::catalog::types::{CatalogKind, ReleaseRecord};
use crate::config::{CatalogsConfig, DEFAULT_OFFICIAL_DOWNLOAD_BASE, DEFAULT_UNOFFICIAL_DOWNLOAD_BASE};

/// Parameters of a single lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Tag exactly as the caller supplied it
    pub tag: String,
    pub security_only: bool,
    pub platform: Option<String>,
    pub arch: Option<String>,
}

impl ResolutionRequest {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn security_only(mut self, security_only: bool) -> Self {
        self.security_only = security_only;
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }
}

/// Outcome of a successful lookup: the echoed tag, an optional download
/// URL and every field of the matched release
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolutionResult {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub release: ReleaseRecord,
}

impl ResolutionResult {
    pub fn version(&self) -> &str {
        &self.release.version
    }
}

/// Where release artifacts are downloaded from, per catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadBases {
    pub official: String,
    pub unofficial: String,
}

impl DownloadBases {
    pub fn from_config(config: &CatalogsConfig) -> Self {
        Self {
            official: config.official.download_base.clone(),
            unofficial: config.unofficial.download_base.clone(),
        }
    }

    pub fn for_kind(&self, kind: CatalogKind) -> &str {
        match kind {
            CatalogKind::Official => &self.official,
            CatalogKind::Unofficial => &self.unofficial,
        }
    }
}

impl Default for DownloadBases {
    fn default() -> Self {
        Self {
            official: DEFAULT_OFFICIAL_DOWNLOAD_BASE.to_string(),
            unofficial: DEFAULT_UNOFFICIAL_DOWNLOAD_BASE.to_string(),
        }
    }
}
