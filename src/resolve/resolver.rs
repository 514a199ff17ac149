//! Resolution of a version tag against the merged release catalogs

use tracing::debug;

use crate::catalog::types::{Catalogs, ReleaseRecord};
use crate::resolve::platform::PlatformTarget;
use crate::resolve::range::max_satisfying;
use crate::resolve::semver::compare_releases;
use crate::resolve::tag::Tag;
use crate::resolve::types::{DownloadBases, ResolutionRequest, ResolutionResult};

/// Picks the best-matching release for a request.
///
/// Pure: the outcome depends only on the catalogs and the request, so a
/// single resolver can serve concurrent lookups.
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    downloads: DownloadBases,
}

impl VersionResolver {
    pub fn new(downloads: DownloadBases) -> Self {
        Self { downloads }
    }

    /// Resolve a request. `None` means no release matched.
    ///
    /// Steps, in order: merge both catalogs, sort newest first (unofficial
    /// before official on equal versions), apply the LTS, security and
    /// platform/arch filters, then take the highest version satisfying the
    /// tag's range and derive the download URL.
    pub fn resolve(
        &self,
        catalogs: &Catalogs,
        request: &ResolutionRequest,
    ) -> Option<ResolutionResult> {
        if catalogs.is_empty() {
            debug!("Both catalogs are empty");
            return None;
        }

        let mut releases: Vec<&ReleaseRecord> = catalogs.releases().collect();
        releases.sort_by(|a, b| compare_releases(a, b));

        let tag = Tag::parse(&request.tag);
        let match_range = tag.match_range();

        if let Tag::Lts(codename) = &tag {
            releases.retain(|release| matches_lts(release, codename.as_deref()));
            debug!("{} releases left after LTS filter", releases.len());
        }

        if request.security_only {
            releases.retain(|release| release.is_security_release);
            debug!("{} releases left after security filter", releases.len());
        }

        let target = PlatformTarget::from_request(
            request.platform.as_deref(),
            request.arch.as_deref(),
            match_range,
        );

        if let Some(target) = &target {
            let file_id = target.file_id();
            releases.retain(|release| release.has_file(&file_id));
            debug!(
                "{} releases left after file filter {}",
                releases.len(),
                file_id
            );
        }

        let mut versions: Vec<&str> = releases.iter().map(|r| r.version.as_str()).collect();
        versions.dedup();

        let version = max_satisfying(versions, match_range)?;

        // First hit wins: on a version tie the unofficial record sorts first
        let matched = releases.iter().find(|r| r.version == version)?;

        let url = target.as_ref().map(|target| {
            format!(
                "{}/{}/{}",
                self.downloads.for_kind(matched.kind()),
                matched.version,
                target.artifact_name(&matched.version)
            )
        });

        Some(ResolutionResult {
            tag: request.tag.clone(),
            url,
            release: (*matched).clone(),
        })
    }
}

fn matches_lts(release: &ReleaseRecord, codename: Option<&str>) -> bool {
    if !release.is_lts() {
        return false;
    }
    match (&release.lts_codename, codename) {
        (Some(name), Some(wanted)) => name.to_lowercase() == wanted,
        _ => true,
    }
}
