//! Platform and architecture handling for download lookups

use semver::Version;
use tracing::debug;

use crate::resolve::semver::coerce;

/// First major release with native Apple-silicon builds
const APPLE_SILICON_NATIVE_MAJOR: u64 = 16;

/// Map a caller-supplied platform to the name used in catalog file lists
pub fn normalize_platform(platform: &str) -> String {
    let platform = platform.trim().to_lowercase();
    match platform.as_str() {
        "darwin" => "osx".to_string(),
        _ => platform,
    }
}

/// Map a caller-supplied architecture to the name used in catalog file lists
pub fn normalize_arch(arch: &str) -> String {
    let arch = arch.trim().to_lowercase();
    match arch.as_str() {
        "x86_64" => "x64".to_string(),
        _ => arch,
    }
}

/// Platform/arch pair a lookup is restricted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTarget {
    /// Platform as the caller spelled it, lower-cased. Used in download URLs.
    pub requested_platform: String,
    /// Catalog platform name (`darwin` becomes `osx`)
    pub platform: String,
    /// Effective architecture after normalisation and fallback
    pub arch: String,
}

impl PlatformTarget {
    /// Build a target from request parameters.
    ///
    /// Returns `None` unless both platform and arch are non-empty. For
    /// `osx`/`arm64` lookups whose range coerces to a version below 16.0.0
    /// the arch falls back to `x64`, since no native builds exist there and
    /// x64 builds run under emulation. A range that does not coerce leaves
    /// the arch untouched.
    pub fn from_request(
        platform: Option<&str>,
        arch: Option<&str>,
        match_range: &str,
    ) -> Option<Self> {
        let requested_platform = platform?.trim().to_lowercase();
        let normalized_platform = normalize_platform(&requested_platform);
        let mut arch = normalize_arch(arch?);

        if normalized_platform.is_empty() || arch.is_empty() {
            return None;
        }

        if normalized_platform == "osx"
            && arch == "arm64"
            && coerce(match_range)
                .is_some_and(|v| v < Version::new(APPLE_SILICON_NATIVE_MAJOR, 0, 0))
        {
            debug!(
                "No native arm64 builds for {}, falling back to x64",
                match_range
            );
            arch = "x64".to_string();
        }

        Some(Self {
            requested_platform,
            platform: normalized_platform,
            arch,
        })
    }

    /// File identifier the catalog lists for this target
    /// (`linux-x64`, `osx-arm64-tar`, `win-x86-zip`)
    pub fn file_id(&self) -> String {
        let suffix = match self.platform.as_str() {
            "osx" => "-tar",
            "win" => "-zip",
            _ => "",
        };
        format!("{}-{}{}", self.platform, self.arch, suffix)
    }

    /// Name of the tarball for `version` (`node-v14.13.0-linux-x64.tar.gz`)
    pub fn artifact_name(&self, version: &str) -> String {
        format!(
            "node-{}-{}-{}.tar.gz",
            version, self.requested_platform, self.arch
        )
    }
}
