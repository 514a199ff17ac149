use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::catalog::types::ReleaseRecord;

/// First `N[.N[.N]]` run in a string, used by [`coerce`]
static COERCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d])(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?(?:$|[^\d])").unwrap()
});

/// Parse a release version such as `v14.13.0` or `14.13.0`.
///
/// Accepts an optional leading `v` or `=` and surrounding whitespace, the way
/// node-semver's loose parser does.
pub fn parse_node_version(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed).trim_start();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Coerce an arbitrary string to a plain version.
///
/// Takes the first run of up to three dot-separated numbers and pads missing
/// parts with zero, so `8.x` becomes `8.0.0` and `lts/16` becomes `16.0.0`.
/// Returns `None` when the string holds no digits (`*`, `lts`).
pub fn coerce(input: &str) -> Option<Version> {
    let caps = COERCE_RE.captures(input)?;
    let part = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Compare two versions by semver precedence, ignoring build metadata
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Ordering used to rank merged catalog records.
///
/// Newest version first. When two records carry the same version the
/// unofficial one comes first. Records whose version does not parse sink to
/// the end.
pub fn compare_releases(a: &ReleaseRecord, b: &ReleaseRecord) -> Ordering {
    let by_version = match (
        parse_node_version(&a.version),
        parse_node_version(&b.version),
    ) {
        (Some(va), Some(vb)) => cmp_precedence(&vb, &va),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_version.then_with(|| b.unofficial.cmp(&a.unofficial))
}
