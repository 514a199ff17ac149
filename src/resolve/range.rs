//! node-semver compatible range matching
//!
//! Supports the range expressions installers pass around:
//! - `*`, `x`, `` (empty) - any version
//! - `8`, `8.x`, `8.11`, `8.11.x` - X-ranges
//! - `8.11.4`, `v8.11.4`, `=8.11.4` - exact match
//! - `^8.11.4`, `~8.11.4`, `~>8.11` - caret and tilde ranges
//! - `>=8`, `>8.11`, `<=10`, `<10.0.0` - comparison operators
//! - `8 - 10.1` - hyphen ranges
//! - `>=8 <10`, `^8 || ^10` - AND / OR composition
//!
//! Prerelease versions only satisfy a comparator set when one of its
//! comparators names the same `major.minor.patch` with a prerelease tag.

use std::cmp::Ordering;

use semver::{Prerelease, Version};

use crate::resolve::semver::{cmp_precedence, parse_node_version};

/// A parsed range: satisfied when any of its comparator sets is satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    sets: Vec<ComparatorSet>,
}

/// Space-separated comparators that must all hold. An empty set matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComparatorSet {
    comparators: Vec<Comparator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Operator prefix in front of a (possibly partial) version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    None,
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Caret,
    Tilde,
}

/// Version with optional trailing components (`8`, `8.11`, `8.x`)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Range {
    /// Parse a range expression. Returns `None` if any part is malformed.
    pub fn parse(spec: &str) -> Option<Self> {
        let sets: Option<Vec<ComparatorSet>> =
            spec.split("||").map(ComparatorSet::parse).collect();
        sets.map(|sets| Range { sets })
    }

    /// Check if a version satisfies this range
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set.satisfies(version))
    }

    /// Highest version in `versions` that satisfies this range.
    ///
    /// Unparseable versions are skipped. The original string is returned so
    /// callers can map it back to their records.
    pub fn max_satisfying<'a, I>(&self, versions: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        versions
            .into_iter()
            .filter_map(|raw| parse_node_version(raw).map(|parsed| (raw, parsed)))
            .filter(|(_, parsed)| self.satisfies(parsed))
            .max_by(|(_, a), (_, b)| cmp_precedence(a, b))
            .map(|(raw, _)| raw)
    }
}

/// Highest version in `versions` satisfying `spec`, or `None` if the spec is
/// invalid or nothing matches
pub fn max_satisfying<'a, I>(versions: I, spec: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    Range::parse(spec)?.max_satisfying(versions)
}

/// Largest accepted version component (2^53 - 1). Keeps the `+ 1` upper
/// bounds built in [`desugar`] from overflowing.
const MAX_COMPONENT: u64 = (1 << 53) - 1;

impl ComparatorSet {
    fn parse(spec: &str) -> Option<Self> {
        let tokens = tokenize(spec)?;

        // Hyphen range: "1.2.3 - 2.3.4"
        if let [from, dash, to] = tokens.as_slice()
            && dash == "-"
        {
            return Self::parse_hyphen(from, to);
        }

        let mut comparators = Vec::new();
        for token in &tokens {
            let (prefix, rest) = split_prefix(token);
            let partial = Partial::parse(rest)?;
            comparators.extend(desugar(prefix, &partial));
        }
        Some(ComparatorSet { comparators })
    }

    fn parse_hyphen(from: &str, to: &str) -> Option<Self> {
        let from = Partial::parse(from)?;
        let to = Partial::parse(to)?;
        let mut comparators = Vec::new();

        if from.major.is_some() {
            comparators.push(Comparator::new(Op::Gte, from.floor()));
        }

        match (to.major, to.minor, to.patch) {
            (None, _, _) => {}
            (Some(major), None, _) => {
                comparators.push(Comparator::new(Op::Lt, Version::new(major + 1, 0, 0)))
            }
            (Some(major), Some(minor), None) => {
                comparators.push(Comparator::new(Op::Lt, Version::new(major, minor + 1, 0)))
            }
            (Some(_), Some(_), Some(_)) => comparators.push(Comparator::new(Op::Lte, to.floor())),
        }

        Some(ComparatorSet { comparators })
    }

    fn satisfies(&self, version: &Version) -> bool {
        if !self.comparators.iter().all(|c| c.matches(version)) {
            return false;
        }

        if version.pre.is_empty() {
            return true;
        }

        self.comparators.iter().any(|c| {
            !c.version.pre.is_empty()
                && c.version.major == version.major
                && c.version.minor == version.minor
                && c.version.patch == version.patch
        })
    }
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, version: &Version) -> bool {
        let ord = cmp_precedence(version, &self.version);
        match self.op {
            Op::Eq => ord == Ordering::Equal,
            Op::Gt => ord == Ordering::Greater,
            Op::Gte => ord != Ordering::Less,
            Op::Lt => ord == Ordering::Less,
            Op::Lte => ord != Ordering::Greater,
        }
    }

    /// Comparator no release can satisfy
    fn nothing() -> Self {
        Self::new(Op::Lt, Version::new(0, 0, 0))
    }
}

impl Partial {
    fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let spec = spec
            .strip_prefix('v')
            .or_else(|| spec.strip_prefix('V'))
            .unwrap_or(spec);

        // Build metadata never affects matching
        let spec = spec.split_once('+').map_or(spec, |(core, _)| core);

        let (core, pre) = match spec.split_once('-') {
            Some((core, pre)) => (core, Prerelease::new(pre).ok()?),
            None => (spec, Prerelease::EMPTY),
        };

        if core.is_empty() {
            return Some(Self::any());
        }

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return None;
        }

        let mut numbers = [None; 3];
        let mut wildcard_seen = false;
        for (slot, part) in numbers.iter_mut().zip(parts) {
            if is_wildcard(part) {
                wildcard_seen = true;
                continue;
            }
            if wildcard_seen {
                // `1.x.3` is treated as `1.x`
                continue;
            }
            *slot = Some(part.parse::<u64>().ok().filter(|n| *n <= MAX_COMPONENT)?);
        }

        let [major, minor, patch] = numbers;
        if !pre.is_empty() && patch.is_none() {
            return None;
        }

        Some(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    fn any() -> Self {
        Self {
            major: None,
            minor: None,
            patch: None,
            pre: Prerelease::EMPTY,
        }
    }

    /// Version with missing components filled by zero
    fn floor(&self) -> Version {
        let mut version = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        version.pre = self.pre.clone();
        version
    }
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}

/// Split on whitespace and glue bare operators onto the version that follows
/// them, so `>= 1.2.3` reads the same as `>=1.2.3`.
fn tokenize(spec: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in spec.split_whitespace() {
        if let Some(op) = pending_op.take() {
            tokens.push(format!("{}{}", op, token));
            continue;
        }
        if matches!(token, ">" | ">=" | "<" | "<=" | "=" | "^" | "~" | "~>") {
            pending_op = Some(token);
            continue;
        }
        tokens.push(token.to_string());
    }

    if pending_op.is_some() {
        return None;
    }
    Some(tokens)
}

fn split_prefix(token: &str) -> (Prefix, &str) {
    const PREFIXES: &[(&str, Prefix)] = &[
        (">=", Prefix::Gte),
        ("<=", Prefix::Lte),
        ("~>", Prefix::Tilde),
        (">", Prefix::Gt),
        ("<", Prefix::Lt),
        ("=", Prefix::Eq),
        ("^", Prefix::Caret),
        ("~", Prefix::Tilde),
    ];

    PREFIXES
        .iter()
        .find_map(|(text, prefix)| {
            token
                .strip_prefix(text)
                .map(|rest| (*prefix, rest.trim_start()))
        })
        .unwrap_or((Prefix::None, token))
}

/// Expand an operator + partial version into primitive comparators
fn desugar(prefix: Prefix, partial: &Partial) -> Vec<Comparator> {
    let Partial {
        major,
        minor,
        patch,
        ..
    } = *partial;

    let Some(major) = major else {
        // `*`, `>=*`, `<=*` match everything; `>*` and `<*` match nothing
        return match prefix {
            Prefix::Gt | Prefix::Lt => vec![Comparator::nothing()],
            _ => vec![],
        };
    };

    match prefix {
        Prefix::None | Prefix::Eq => match (minor, patch) {
            (None, _) => vec![
                Comparator::new(Op::Gte, Version::new(major, 0, 0)),
                Comparator::new(Op::Lt, Version::new(major + 1, 0, 0)),
            ],
            (Some(minor), None) => vec![
                Comparator::new(Op::Gte, Version::new(major, minor, 0)),
                Comparator::new(Op::Lt, Version::new(major, minor + 1, 0)),
            ],
            (Some(_), Some(_)) => vec![Comparator::new(Op::Eq, partial.floor())],
        },
        Prefix::Gt => match (minor, patch) {
            (None, _) => vec![Comparator::new(Op::Gte, Version::new(major + 1, 0, 0))],
            (Some(minor), None) => vec![Comparator::new(Op::Gte, Version::new(major, minor + 1, 0))],
            (Some(_), Some(_)) => vec![Comparator::new(Op::Gt, partial.floor())],
        },
        Prefix::Gte => vec![Comparator::new(Op::Gte, partial.floor())],
        Prefix::Lt => vec![Comparator::new(Op::Lt, partial.floor())],
        Prefix::Lte => match (minor, patch) {
            (None, _) => vec![Comparator::new(Op::Lt, Version::new(major + 1, 0, 0))],
            (Some(minor), None) => vec![Comparator::new(Op::Lt, Version::new(major, minor + 1, 0))],
            (Some(_), Some(_)) => vec![Comparator::new(Op::Lte, partial.floor())],
        },
        Prefix::Tilde => {
            let upper = match minor {
                None => Version::new(major + 1, 0, 0),
                Some(minor) => Version::new(major, minor + 1, 0),
            };
            vec![
                Comparator::new(Op::Gte, partial.floor()),
                Comparator::new(Op::Lt, upper),
            ]
        }
        Prefix::Caret => {
            // ^1.2.3 -> <2.0.0, ^0.2.3 -> <0.3.0, ^0.0.3 -> <0.0.4
            // ^0.0 -> <0.1.0, ^0 -> <1.0.0
            let upper = match (major, minor, patch) {
                (0, Some(0), Some(patch)) => Version::new(0, 0, patch + 1),
                (0, Some(minor), _) => Version::new(0, minor + 1, 0),
                (major, _, _) => Version::new(major + 1, 0, 0),
            };
            vec![
                Comparator::new(Op::Gte, partial.floor()),
                Comparator::new(Op::Lt, upper),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(s: &str) -> Version {
        parse_node_version(s).unwrap()
    }

    fn satisfies(spec: &str, version: &str) -> bool {
        Range::parse(spec).unwrap().satisfies(&v(version))
    }

    // X-ranges and partial versions
    #[rstest]
    #[case("*", "1.0.0", true)]
    #[case("", "0.0.1", true)]
    #[case("x", "22.1.0", true)]
    #[case("8", "8.17.0", true)]
    #[case("8", "9.0.0", false)]
    #[case("8.x", "8.0.0", true)]
    #[case("8.x", "7.10.1", false)]
    #[case("8.X", "8.5.0", true)]
    #[case("8.11", "8.11.4", true)]
    #[case("8.11", "8.12.0", false)]
    #[case("8.11.x", "8.11.0", true)]
    #[case("8.11.x", "8.12.0", false)]
    #[case("v8.x", "8.1.0", true)]
    fn x_ranges(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    // Exact versions
    #[rstest]
    #[case("8.11.4", "8.11.4", true)]
    #[case("v8.11.4", "8.11.4", true)]
    #[case("=8.11.4", "8.11.4", true)]
    #[case("8.11.4", "8.11.5", false)]
    fn exact_versions(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    // Caret and tilde
    #[rstest]
    #[case("^1.2.3", "1.9.9", true)]
    #[case("^1.2.3", "1.2.2", false)]
    #[case("^1.2.3", "2.0.0", false)]
    #[case("^0.2.3", "0.2.9", true)]
    #[case("^0.2.3", "0.3.0", false)]
    #[case("^0.0.3", "0.0.3", true)]
    #[case("^0.0.3", "0.0.4", false)]
    #[case("^0.0", "0.0.9", true)]
    #[case("^0.0", "0.1.0", false)]
    #[case("^0", "0.9.0", true)]
    #[case("^0", "1.0.0", false)]
    #[case("^1.2", "1.9.0", true)]
    #[case("~1.2.3", "1.2.9", true)]
    #[case("~1.2.3", "1.3.0", false)]
    #[case("~1.2", "1.2.0", true)]
    #[case("~1", "1.9.0", true)]
    #[case("~1", "2.0.0", false)]
    #[case("~>1.2", "1.2.5", true)]
    fn caret_and_tilde(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    // Comparison operators, including partial versions
    #[rstest]
    #[case(">=8", "8.0.0", true)]
    #[case(">=8", "7.9.9", false)]
    #[case(">8", "8.9.9", false)]
    #[case(">8", "9.0.0", true)]
    #[case(">8.1", "8.1.9", false)]
    #[case(">8.1", "8.2.0", true)]
    #[case(">8.1.0", "8.1.1", true)]
    #[case("<10", "9.9.9", true)]
    #[case("<10", "10.0.0", false)]
    #[case("<=10", "10.9.0", true)]
    #[case("<=10", "11.0.0", false)]
    #[case("<=10.1", "10.1.9", true)]
    #[case("<=10.1.0", "10.1.1", false)]
    #[case(">= 8.1.0", "8.1.0", true)]
    fn comparison_operators(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    // AND, OR and hyphen composition
    #[rstest]
    #[case(">=8 <10", "9.5.0", true)]
    #[case(">=8 <10", "10.0.0", false)]
    #[case("^8 || ^12", "12.18.4", true)]
    #[case("^8 || ^12", "10.22.1", false)]
    #[case("8 - 10", "10.22.1", true)]
    #[case("8 - 10", "11.0.0", false)]
    #[case("8.1 - 10.1", "10.1.9", true)]
    #[case("8.1 - 10.1", "8.0.9", false)]
    #[case("8.1.0 - 10.1.0", "10.1.0", true)]
    #[case("8.1.0 - 10.1.0", "10.1.1", false)]
    fn composite_ranges(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    #[case("*", "16.0.0-rc.1", false)]
    #[case("16.x", "16.0.0-rc.1", false)]
    #[case(">=16.0.0-rc.0", "16.0.0-rc.1", true)]
    #[case(">=16.0.0-rc.0", "16.1.0-rc.1", false)]
    #[case("16.0.0-rc.1", "16.0.0-rc.1", true)]
    fn prereleases_need_matching_comparator(
        #[case] spec: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    #[case("lts")]
    #[case("lts/")]
    #[case("latest-8")]
    #[case("1.2.3.4")]
    #[case(">=")]
    #[case("^1 ||| 2")]
    #[case("18446744073709551615")]
    #[case("18446744073709551615.x")]
    #[case("^18446744073709551615")]
    #[case("1.18446744073709551615")]
    #[case("<=1.9007199254740992")]
    #[case("1 - 18446744073709551615")]
    fn parse_rejects_malformed_ranges(#[case] spec: &str) {
        assert_eq!(Range::parse(spec), None);
    }

    #[rstest]
    #[case("*", Some("v11.1.0"))]
    #[case("8.x", Some("v8.12.0"))]
    #[case("8.11.x", Some("v8.11.4"))]
    #[case("10", Some("v10.13.0"))]
    #[case("9", None)]
    #[case("lts", None)]
    fn max_satisfying_returns_highest_match(
        #[case] spec: &str,
        #[case] expected: Option<&str>,
    ) {
        let versions = ["v8.11.4", "v11.1.0", "v8.12.0", "v10.13.0"];
        assert_eq!(max_satisfying(versions, spec), expected);
    }

    #[test]
    fn parse_accepts_largest_safe_component() {
        let range = Range::parse("^9007199254740991").unwrap();
        assert!(range.satisfies(&Version::new(9007199254740991, 1, 0)));
        assert!(!range.satisfies(&Version::new(14, 13, 0)));
    }

    #[test]
    fn max_satisfying_skips_unparseable_versions() {
        let versions = ["nightly", "v1.0.0"];
        assert_eq!(max_satisfying(versions, "*"), Some("v1.0.0"));
    }
}
