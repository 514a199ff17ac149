//! Classification of caller-supplied version tags

/// What a version tag asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// `*`, `latest`, or nothing at all
    Wildcard,
    /// Any other semver range expression, lower-cased (`8.x`, `12`, `^14.2`)
    Range(String),
    /// `lts` or `lts/<codename>`; the codename is lower-cased and may be empty
    Lts(Option<String>),
}

impl Tag {
    /// Parse a tag. Matching is case-insensitive and ignores surrounding
    /// whitespace.
    pub fn parse(raw: &str) -> Self {
        let tag = raw.trim().to_lowercase();

        match tag.as_str() {
            "" | "*" | "latest" => Tag::Wildcard,
            "lts" => Tag::Lts(None),
            _ => match tag.strip_prefix("lts/") {
                Some(codename) => Tag::Lts(Some(codename.to_string())),
                None => Tag::Range(tag),
            },
        }
    }

    /// Range expression used for the final version match. LTS filtering has
    /// already narrowed the field, so LTS tags match anything that is left.
    pub fn match_range(&self) -> &str {
        match self {
            Tag::Wildcard | Tag::Lts(_) => "*",
            Tag::Range(expr) => expr,
        }
    }

    pub fn is_lts(&self) -> bool {
        matches!(self, Tag::Lts(_))
    }
}
