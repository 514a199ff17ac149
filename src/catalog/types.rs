//! Release records as published in the distribution indexes

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which distribution channel a catalog belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    /// nodejs.org/dist
    Official,
    /// unofficial-builds.nodejs.org
    Unofficial,
}

impl CatalogKind {
    /// Returns the string representation of the catalog kind
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Official => "official",
            CatalogKind::Unofficial => "unofficial",
        }
    }

    pub fn is_unofficial(&self) -> bool {
        matches!(self, CatalogKind::Unofficial)
    }
}

/// One entry of `index.json` exactly as the catalog serves it
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct CatalogEntry {
    pub version: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub npm: Option<String>,
    #[serde(default)]
    pub v8: Option<String>,
    #[serde(default)]
    pub uv: Option<String>,
    #[serde(default)]
    pub zlib: Option<String>,
    #[serde(default)]
    pub openssl: Option<String>,
    #[serde(default)]
    pub modules: Option<String>,
    /// `false` on the wire for non-LTS releases, the codename otherwise
    #[serde(default, deserialize_with = "deserialize_lts")]
    pub lts: Option<String>,
    #[serde(default)]
    pub security: bool,
}

/// A release record tagged with the catalog it came from.
///
/// Built once by the catalog loader and never mutated afterwards. Serializes
/// back to the catalog's wire shape plus the `unofficial` flag.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReleaseRecord {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "files")]
    pub available_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v8: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zlib: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openssl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<String>,
    #[serde(rename = "lts", serialize_with = "serialize_lts")]
    pub lts_codename: Option<String>,
    #[serde(rename = "security")]
    pub is_security_release: bool,
    pub unofficial: bool,
}

impl ReleaseRecord {
    pub fn new(entry: CatalogEntry, kind: CatalogKind) -> Self {
        Self {
            version: entry.version,
            date: entry.date,
            available_files: entry.files,
            npm: entry.npm,
            v8: entry.v8,
            uv: entry.uv,
            zlib: entry.zlib,
            openssl: entry.openssl,
            modules: entry.modules,
            lts_codename: entry.lts,
            is_security_release: entry.security,
            unofficial: kind.is_unofficial(),
        }
    }

    pub fn kind(&self) -> CatalogKind {
        if self.unofficial {
            CatalogKind::Unofficial
        } else {
            CatalogKind::Official
        }
    }

    pub fn is_lts(&self) -> bool {
        self.lts_codename.is_some()
    }

    pub fn has_file(&self, file_id: &str) -> bool {
        self.available_files.iter().any(|f| f == file_id)
    }
}

/// The two catalogs loaded for a single lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogs {
    pub official: Vec<ReleaseRecord>,
    pub unofficial: Vec<ReleaseRecord>,
}

impl Catalogs {
    pub fn new(official: Vec<ReleaseRecord>, unofficial: Vec<ReleaseRecord>) -> Self {
        Self {
            official,
            unofficial,
        }
    }

    /// All records, official first
    pub fn releases(&self) -> impl Iterator<Item = &ReleaseRecord> {
        self.official.iter().chain(self.unofficial.iter())
    }

    pub fn len(&self) -> usize {
        self.official.len() + self.unofficial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LtsField {
    Flag(bool),
    Codename(String),
}

fn deserialize_lts<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<LtsField>::deserialize(deserializer)?;
    Ok(match field {
        Some(LtsField::Codename(name)) => Some(name),
        Some(LtsField::Flag(_)) | None => None,
    })
}

fn serialize_lts<S>(codename: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match codename {
        Some(name) => serializer.serialize_str(name),
        None => serializer.serialize_bool(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"version": "v10.13.0", "lts": "Dubnium"}), Some("Dubnium"))]
    #[case(json!({"version": "v11.1.0", "lts": false}), None)]
    #[case(json!({"version": "v11.1.0", "lts": null}), None)]
    #[case(json!({"version": "v11.1.0"}), None)]
    fn catalog_entry_parses_lts_field(
        #[case] raw: serde_json::Value,
        #[case] expected: Option<&str>,
    ) {
        let entry: CatalogEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.lts.as_deref(), expected);
    }

    #[test]
    fn catalog_entry_parses_full_index_entry() {
        let entry: CatalogEntry = serde_json::from_value(json!({
            "version": "v14.13.0",
            "date": "2020-09-29",
            "files": ["linux-x64", "osx-x64-tar", "win-x64-zip"],
            "npm": "6.14.8",
            "v8": "8.4.371.19",
            "uv": "1.40.0",
            "zlib": "1.2.11",
            "openssl": "1.1.1g",
            "modules": "83",
            "lts": false,
            "security": false
        }))
        .unwrap();

        assert_eq!(entry.version, "v14.13.0");
        assert_eq!(entry.date.as_deref(), Some("2020-09-29"));
        assert_eq!(entry.files.len(), 3);
        assert_eq!(entry.modules.as_deref(), Some("83"));
        assert!(!entry.security);
    }

    #[test]
    fn release_record_is_stamped_with_catalog_kind() {
        let entry = CatalogEntry {
            version: "v12.18.4".to_string(),
            ..Default::default()
        };

        assert!(!ReleaseRecord::new(entry.clone(), CatalogKind::Official).unofficial);
        assert!(ReleaseRecord::new(entry, CatalogKind::Unofficial).unofficial);
    }

    #[test]
    fn release_record_serializes_to_wire_shape() {
        let entry = CatalogEntry {
            version: "v8.17.0".to_string(),
            files: vec!["linux-x64".to_string()],
            lts: Some("Carbon".to_string()),
            security: true,
            ..Default::default()
        };
        let record = ReleaseRecord::new(entry, CatalogKind::Official);

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "version": "v8.17.0",
                "files": ["linux-x64"],
                "lts": "Carbon",
                "security": true,
                "unofficial": false
            })
        );
    }

    #[test]
    fn release_record_serializes_non_lts_as_false() {
        let entry = CatalogEntry {
            version: "v11.1.0".to_string(),
            ..Default::default()
        };
        let value =
            serde_json::to_value(ReleaseRecord::new(entry, CatalogKind::Unofficial)).unwrap();

        assert_eq!(value["lts"], json!(false));
        assert_eq!(value["unofficial"], json!(true));
    }

    #[test]
    fn catalogs_releases_yields_official_before_unofficial() {
        let official = ReleaseRecord::new(
            CatalogEntry {
                version: "v1.0.0".to_string(),
                ..Default::default()
            },
            CatalogKind::Official,
        );
        let unofficial = ReleaseRecord::new(
            CatalogEntry {
                version: "v2.0.0".to_string(),
                ..Default::default()
            },
            CatalogKind::Unofficial,
        );
        let catalogs = Catalogs::new(vec![official], vec![unofficial]);

        let versions: Vec<&str> = catalogs.releases().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["v1.0.0", "v2.0.0"]);
        assert_eq!(catalogs.len(), 2);
    }
}
