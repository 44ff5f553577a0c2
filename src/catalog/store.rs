use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::canon::Canon;
use crate::core::error::ReferenceError;
use crate::core::naming::NamingScheme;
use crate::core::types::BookId;
use crate::matching::parser::ReferenceParser;
use crate::parsing::infofile::{parse_canon_text, parse_names_text, InfofileError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid catalog file '{file}': {source}")]
    InvalidFile {
        file: String,
        #[source]
        source: InfofileError,
    },

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Unknown canon '{0}'")]
    UnknownCanon(String),

    #[error("Unknown naming scheme '{0}'")]
    UnknownNamingScheme(String),

    #[error("Catalog file not found: {0}")]
    MissingFile(String),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Name of the manifest inside a catalog directory
pub const MANIFEST_FILE: &str = "manifest.json";

const EMBEDDED_MANIFEST: &str = include_str!("../../catalogs/manifest.json");

// Data files named by the embedded manifest, compiled in
const EMBEDDED_FILES: &[(&str, &str)] = &[
    ("default.canon", include_str!("../../catalogs/default.canon")),
    ("KingJames.canon", include_str!("../../catalogs/KingJames.canon")),
    ("BHS.canon", include_str!("../../catalogs/BHS.canon")),
    ("LXX.canon", include_str!("../../catalogs/LXX.canon")),
    ("RGG_abbr.names", include_str!("../../catalogs/RGG_abbr.names")),
    ("RGG.names", include_str!("../../catalogs/RGG.names")),
    ("RGG_lang.names", include_str!("../../catalogs/RGG_lang.names")),
    ("Luther84.names", include_str!("../../catalogs/Luther84.names")),
    ("Luther84_abbr.names", include_str!("../../catalogs/Luther84_abbr.names")),
    ("SBL.names", include_str!("../../catalogs/SBL.names")),
    ("SBL_abbr.names", include_str!("../../catalogs/SBL_abbr.names")),
];

/// Catalog directory manifest (`manifest.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub canons: Vec<CanonEntry>,
    pub naming_schemes: Vec<NamingSchemeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonEntry {
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingSchemeEntry {
    pub name: String,
    pub file: String,
    pub ordinal_delimiter: String,
    pub verse_delimiter: String,
    #[serde(default)]
    pub description: String,
}

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub canons: Vec<CanonData>,
    pub naming_schemes: Vec<NamingSchemeData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub books: Vec<BookId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingSchemeData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ordinal_delimiter: String,
    pub verse_delimiter: String,
    pub names: IndexMap<BookId, String>,
}

/// Which schemes and canon a parser is built from.
///
/// The default recognizes German abbreviations (`RGG_abbr`) and orders by the
/// `default` canon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Scheme names in priority order
    pub naming_schemes: Vec<String>,
    pub canon: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            naming_schemes: vec!["RGG_abbr".to_string()],
            canon: "default".to_string(),
        }
    }
}

#[derive(Debug)]
struct Entry<T> {
    item: Arc<T>,
    description: String,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            item: Arc::clone(&self.item),
            description: self.description.clone(),
        }
    }
}

/// Registry of named canons and naming schemes.
///
/// Entries are handed out as shared `Arc`s: asking twice for the same canon
/// yields the same instance, so books from both answers can be compared.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    canons: IndexMap<String, Entry<Canon>>,
    naming_schemes: IndexMap<String, Entry<NamingScheme>>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data is inconsistent; `build.rs`
    /// checks the manifest, the data files are checked here.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        let manifest: Manifest = serde_json::from_str(EMBEDDED_MANIFEST)?;
        Self::from_manifest(&manifest, |file| {
            EMBEDDED_FILES
                .iter()
                .find(|(name, _)| *name == file)
                .map(|(_, content)| (*content).to_string())
                .ok_or_else(|| CatalogError::MissingFile(file.to_string()))
        })
    }

    /// Load a catalog directory (containing `manifest.json`), a manifest file,
    /// or an exported JSON catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingFile` if the path or a file named by the
    /// manifest does not exist, or any loading error.
    pub fn load_from_path(path: &Path) -> Result<Self, CatalogError> {
        if path.is_dir() {
            return Self::load_directory(path);
        }
        if !path.exists() {
            return Err(CatalogError::MissingFile(path.display().to_string()));
        }
        if path.file_name().is_some_and(|name| name == MANIFEST_FILE) {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            return Self::load_directory(dir);
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn load_directory(dir: &Path) -> Result<Self, CatalogError> {
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(CatalogError::MissingFile(manifest_path.display().to_string()));
        }
        let manifest: Manifest = serde_json::from_str(&std::fs::read_to_string(&manifest_path)?)?;

        debug!(path = %dir.display(), "loading catalog directory");
        Self::from_manifest(&manifest, |file| {
            let path = dir.join(file);
            if !path.is_file() {
                return Err(CatalogError::MissingFile(path.display().to_string()));
            }
            Ok(std::fs::read_to_string(path)?)
        })
    }

    fn from_manifest<F>(manifest: &Manifest, read: F) -> Result<Self, CatalogError>
    where
        F: Fn(&str) -> Result<String, CatalogError>,
    {
        check_version(&manifest.version);

        let invalid_file = |file: &str| {
            let file = file.to_string();
            move |source: InfofileError| CatalogError::InvalidFile { file, source }
        };

        let mut catalog = Self::new();
        for entry in &manifest.canons {
            let book_ids =
                parse_canon_text(&read(&entry.file)?).map_err(invalid_file(&entry.file))?;
            let canon = Canon::load(&entry.name, book_ids)?;
            catalog.add_canon(canon, &entry.description);
        }
        for entry in &manifest.naming_schemes {
            let names =
                parse_names_text(&read(&entry.file)?).map_err(invalid_file(&entry.file))?;
            let scheme = NamingScheme::load(
                names,
                &entry.name,
                &entry.ordinal_delimiter,
                &entry.verse_delimiter,
            )?;
            catalog.add_naming_scheme(scheme, &entry.description);
        }

        debug!(
            canons = catalog.canons.len(),
            naming_schemes = catalog.naming_schemes.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for malformed JSON, or
    /// `CatalogError::Reference` if a canon or naming scheme is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        check_version(&data.version);

        let mut catalog = Self::new();
        for canon in data.canons {
            catalog.add_canon(Canon::load(canon.name, canon.books)?, &canon.description);
        }
        for scheme in data.naming_schemes {
            let loaded = NamingScheme::load(
                scheme.names,
                scheme.name,
                scheme.ordinal_delimiter,
                scheme.verse_delimiter,
            )?;
            catalog.add_naming_scheme(loaded, &scheme.description);
        }
        Ok(catalog)
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            canons: self
                .canons
                .values()
                .map(|entry| CanonData {
                    name: entry.item.name().to_string(),
                    description: entry.description.clone(),
                    books: entry.item.book_ids().to_vec(),
                })
                .collect(),
            naming_schemes: self
                .naming_schemes
                .values()
                .map(|entry| NamingSchemeData {
                    name: entry.item.name().to_string(),
                    description: entry.description.clone(),
                    ordinal_delimiter: entry.item.ordinal_delimiter().to_string(),
                    verse_delimiter: entry.item.verse_delimiter().to_string(),
                    names: entry
                        .item
                        .entries()
                        .map(|(id, name)| (id.clone(), name.to_string()))
                        .collect(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Add a canon, replacing any canon of the same name
    pub fn add_canon(&mut self, canon: Canon, description: &str) {
        let name = canon.name().to_string();
        let entry = Entry {
            item: Arc::new(canon),
            description: description.to_string(),
        };
        if self.canons.insert(name.clone(), entry).is_some() {
            warn!(canon = %name, "replaced existing canon");
        }
    }

    /// Add a naming scheme, replacing any scheme of the same name
    pub fn add_naming_scheme(&mut self, scheme: NamingScheme, description: &str) {
        let name = scheme.name().to_string();
        let entry = Entry {
            item: Arc::new(scheme),
            description: description.to_string(),
        };
        if self.naming_schemes.insert(name.clone(), entry).is_some() {
            warn!(naming_scheme = %name, "replaced existing naming scheme");
        }
    }

    /// Get a canon by name
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCanon` if no canon has this name.
    pub fn canon(&self, name: &str) -> Result<&Arc<Canon>, CatalogError> {
        self.canons
            .get(name)
            .map(|entry| &entry.item)
            .ok_or_else(|| CatalogError::UnknownCanon(name.to_string()))
    }

    /// Get a naming scheme by name
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownNamingScheme` if no scheme has this name.
    pub fn naming_scheme(&self, name: &str) -> Result<&Arc<NamingScheme>, CatalogError> {
        self.naming_schemes
            .get(name)
            .map(|entry| &entry.item)
            .ok_or_else(|| CatalogError::UnknownNamingScheme(name.to_string()))
    }

    /// Canon names in load order
    pub fn canon_names(&self) -> impl Iterator<Item = &str> {
        self.canons.keys().map(String::as_str)
    }

    /// Naming scheme names in load order
    pub fn naming_scheme_names(&self) -> impl Iterator<Item = &str> {
        self.naming_schemes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn canon_description(&self, name: &str) -> Option<&str> {
        self.canons.get(name).map(|entry| entry.description.as_str())
    }

    #[must_use]
    pub fn naming_scheme_description(&self, name: &str) -> Option<&str> {
        self.naming_schemes
            .get(name)
            .map(|entry| entry.description.as_str())
    }

    /// Build a parser for the configured schemes and canon.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownNamingScheme` / `CatalogError::UnknownCanon`
    /// for names the catalog does not know, or `CatalogError::Reference` if the
    /// parser cannot be built.
    pub fn parser(&self, config: &ParserConfig) -> Result<ReferenceParser, CatalogError> {
        let schemes = config
            .naming_schemes
            .iter()
            .map(|name| self.naming_scheme(name).map(Arc::clone))
            .collect::<Result<Vec<_>, _>>()?;
        let canon = Arc::clone(self.canon(&config.canon)?);
        Ok(ReferenceParser::new(schemes, canon)?)
    }

    /// Number of canons and naming schemes in catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.canons.len() + self.naming_schemes.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canons.is_empty() && self.naming_schemes.is_empty()
    }
}

// Version check (warn but don't fail)
fn check_version(version: &str) {
    if version != CATALOG_VERSION {
        warn!(
            expected = CATALOG_VERSION,
            found = version,
            "catalog version mismatch"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINI_MANIFEST: &str = r#"{
        "version": "1.0.0",
        "canons": [{"name": "mini", "file": "mini.canon"}],
        "naming_schemes": [{
            "name": "mini_names",
            "file": "mini.names",
            "ordinal_delimiter": "",
            "verse_delimiter": ","
        }]
    }"#;

    fn write_mini_catalog(dir: &Path) {
        std::fs::write(dir.join(MANIFEST_FILE), MINI_MANIFEST).unwrap();
        std::fs::write(dir.join("mini.canon"), "# order\nGn\nEx\n").unwrap();
        std::fs::write(dir.join("mini.names"), "Gn; Gen\nEx; Ex\n").unwrap();
    }

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = Catalog::load_embedded().unwrap();
        assert!(!catalog.is_empty());

        assert_eq!(catalog.canon("default").unwrap().len(), 75);
        assert_eq!(catalog.canon("KingJames").unwrap().len(), 66);
        assert_eq!(catalog.canon("BHS").unwrap().len(), 39);
        assert_eq!(catalog.canon("LXX").unwrap().len(), 48);

        let names: Vec<&str> = catalog.naming_scheme_names().collect();
        assert_eq!(
            names,
            vec!["RGG_abbr", "RGG", "RGG_lang", "Luther84", "Luther84_abbr", "SBL", "SBL_abbr"]
        );
        assert_eq!(catalog.naming_scheme("RGG").unwrap().len(), 75);
        assert_eq!(catalog.naming_scheme("RGG_lang").unwrap().len(), 75);
        assert_eq!(catalog.naming_scheme("Luther84_abbr").unwrap().len(), 73);
    }

    #[test]
    fn test_lxx_order() {
        let catalog = Catalog::load_embedded().unwrap();
        let lxx = catalog.canon("LXX").unwrap();

        // Greek order: Minor Prophets before Isaiah, Job after the Song
        assert!(lxx.position_of("Mal").unwrap() < lxx.position_of("Is").unwrap());
        assert!(lxx.position_of("Cant").unwrap() < lxx.position_of("Job").unwrap());
        assert_eq!(lxx.position_of("Hos").unwrap(), 30);
        assert!(!lxx.contains("Mt"));
    }

    #[test]
    fn test_german_production_schemes() {
        let catalog = Catalog::load_embedded().unwrap();
        let config = ParserConfig {
            naming_schemes: vec![
                "RGG_abbr".to_string(),
                "Luther84".to_string(),
                "Luther84_abbr".to_string(),
            ],
            canon: "default".to_string(),
        };
        let parser = catalog.parser(&config).unwrap();

        let cases = [
            ("Röm 3,22", "Rm"),
            ("1. Mose 1,1", "Gn"),
            ("1Mo 1,1", "Gn"),
            ("Offb 21,4", "Rev"),
            ("Hes 37,1", "Ez"),
        ];
        for (text, id) in cases {
            assert_eq!(parser.parse(text).unwrap().book().id().as_str(), id, "{text}");
        }

        let sbl_abbr = catalog.naming_scheme("SBL_abbr").unwrap();
        let r = parser.parse("1Mo 1,1").unwrap();
        assert_eq!(r.render_using(sbl_abbr).unwrap(), "Gen 1:1");
    }

    #[test]
    fn test_rgg_full_names() {
        let catalog = Catalog::load_embedded().unwrap();
        let config = ParserConfig {
            naming_schemes: vec!["RGG".to_string(), "RGG_lang".to_string()],
            canon: "default".to_string(),
        };
        let parser = catalog.parser(&config).unwrap();

        assert_eq!(parser.parse("Kohelet 3,1").unwrap().book().id().as_str(), "Eccl");
        assert_eq!(parser.parse("Römerbrief 8,28").unwrap().book().id().as_str(), "Rm");
        assert_eq!(
            parser.parse("1. Korintherbrief 13,4").unwrap().book().id().as_str(),
            "1Cor"
        );
        assert_eq!(
            parser.parse("Weisheit Salomos 3,1").unwrap().book().id().as_str(),
            "Sap"
        );

        let rgg = catalog.naming_scheme("RGG").unwrap();
        let r = parser.parse("2. Korintherbrief 5,17").unwrap();
        assert_eq!(r.render_using(rgg).unwrap(), "2. Korinther 5,17");
    }

    #[test]
    fn test_embedded_schemes_are_unambiguous() {
        let catalog = Catalog::load_embedded().unwrap();
        for name in catalog.naming_scheme_names() {
            let scheme = catalog.naming_scheme(name).unwrap();
            assert!(scheme.reverse_index().is_ok(), "{name} is ambiguous");
        }
    }

    #[test]
    fn test_embedded_names_are_in_default_canon() {
        let catalog = Catalog::load_embedded().unwrap();
        let canon = catalog.canon("default").unwrap();
        for name in catalog.naming_scheme_names() {
            for (id, _) in catalog.naming_scheme(name).unwrap().entries() {
                assert!(canon.contains(id.as_str()), "{name}: {id}");
            }
        }
    }

    #[test]
    fn test_canon_identity_is_stable() {
        let catalog = Catalog::load_embedded().unwrap();
        let a = catalog.canon("default").unwrap();
        let b = catalog.canon("default").unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_unknown_names() {
        let catalog = Catalog::load_embedded().unwrap();
        assert!(matches!(
            catalog.canon("Vulgata"),
            Err(CatalogError::UnknownCanon(_))
        ));
        assert!(matches!(
            catalog.naming_scheme("Klingon"),
            Err(CatalogError::UnknownNamingScheme(_))
        ));

        let config = ParserConfig {
            naming_schemes: vec!["RGG_abbr".to_string(), "Klingon".to_string()],
            canon: "default".to_string(),
        };
        assert!(matches!(
            catalog.parser(&config),
            Err(CatalogError::UnknownNamingScheme(_))
        ));
    }

    #[test]
    fn test_default_parser() {
        let catalog = Catalog::load_embedded().unwrap();
        let parser = catalog.parser(&ParserConfig::default()).unwrap();

        let r = parser.parse("Röm 3,22").unwrap();
        assert_eq!(r.book().id().as_str(), "Rm");
        assert!(Arc::ptr_eq(
            r.book().canon(),
            catalog.canon("default").unwrap()
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let catalog = Catalog::load_embedded().unwrap();
        let json = catalog.to_json().unwrap();
        let reloaded = Catalog::from_json(&json).unwrap();

        assert_eq!(
            catalog.canon("BHS").unwrap().book_ids(),
            reloaded.canon("BHS").unwrap().book_ids()
        );
        let original: Vec<_> = catalog.naming_scheme("Luther84").unwrap().entries().collect();
        let restored: Vec<_> = reloaded.naming_scheme("Luther84").unwrap().entries().collect();
        assert_eq!(original, restored);
        assert_eq!(reloaded.naming_scheme("SBL").unwrap().verse_delimiter(), ":");
        assert_eq!(
            catalog.canon("LXX").unwrap().book_ids(),
            reloaded.canon("LXX").unwrap().book_ids()
        );
        for name in ["RGG", "RGG_lang", "Luther84_abbr"] {
            let original: Vec<_> = catalog.naming_scheme(name).unwrap().entries().collect();
            let restored: Vec<_> = reloaded.naming_scheme(name).unwrap().entries().collect();
            assert_eq!(original, restored, "{name}");
        }
        assert_eq!(
            reloaded.canon_description("KingJames"),
            catalog.canon_description("KingJames")
        );
    }

    #[test]
    fn test_version_mismatch_still_loads() {
        let json = r#"{
            "version": "0.9.0",
            "created_at": "2024-01-01T00:00:00Z",
            "canons": [{"name": "mini", "books": ["Gn", "Ex"]}],
            "naming_schemes": []
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.canon("mini").unwrap().len(), 2);
    }

    #[test]
    fn test_from_json_rejects_malformed_canon() {
        let json = r#"{
            "version": "1.0.0",
            "created_at": "2024-01-01T00:00:00Z",
            "canons": [{"name": "twice", "books": ["Gn", "Gn"]}],
            "naming_schemes": []
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::Reference(ReferenceError::MalformedCanon { .. }))
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_mini_catalog(dir.path());

        let catalog = Catalog::load_from_path(dir.path()).unwrap();
        assert_eq!(catalog.canon("mini").unwrap().len(), 2);
        assert_eq!(catalog.naming_scheme("mini_names").unwrap().len(), 2);

        // Pointing at the manifest itself works too
        let catalog = Catalog::load_from_path(&dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(catalog.canon_names().collect::<Vec<_>>(), vec!["mini"]);
    }

    #[test]
    fn test_load_from_exported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, Catalog::load_embedded().unwrap().to_json().unwrap()).unwrap();

        let catalog = Catalog::load_from_path(&path).unwrap();
        assert!(catalog.naming_scheme("SBL_abbr").is_ok());
    }

    #[test]
    fn test_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Catalog::load_from_path(dir.path()),
            Err(CatalogError::MissingFile(_))
        ));
        assert!(matches!(
            Catalog::load_from_path(&dir.path().join("nope.json")),
            Err(CatalogError::MissingFile(_))
        ));

        write_mini_catalog(dir.path());
        std::fs::remove_file(dir.path().join("mini.names")).unwrap();
        match Catalog::load_from_path(dir.path()) {
            Err(CatalogError::MissingFile(path)) => assert!(path.ends_with("mini.names")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_data_file() {
        let dir = tempfile::tempdir().unwrap();
        write_mini_catalog(dir.path());
        std::fs::write(dir.path().join("mini.names"), "Gn; Gen\nEx\n").unwrap();

        match Catalog::load_from_path(dir.path()) {
            Err(CatalogError::InvalidFile { file, .. }) => assert_eq!(file, "mini.names"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
