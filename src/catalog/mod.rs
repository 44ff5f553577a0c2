//! Catalog of canons and naming schemes.
//!
//! The catalog is the registry the parser is configured from. An embedded
//! catalog is compiled into the binary, but custom catalogs can also be loaded
//! from a data directory or from an exported JSON file.
//!
//! ## Embedded Catalog
//!
//! - **Canons**: `default` (with deuterocanonical books), `KingJames`, `BHS`, `LXX`
//! - **Naming schemes**: `RGG_abbr`, `RGG`, `RGG_lang`, `Luther84`, `Luther84_abbr`
//!   (German); `SBL`, `SBL_abbr` (English)
//!
//! ## Example
//!
//! ```rust
//! use bible_ref::{Catalog, ParserConfig};
//!
//! let catalog = Catalog::load_embedded().unwrap();
//!
//! for name in catalog.naming_scheme_names() {
//!     println!("{name}");
//! }
//!
//! let config = ParserConfig {
//!     naming_schemes: vec!["SBL_abbr".to_string(), "SBL".to_string()],
//!     canon: "KingJames".to_string(),
//! };
//! let parser = catalog.parser(&config).unwrap();
//! assert_eq!(parser.parse("Rom 3:22").unwrap().book().id().as_str(), "Rm");
//! ```
//!
//! ## Custom Catalogs
//!
//! A catalog directory holds a `manifest.json` listing its files:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "canons": [{ "name": "mini", "file": "mini.canon" }],
//!   "naming_schemes": [{
//!     "name": "mini_names", "file": "mini.names",
//!     "ordinal_delimiter": "", "verse_delimiter": ","
//!   }]
//! }
//! ```
//!
//! The data files use the format of [`crate::parsing::infofile`].
//! [`Catalog::to_json`] exports a whole catalog as one JSON document that
//! [`Catalog::load_from_path`] reads back.
//!
//! [`Catalog::to_json`]: store::Catalog::to_json
//! [`Catalog::load_from_path`]: store::Catalog::load_from_path

pub mod store;
