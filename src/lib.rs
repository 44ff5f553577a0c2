//! # bible-ref
//!
//! A library for recognizing, ordering and rendering Bible references.
//!
//! The same passage is written in many ways: "Röm 3,22" in a German
//! commentary, "Römer 3,22" in a Luther Bible, "Rom 3:22" in an English
//! paper. `bible-ref` maps all of them to one stable book id and lets you
//! compare, sort and re-render references independently of how they were
//! written.
//!
//! ## Features
//!
//! - **Naming schemes**: Localized book names and abbreviations, with their
//!   ordinal and verse delimiters
//! - **Canons**: Named book orders (ecumenical, King James, Hebrew Bible)
//! - **Free-text search**: Finds every reference in a text, across several
//!   schemes at once
//! - **Ranges**: Verses, verse spans, spans across chapters, chapter spans and
//!   "f"/"ff" suffixes
//! - **Rendering**: Any parsed reference can be written in any other scheme
//!
//! ## Example
//!
//! ```rust
//! use bible_ref::{sort_references, Catalog, ParserConfig};
//!
//! // Load the embedded catalog of canons and naming schemes
//! let catalog = Catalog::load_embedded().unwrap();
//!
//! // German abbreviations, ordered by the default canon
//! let parser = catalog.parser(&ParserConfig::default()).unwrap();
//!
//! let mut found: Vec<_> = parser
//!     .find_all("Vgl. Röm 3,22 und Gen 1,1")
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! sort_references(&mut found).unwrap();
//! assert_eq!(found[0].to_string(), "Gen 1,1");
//!
//! // Render in another scheme
//! let luther = catalog.naming_scheme("Luther84").unwrap();
//! assert_eq!(found[1].render_using(luther).unwrap(), "Römer 3,22");
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Registry of canons and naming schemes
//! - [`core`]: Canons, books, naming schemes and references
//! - [`matching`]: Grammar generation and reference parsing
//! - [`parsing`]: Loader for the `;`-separated data files
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Text normalization helpers

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::{Catalog, CatalogError, ParserConfig};
pub use core::book::BiblicalBook;
pub use core::canon::Canon;
pub use core::error::ReferenceError;
pub use core::naming::NamingScheme;
pub use core::reference::{sort_references, BibleReference};
pub use core::types::BookId;
pub use matching::parser::ReferenceParser;
