//! Recognizing Bible references in text.
//!
//! Two layers work together:
//!
//! - [`Grammar`]: a pattern generated from the book names of a set of naming
//!   schemes. It finds candidate references and classifies their range shape
//!   but knows nothing about book ids.
//! - [`ReferenceParser`]: resolves the matched names through the schemes in
//!   priority order and builds [`BibleReference`] values anchored to a canon.
//!
//! ## Recognized forms
//!
//! | Text           | Shape                      |
//! |----------------|----------------------------|
//! | `Gen 1`        | chapter                    |
//! | `Gen 1,3f`     | verse, with "f"/"ff"       |
//! | `Gen 1,3-5`    | verse span                 |
//! | `Gen 1,3-2,4`  | span across chapters       |
//! | `Gen 1-3`      | chapter span               |
//! | `Gen 1,1; 2,3` | continuation, kept opaque  |
//!
//! `:` is accepted wherever `,` separates chapter and verse, and any common
//! dash variant is accepted for spans.
//!
//! ## Example
//!
//! ```rust
//! use bible_ref::{Catalog, ParserConfig};
//!
//! let catalog = Catalog::load_embedded().unwrap();
//! let parser = catalog.parser(&ParserConfig::default()).unwrap();
//!
//! for found in parser.find_all("Vgl. Gen 1,1 und Röm 3,22") {
//!     let reference = found.unwrap();
//!     println!("{} -> {}", reference, reference.book().id());
//! }
//! ```
//!
//! [`Grammar`]: grammar::Grammar
//! [`ReferenceParser`]: parser::ReferenceParser
//! [`BibleReference`]: crate::core::reference::BibleReference

pub mod grammar;
pub mod parser;

pub use grammar::{Grammar, RangeShape, ReferenceMatch};
pub use parser::ReferenceParser;
