//! Core data types for Bible references.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`BookId`]: Stable identifier of a book, the join key between all components
//! - [`Canon`]: A named order of books
//! - [`BiblicalBook`]: One book anchored to a canon, orderable within it
//! - [`NamingScheme`]: Localized book names and rendering delimiters
//! - [`BibleReference`]: Book, chapter, verse and range, with ordering and rendering
//! - [`ReferenceError`]: Errors shared by all of the above
//!
//! ## Naming Schemes
//!
//! The same book is written differently depending on language and convention:
//!
//! | Scheme   | Genesis  | 1 Corinthians  | Romans 3,22   |
//! |----------|----------|----------------|---------------|
//! | RGG_abbr | Gen      | 1Kor           | Röm 3,22      |
//! | Luther84 | 1. Mose  | 1. Korinther   | Römer 3,22    |
//! | SBL_abbr | Gen      | 1 Cor          | Rom 3:22      |
//!
//! All schemes map to the same book ids ("Gn", "1Cor", "Rm"), so a reference
//! parsed in one scheme can be rendered in any other.
//!
//! [`BookId`]: types::BookId
//! [`Canon`]: canon::Canon
//! [`BiblicalBook`]: book::BiblicalBook
//! [`NamingScheme`]: naming::NamingScheme
//! [`BibleReference`]: reference::BibleReference
//! [`ReferenceError`]: error::ReferenceError

pub mod book;
pub mod canon;
pub mod error;
pub mod naming;
pub mod reference;
pub mod types;
