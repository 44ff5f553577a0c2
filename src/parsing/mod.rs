//! Loaders for the flat-file data the catalog is built from.
//!
//! Canons and naming schemes are stored as "info files": UTF-8 text with
//! `;`-separated columns and `#` comments.
//!
//! | File      | Columns                  | Example           |
//! |-----------|--------------------------|-------------------|
//! | `.canon`  | book id                  | `1Cor`            |
//! | `.names`  | book id; display name    | `1Cor; 1. Korinther` |
//!
//! Files starting with `+` carry a header row and are read as keyed records
//! with [`infofile::parse_dict_infofile_text`].
//!
//! ## Example
//!
//! ```rust
//! use bible_ref::parsing::infofile::parse_names_text;
//!
//! let names = parse_names_text("Gn; 1. Mose\nEx; 2. Mose # Exodus\n").unwrap();
//! assert_eq!(names.len(), 2);
//! assert_eq!(names[1].1, "2. Mose");
//! ```

pub mod infofile;
