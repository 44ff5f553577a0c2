use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::core::book::BiblicalBook;
use crate::core::canon::Canon;
use crate::core::error::ReferenceError;
use crate::core::types::BookId;
use crate::utils::normalize::{normalize_name, split_ordinal};

/// Lookup key of the reverse index: ordinal (if any) plus the normalized name.
///
/// Lookups are case-insensitive on the name but sensitive to the ordinal,
/// so `(1, "Kor")` and `(2, "Kor")` are different books.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameKey {
    pub ordinal: Option<String>,
    pub name: String,
}

impl NameKey {
    /// Build a key from an ordinal and a bare name; an empty ordinal counts as none.
    #[must_use]
    pub fn new(ordinal: Option<&str>, name: &str) -> Self {
        let ordinal = ordinal
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string);
        Self {
            ordinal,
            name: normalize_name(name),
        }
    }

    /// Build a key from a display name that may embed its ordinal ("1. Mose")
    #[must_use]
    pub fn from_display_name(display_name: &str) -> Self {
        let (ordinal, rest) = split_ordinal(display_name.trim());
        Self::new(ordinal, rest)
    }
}

impl std::fmt::Display for NameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.ordinal {
            Some(ordinal) => write!(f, "{ordinal} {}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

type ReverseIndex = HashMap<NameKey, BookId>;

/// Bidirectional mapping between localized book names and book ids, plus
/// the punctuation used to render references in this convention.
#[derive(Debug)]
pub struct NamingScheme {
    name: String,

    /// Table: book id -> display name, in loader order
    display_name_by_id: IndexMap<BookId, String>,

    /// Glue between an ordinal and the rest of a name ("." in "1.Kor", " " in "1 Cor")
    ordinal_delimiter: String,

    /// Glue between chapter and verse ("," in "Röm 3,22", ":" in "Rom 3:22")
    verse_delimiter: String,

    /// Reverse index, built on first lookup
    book_id_by_name: OnceLock<Result<ReverseIndex, ReferenceError>>,
}

impl NamingScheme {
    /// Build a naming scheme from a book id -> display name table.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::InvalidMapping` if the table is empty, lists a
    /// book id twice, or contains a blank id or a display name without a name part.
    pub fn load<I, K, V>(
        display_name_by_id: I,
        name: impl Into<String>,
        ordinal_delimiter: impl Into<String>,
        verse_delimiter: impl Into<String>,
    ) -> Result<Self, ReferenceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<BookId>,
        V: Into<String>,
    {
        let name = name.into();
        let invalid = |reason: String| ReferenceError::InvalidMapping {
            name: name.clone(),
            reason,
        };

        let mut table = IndexMap::new();
        for (id, display_name) in display_name_by_id {
            let id: BookId = id.into();
            let display_name: String = display_name.into();

            if id.as_str().trim().is_empty() {
                return Err(invalid(format!("blank book id for '{display_name}'")));
            }
            if split_ordinal(display_name.trim()).1.is_empty() {
                return Err(invalid(format!(
                    "display name '{display_name}' of '{id}' has no name part"
                )));
            }
            if table.contains_key(&id) {
                return Err(invalid(format!("book id '{id}' is listed twice")));
            }
            table.insert(id, display_name);
        }

        if table.is_empty() {
            return Err(invalid("table is empty".to_string()));
        }

        Ok(Self {
            name,
            display_name_by_id: table,
            ordinal_delimiter: ordinal_delimiter.into(),
            verse_delimiter: verse_delimiter.into(),
            book_id_by_name: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn ordinal_delimiter(&self) -> &str {
        &self.ordinal_delimiter
    }

    #[must_use]
    pub fn verse_delimiter(&self) -> &str {
        &self.verse_delimiter
    }

    /// Number of books this scheme names
    #[must_use]
    pub fn len(&self) -> usize {
        self.display_name_by_id.len()
    }

    /// Always false for a loaded scheme
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name_by_id.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.display_name_by_id.contains_key(id)
    }

    /// The raw table entries in loader order
    pub fn entries(&self) -> impl Iterator<Item = (&BookId, &str)> {
        self.display_name_by_id
            .iter()
            .map(|(id, name)| (id, name.as_str()))
    }

    /// Build the reverse index on first use, or fetch the cached one.
    ///
    /// Concurrent first calls converge on a single stored value. A scheme
    /// whose names collide keeps failing with the same error.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::AmbiguousNamingScheme` if two display names
    /// normalize to the same key.
    pub fn reverse_index(&self) -> Result<&HashMap<NameKey, BookId>, ReferenceError> {
        self.book_id_by_name
            .get_or_init(|| self.build_reverse_index())
            .as_ref()
            .map_err(ReferenceError::clone)
    }

    fn build_reverse_index(&self) -> Result<ReverseIndex, ReferenceError> {
        let mut index = ReverseIndex::with_capacity(self.display_name_by_id.len());

        for (id, display_name) in &self.display_name_by_id {
            let key = NameKey::from_display_name(display_name);
            if let Some(existing) = index.get(&key) {
                let first = self
                    .display_name_by_id
                    .get(existing)
                    .cloned()
                    .unwrap_or_default();
                return Err(ReferenceError::AmbiguousNamingScheme {
                    scheme: self.name.clone(),
                    key: key.to_string(),
                    first,
                    second: display_name.clone(),
                });
            }
            index.insert(key, id.clone());
        }

        tracing::debug!(
            scheme = %self.name,
            entries = index.len(),
            "built reverse name index"
        );
        Ok(index)
    }

    /// Display name of a book in this scheme.
    ///
    /// Books whose id carries an ordinal are re-glued with this scheme's
    /// ordinal delimiter ("1Kor" + "." -> "1.Kor"); other names are returned as stored.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if this scheme has no name for the book.
    pub fn display_name_for(&self, book: &BiblicalBook) -> Result<String, ReferenceError> {
        let stored = self
            .display_name_by_id
            .get(book.id().as_str())
            .ok_or_else(|| {
                ReferenceError::UnknownBook(format!(
                    "'{}' has no name in naming scheme '{}'",
                    book.id(),
                    self.name
                ))
            })?;

        if book.has_ordinal() {
            if let (Some(ordinal), rest) = split_ordinal(stored) {
                return Ok(format!("{ordinal}{}{rest}", self.ordinal_delimiter));
            }
        }
        Ok(stored.clone())
    }

    /// Resolve an ordinal and a (bare) book name to a book id.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if the name is not part of this
    /// scheme, or `ReferenceError::AmbiguousNamingScheme` if the scheme's
    /// reverse index cannot be built.
    pub fn book_id_for(&self, ordinal: Option<&str>, name: &str) -> Result<BookId, ReferenceError> {
        let key = NameKey::new(ordinal, name);
        self.reverse_index()?.get(&key).cloned().ok_or_else(|| {
            ReferenceError::UnknownBook(format!(
                "'{key}' is not a book name in naming scheme '{}'",
                self.name
            ))
        })
    }

    /// Resolve a name to a book anchored to `canon`.
    ///
    /// # Errors
    ///
    /// Same as [`NamingScheme::book_id_for`].
    pub fn book_named(
        &self,
        ordinal: Option<&str>,
        name: &str,
        canon: &Arc<Canon>,
    ) -> Result<BiblicalBook, ReferenceError> {
        let id = self.book_id_for(ordinal, name)?;
        Ok(BiblicalBook::new(id, Arc::clone(canon)))
    }

    /// All display names, in canonical order if a canon is given.
    ///
    /// Without a canon the loader's table order is used. Books the canon does
    /// not contain are placed after all others, in table order.
    #[must_use]
    pub fn names_ordered_by(&self, canon: Option<&Canon>) -> Vec<&str> {
        let mut entries: Vec<(&BookId, &String)> = self.display_name_by_id.iter().collect();

        if let Some(canon) = canon {
            entries.sort_by_key(|(id, _)| canon.position_of(id.as_str()).unwrap_or(usize::MAX));
        }

        entries.into_iter().map(|(_, name)| name.as_str()).collect()
    }

    /// Display names with their ordinals stripped ("1. Mose" -> "Mose").
    ///
    /// Several books may share a bare name, so the result can contain duplicates.
    pub fn bare_names(&self) -> impl Iterator<Item = &str> {
        self.display_name_by_id
            .values()
            .map(|name| split_ordinal(name.trim()).1)
    }
}
