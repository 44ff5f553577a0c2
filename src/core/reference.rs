use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::core::book::BiblicalBook;
use crate::core::error::ReferenceError;
use crate::core::naming::NamingScheme;
use crate::utils::normalize::normalize_range;

/// Verse delimiter of the internal range representation
pub const INTERNAL_VERSE_DELIMITER: char = ',';

/// A reference to a passage: book, optional chapter and verse, and a
/// human-readable range.
///
/// Chapter and verse drive ordering; the range drives equality and
/// rendering. The attached naming scheme only decides the default rendering,
/// it plays no part in equality or ordering.
#[derive(Clone)]
pub struct BibleReference {
    book: BiblicalBook,
    chapter: Option<u32>,
    verse: Option<u32>,

    /// Normalized explicit range, using `,` between chapter and verse
    range: Option<String>,

    naming_scheme: Arc<NamingScheme>,
}

impl BibleReference {
    /// Create a reference whose range is derived from chapter and verse.
    pub fn new(
        book: BiblicalBook,
        chapter: Option<u32>,
        verse: Option<u32>,
        naming_scheme: Arc<NamingScheme>,
    ) -> Self {
        Self {
            book,
            chapter,
            verse,
            range: None,
            naming_scheme,
        }
    }

    /// Set an explicit display range.
    ///
    /// The range is normalized: dash variants become "–", whitespace runs
    /// become one space and everything is lowercased. An empty range falls
    /// back to the derived one.
    #[must_use]
    pub fn with_range(mut self, range: &str) -> Self {
        self.range = Some(normalize_range(range)).filter(|r| !r.is_empty());
        self
    }

    #[must_use]
    pub fn book(&self) -> &BiblicalBook {
        &self.book
    }

    #[must_use]
    pub fn chapter(&self) -> Option<u32> {
        self.chapter
    }

    #[must_use]
    pub fn verse(&self) -> Option<u32> {
        self.verse
    }

    #[must_use]
    pub fn naming_scheme(&self) -> &Arc<NamingScheme> {
        &self.naming_scheme
    }

    /// The range in its internal form, with `,` between chapter and verse.
    ///
    /// This is what equality compares.
    #[must_use]
    pub fn normalized_range(&self) -> String {
        if let Some(range) = &self.range {
            return range.clone();
        }
        match (self.chapter, self.verse) {
            (Some(chapter), Some(verse)) => {
                format!("{chapter}{INTERNAL_VERSE_DELIMITER}{verse}")
            }
            (Some(chapter), None) => chapter.to_string(),
            _ => String::new(),
        }
    }

    /// The range as shown by the attached naming scheme ("3,22" or "3:22").
    #[must_use]
    pub fn range(&self) -> String {
        self.range_for(&self.naming_scheme)
    }

    fn range_for(&self, scheme: &NamingScheme) -> String {
        self.normalized_range()
            .replace(INTERNAL_VERSE_DELIMITER, scheme.verse_delimiter())
    }

    /// Render this reference in the conventions of `scheme`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if the scheme has no name for this book.
    pub fn render_using(&self, scheme: &NamingScheme) -> Result<String, ReferenceError> {
        let name = scheme.display_name_for(&self.book)?;
        let range = self.range_for(scheme);
        if range.is_empty() {
            Ok(name)
        } else {
            Ok(format!("{name} {range}"))
        }
    }

    /// Ordering tuple: canon position, chapter, verse (absent counts as 0).
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if the book is missing from its canon.
    pub fn sort_tuple(&self) -> Result<(usize, u32, u32), ReferenceError> {
        Ok((
            self.book.position()?,
            self.chapter.unwrap_or(0),
            self.verse.unwrap_or(0),
        ))
    }

    /// Pack book, chapter and verse into one integer for bulk ordering.
    ///
    /// Eight bits each: canon position + 1, chapter, verse. Values above 255
    /// are truncated and may collide; use [`BibleReference::try_cmp`] when
    /// exactness matters.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if the book is missing from its canon.
    pub fn sort_key(&self) -> Result<u32, ReferenceError> {
        let (position, chapter, verse) = self.sort_tuple()?;
        #[allow(clippy::cast_possible_truncation)] // Truncation is part of the packing
        let book = (position + 1) as u32 & 0xFF;
        Ok(book << 16 | (chapter & 0xFF) << 8 | (verse & 0xFF))
    }

    /// Compare by (book, chapter, verse).
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::CanonMismatch` if the books belong to different
    /// canons, or `ReferenceError::UnknownBook` if a book is missing from its canon.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, ReferenceError> {
        let by_book = self.book.try_cmp(&other.book)?;
        Ok(by_book
            .then(self.chapter.unwrap_or(0).cmp(&other.chapter.unwrap_or(0)))
            .then(self.verse.unwrap_or(0).cmp(&other.verse.unwrap_or(0))))
    }
}

/// Sort references by canonical order.
///
/// All references are checked before the slice is touched, so on error the
/// slice keeps its original order.
///
/// # Errors
///
/// Returns `ReferenceError::CanonMismatch` if the references do not share one
/// canon, or `ReferenceError::UnknownBook` if a book is missing from the canon.
pub fn sort_references(references: &mut [BibleReference]) -> Result<(), ReferenceError> {
    let Some(first) = references.first() else {
        return Ok(());
    };

    for reference in references.iter() {
        if !reference.book.same_canon(&first.book) {
            return Err(ReferenceError::CanonMismatch {
                left: first.book.canon().name().to_string(),
                right: reference.book.canon().name().to_string(),
            });
        }
        reference.book.position()?;
    }

    references.sort_by_cached_key(|r| r.sort_tuple().unwrap_or_default());
    Ok(())
}

impl PartialEq for BibleReference {
    fn eq(&self, other: &Self) -> bool {
        self.book == other.book && self.normalized_range() == other.normalized_range()
    }
}

impl Eq for BibleReference {}

impl Hash for BibleReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.book.hash(state);
        self.normalized_range().hash(state);
    }
}

impl std::fmt::Display for BibleReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.render_using(&self.naming_scheme) {
            Ok(rendered) => write!(f, "{rendered}"),
            // The attached scheme does not know the book: fall back to its id
            Err(_) => {
                let range = self.range();
                if range.is_empty() {
                    write!(f, "{}", self.book.id())
                } else {
                    write!(f, "{} {range}", self.book.id())
                }
            }
        }
    }
}

impl std::fmt::Debug for BibleReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |n: Option<u32>| n.map_or_else(|| "-".to_string(), |n| n.to_string());
        write!(
            f,
            "<{} {}:{} '{}'>",
            self.book.id(),
            show(self.chapter),
            show(self.verse),
            self.normalized_range()
        )
    }
}
