use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::core::canon::Canon;
use crate::core::error::ReferenceError;
use crate::core::types::BookId;
use crate::utils::normalize::split_ordinal;

/// One book, anchored to the canon that orders it.
///
/// Equality only looks at the book id, so "Gn" from two different canons is
/// the same book. Ordering is only defined within one canon, see [`BiblicalBook::try_cmp`].
#[derive(Clone)]
pub struct BiblicalBook {
    id: BookId,
    canon: Arc<Canon>,
    has_ordinal: bool,
}

impl BiblicalBook {
    /// Create a book without checking canon membership.
    ///
    /// Naming schemes may know books a canon does not contain; such books
    /// can still be rendered, they just cannot be ordered.
    pub fn new(id: impl Into<BookId>, canon: Arc<Canon>) -> Self {
        let id = id.into();
        let has_ordinal = split_ordinal(id.as_str()).0.is_some();
        Self {
            id,
            canon,
            has_ordinal,
        }
    }

    /// Create a book that must be part of `canon`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if the canon does not contain the id.
    pub fn in_canon(id: impl Into<BookId>, canon: &Arc<Canon>) -> Result<Self, ReferenceError> {
        let book = Self::new(id, Arc::clone(canon));
        book.position()?;
        Ok(book)
    }

    #[must_use]
    pub fn id(&self) -> &BookId {
        &self.id
    }

    #[must_use]
    pub fn canon(&self) -> &Arc<Canon> {
        &self.canon
    }

    /// True if the id carries a leading numeral ("1Cor")
    #[must_use]
    pub fn has_ordinal(&self) -> bool {
        self.has_ordinal
    }

    /// Position of this book in its canon
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if the canon does not contain this book.
    pub fn position(&self) -> Result<usize, ReferenceError> {
        self.canon.position_of(self.id.as_str())
    }

    /// True if both books are anchored to the same canon instance
    #[must_use]
    pub fn same_canon(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.canon, &other.canon)
    }

    /// Compare two books by canonical order.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::CanonMismatch` if the books belong to different
    /// canon instances, or `ReferenceError::UnknownBook` if either book is
    /// missing from its canon.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, ReferenceError> {
        if !self.same_canon(other) {
            return Err(ReferenceError::CanonMismatch {
                left: self.canon.name().to_string(),
                right: other.canon.name().to_string(),
            });
        }
        Ok(self.position()?.cmp(&other.position()?))
    }
}

impl PartialEq for BiblicalBook {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BiblicalBook {}

impl Hash for BiblicalBook {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Debug for BiblicalBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiblicalBook")
            .field("id", &self.id.as_str())
            .field("canon", &self.canon.name())
            .finish()
    }
}

impl std::fmt::Display for BiblicalBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
