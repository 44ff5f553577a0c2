use std::collections::HashMap;

use crate::core::error::ReferenceError;
use crate::core::types::BookId;

/// A named, fixed order of biblical books.
///
/// Canons are built once from a loader-supplied list and shared behind an
/// `Arc`. Two canons are "the same" only if they are the same allocation:
/// books and references compare their canons by identity, never by content.
#[derive(Debug)]
pub struct Canon {
    name: String,

    /// Book ids in canonical order
    book_ids: Vec<BookId>,

    /// Index: book id -> 0-based position in `book_ids`
    index: HashMap<BookId, usize>,
}

impl Canon {
    /// Build a canon from book ids in canonical order.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::MalformedCanon` if the list is empty, contains a
    /// blank id, or contains the same id twice.
    pub fn load<I, S>(name: impl Into<String>, ordered_book_ids: I) -> Result<Self, ReferenceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<BookId>,
    {
        let name = name.into();
        let mut book_ids = Vec::new();
        let mut index = HashMap::new();

        for id in ordered_book_ids {
            let id: BookId = id.into();
            if id.as_str().trim().is_empty() {
                return Err(ReferenceError::MalformedCanon {
                    name,
                    reason: format!("blank book id at position {}", book_ids.len()),
                });
            }
            if index.insert(id.clone(), book_ids.len()).is_some() {
                return Err(ReferenceError::MalformedCanon {
                    name,
                    reason: format!("duplicate book id '{id}'"),
                });
            }
            book_ids.push(id);
        }

        if book_ids.is_empty() {
            return Err(ReferenceError::MalformedCanon {
                name,
                reason: "no books".to_string(),
            });
        }

        Ok(Self {
            name,
            book_ids,
            index,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Book ids in canonical order
    #[must_use]
    pub fn book_ids(&self) -> &[BookId] {
        &self.book_ids
    }

    /// 0-based position of a book in this canon
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if the book is not part of this canon.
    pub fn position_of(&self, id: &str) -> Result<usize, ReferenceError> {
        self.index.get(id).copied().ok_or_else(|| {
            ReferenceError::UnknownBook(format!("'{id}' is not part of canon '{}'", self.name))
        })
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate over book ids in canonical order
    pub fn iter(&self) -> std::slice::Iter<'_, BookId> {
        self.book_ids.iter()
    }

    /// Number of books in this canon
    #[must_use]
    pub fn len(&self) -> usize {
        self.book_ids.len()
    }

    /// Always false for a loaded canon
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.book_ids.is_empty()
    }
}

impl<'a> IntoIterator for &'a Canon {
    type Item = &'a BookId;
    type IntoIter = std::slice::Iter<'a, BookId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_position() {
        let canon = Canon::load("mini", ["Gn", "Ex", "Rm"]).unwrap();
        assert_eq!(canon.name(), "mini");
        assert_eq!(canon.len(), 3);
        assert_eq!(canon.position_of("Gn").unwrap(), 0);
        assert_eq!(canon.position_of("Rm").unwrap(), 2);
        assert!(canon.contains("Ex"));
    }

    #[test]
    fn test_positions_are_unique_and_in_bounds() {
        let canon = Canon::load("mini", ["Gn", "Ex", "Lv", "Nm", "Dt"]).unwrap();
        let mut seen = std::collections::HashSet::new();
        for id in &canon {
            let pos = canon.position_of(id.as_str()).unwrap();
            assert!(pos < canon.len());
            assert!(seen.insert(pos));
        }
    }

    #[test]
    fn test_iteration_follows_canonical_order() {
        let canon = Canon::load("mini", ["Mt", "Mk", "Lk", "Jn"]).unwrap();
        let ids: Vec<&str> = canon.iter().map(BookId::as_str).collect();
        assert_eq!(ids, vec!["Mt", "Mk", "Lk", "Jn"]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = Canon::load("broken", ["Gn", "Ex", "Gn"]);
        assert!(matches!(result, Err(ReferenceError::MalformedCanon { .. })));
    }

    #[test]
    fn test_empty_and_blank_are_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            Canon::load("empty", empty),
            Err(ReferenceError::MalformedCanon { .. })
        ));
        assert!(matches!(
            Canon::load("blank", ["Gn", " "]),
            Err(ReferenceError::MalformedCanon { .. })
        ));
    }

    #[test]
    fn test_unknown_book_position() {
        let canon = Canon::load("mini", ["Gn"]).unwrap();
        assert!(matches!(
            canon.position_of("Tob"),
            Err(ReferenceError::UnknownBook(_))
        ));
    }
}
