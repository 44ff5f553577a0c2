use std::ops::Range;
use std::sync::Arc;

use tracing::trace;

use crate::core::book::BiblicalBook;
use crate::core::canon::Canon;
use crate::core::error::ReferenceError;
use crate::core::naming::{NameKey, NamingScheme};
use crate::core::reference::{BibleReference, INTERNAL_VERSE_DELIMITER};
use crate::core::types::BookId;
use crate::matching::grammar::{Grammar, ReferenceMatch, ReferenceMatches};
use crate::utils::normalize::reference_int;

/// Recognizes references written in any of several naming schemes.
///
/// Schemes are consulted in the order given: a book name known to more than
/// one scheme resolves through the first scheme that knows it, and that
/// scheme is attached to the resulting reference.
#[derive(Debug, Clone)]
pub struct ReferenceParser {
    naming_schemes: Vec<Arc<NamingScheme>>,
    canon: Arc<Canon>,
    grammar: Grammar,
}

impl ReferenceParser {
    /// Build a parser for the given schemes, anchoring books to `canon`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::InvalidGrammar` if no schemes are given or the
    /// generated grammar is rejected, or `ReferenceError::AmbiguousNamingScheme`
    /// if one of the schemes has colliding names.
    pub fn new(
        naming_schemes: Vec<Arc<NamingScheme>>,
        canon: Arc<Canon>,
    ) -> Result<Self, ReferenceError> {
        if naming_schemes.is_empty() {
            return Err(ReferenceError::InvalidGrammar(
                "a parser needs at least one naming scheme".to_string(),
            ));
        }
        // Surface name collisions now instead of on the first lookup
        for scheme in &naming_schemes {
            scheme.reverse_index()?;
        }

        let grammar = Grammar::build(naming_schemes.iter().map(|scheme| &**scheme))?;

        tracing::debug!(
            schemes = ?naming_schemes.iter().map(|s| s.name()).collect::<Vec<_>>(),
            canon = canon.name(),
            "created reference parser"
        );

        Ok(Self {
            naming_schemes,
            canon,
            grammar,
        })
    }

    #[must_use]
    pub fn naming_schemes(&self) -> &[Arc<NamingScheme>] {
        &self.naming_schemes
    }

    #[must_use]
    pub fn canon(&self) -> &Arc<Canon> {
        &self.canon
    }

    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parse a reference that starts at the beginning of `text`.
    ///
    /// Anything after the reference is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::ParseError` if no reference starts at the
    /// beginning of the text, or `ReferenceError::UnknownBook` if the matched
    /// name resolves in none of the schemes.
    pub fn parse(&self, text: &str) -> Result<BibleReference, ReferenceError> {
        let m = self
            .grammar
            .match_at_start(text)
            .ok_or_else(|| ReferenceError::ParseError(text.to_string()))?;
        self.resolve(&m)
    }

    /// All references in `text`, left to right, resolved lazily.
    ///
    /// Each item is resolved independently: an unresolvable name yields an
    /// error item and scanning continues after it.
    #[must_use]
    pub fn find_all<'a>(&'a self, text: &'a str) -> FoundReferences<'a> {
        FoundReferences {
            parser: self,
            matches: self.grammar.matches(text),
        }
    }

    /// Like [`ReferenceParser::find_all`], with the byte span of every match.
    pub fn find_all_spanned<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = (Range<usize>, Result<BibleReference, ReferenceError>)> + 'a {
        self.grammar
            .matches(text)
            .map(move |m| (m.span(), self.resolve(&m)))
    }

    /// Turn a grammar match into a reference.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownBook` if no scheme knows the book name,
    /// or `ReferenceError::ParseError` if a number does not fit.
    pub fn resolve(&self, m: &ReferenceMatch<'_>) -> Result<BibleReference, ReferenceError> {
        let (id, scheme) = self.resolve_book(m.ordinal, m.book_name)?;

        let number = |s: &str| {
            reference_int(s).ok_or_else(|| ReferenceError::ParseError(m.text.to_string()))
        };
        let chapter = number(m.chapter)?;
        let verse = m.shape.start_verse().map(number).transpose()?;

        let range = m.range.replace(':', &INTERNAL_VERSE_DELIMITER.to_string());
        trace!(text = m.text, book = %id, shape = m.shape.kind(), "resolved reference");

        let book = BiblicalBook::new(id, Arc::clone(&self.canon));
        Ok(
            BibleReference::new(book, Some(chapter), verse, Arc::clone(scheme))
                .with_range(&range),
        )
    }

    fn resolve_book(
        &self,
        ordinal: Option<&str>,
        name: &str,
    ) -> Result<(BookId, &Arc<NamingScheme>), ReferenceError> {
        for scheme in &self.naming_schemes {
            match scheme.book_id_for(ordinal, name) {
                Ok(id) => return Ok((id, scheme)),
                Err(ReferenceError::UnknownBook(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        let schemes: Vec<&str> = self.naming_schemes.iter().map(|s| s.name()).collect();
        Err(ReferenceError::UnknownBook(format!(
            "'{}' is not a book name in any of the naming schemes [{}]",
            NameKey::new(ordinal, name),
            schemes.join(", ")
        )))
    }
}

/// Lazy iterator over the references of one text, see [`ReferenceParser::find_all`].
#[derive(Debug)]
pub struct FoundReferences<'a> {
    parser: &'a ReferenceParser,
    matches: ReferenceMatches<'a, 'a>,
}

impl Iterator for FoundReferences<'_> {
    type Item = Result<BibleReference, ReferenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.matches.next()?;
        Some(self.parser.resolve(&m))
    }
}
