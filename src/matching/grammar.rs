use std::collections::BTreeSet;
use std::ops::Range;

use regex::{Captures, Regex};

use crate::core::error::ReferenceError;
use crate::core::naming::NamingScheme;
use crate::utils::normalize::DASH_VARIANTS;

/// Shape of the range following a book name, as recognized by the grammar.
///
/// All fields are the raw matched text; verse numbers may carry an `a`/`b`
/// suffix ("3a").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeShape<'t> {
    /// "Gen 1"
    ChapterOnly,

    /// "Gen 1,3" or "Gen 1,3f"
    Verse { verse: &'t str },

    /// "Gen 1,3-5"
    VerseSpan { start: &'t str, end: &'t str },

    /// "Gen 1,3-2,4"
    CrossChapter {
        start_verse: &'t str,
        end_chapter: &'t str,
        end_verse: &'t str,
    },

    /// "Gen 1-3"
    ChapterSpan { end_chapter: &'t str },
}

impl<'t> RangeShape<'t> {
    /// The verse the range starts at, if the shape names one
    #[must_use]
    pub fn start_verse(&self) -> Option<&'t str> {
        match *self {
            RangeShape::Verse { verse } => Some(verse),
            RangeShape::VerseSpan { start, .. } => Some(start),
            RangeShape::CrossChapter { start_verse, .. } => Some(start_verse),
            RangeShape::ChapterOnly | RangeShape::ChapterSpan { .. } => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RangeShape::ChapterOnly => "chapter",
            RangeShape::Verse { .. } => "verse",
            RangeShape::VerseSpan { .. } => "verse_span",
            RangeShape::CrossChapter { .. } => "cross_chapter",
            RangeShape::ChapterSpan { .. } => "chapter_span",
        }
    }

    fn from_captures(caps: &Captures<'t>) -> Self {
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        if let Some(verse) = group("verse") {
            return RangeShape::Verse { verse };
        }
        if let (Some(start), Some(end)) = (group("span_start"), group("span_end")) {
            return RangeShape::VerseSpan { start, end };
        }
        if let (Some(start_verse), Some(end_chapter), Some(end_verse)) = (
            group("cross_start"),
            group("cross_end_chapter"),
            group("cross_end_verse"),
        ) {
            return RangeShape::CrossChapter {
                start_verse,
                end_chapter,
                end_verse,
            };
        }
        if let Some(end_chapter) = group("chapter_end") {
            return RangeShape::ChapterSpan { end_chapter };
        }
        RangeShape::ChapterOnly
    }
}

/// One reference recognized in a text, before book resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch<'t> {
    /// Whole matched text, ordinal and book name included
    pub text: &'t str,
    pub start: usize,
    pub end: usize,

    pub ordinal: Option<&'t str>,

    /// Book name without its ordinal, exactly as written
    pub book_name: &'t str,

    pub chapter: &'t str,
    pub shape: RangeShape<'t>,

    /// Everything from the chapter on, continuation included
    pub range: &'t str,

    /// Continuation after the first range ("; 4,5"), kept opaque
    pub extra: Option<&'t str>,
}

impl<'t> ReferenceMatch<'t> {
    fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;
        Some(Self {
            text: whole.as_str(),
            start: whole.start(),
            end: whole.end(),
            ordinal: caps.name("ordinal").map(|m| m.as_str()),
            book_name: caps.name("book")?.as_str(),
            chapter: caps.name("chapter")?.as_str(),
            shape: RangeShape::from_captures(caps),
            range: caps.name("range")?.as_str(),
            extra: caps.name("extra").map(|m| m.as_str()),
        })
    }

    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    fn shifted(mut self, offset: usize) -> Self {
        self.start += offset;
        self.end += offset;
        self
    }
}

/// The reference recognizer generated from a set of naming schemes.
///
/// Book names are tried longest first, so "Joh" is never cut short by "Jo".
/// A grammar is immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Grammar {
    book_names: Vec<String>,
    pattern: Regex,
    anchored: Regex,
}

impl Grammar {
    /// Build the grammar recognizing the bare book names of all given schemes.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::InvalidGrammar` if no scheme contributes a
    /// name or the regex engine rejects the generated pattern.
    pub fn build<'a, I>(naming_schemes: I) -> Result<Self, ReferenceError>
    where
        I: IntoIterator<Item = &'a NamingScheme>,
    {
        let unique: BTreeSet<&str> = naming_schemes
            .into_iter()
            .flat_map(|scheme| scheme.bare_names())
            .collect();
        if unique.is_empty() {
            return Err(ReferenceError::InvalidGrammar(
                "no book names to recognize".to_string(),
            ));
        }

        let mut book_names: Vec<String> = unique.into_iter().map(str::to_string).collect();
        // Leftmost-first alternation: longer names must come first
        book_names.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let alternation = book_names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let body = reference_pattern(&alternation);

        let pattern =
            Regex::new(&body).map_err(|e| ReferenceError::InvalidGrammar(e.to_string()))?;
        let anchored = Regex::new(&format!("^(?:{body})"))
            .map_err(|e| ReferenceError::InvalidGrammar(e.to_string()))?;

        tracing::debug!(
            names = book_names.len(),
            pattern_bytes = body.len(),
            "built reference grammar"
        );

        Ok(Self {
            book_names,
            pattern,
            anchored,
        })
    }

    /// Recognized bare book names, in the order they are tried
    #[must_use]
    pub fn book_names(&self) -> &[String] {
        &self.book_names
    }

    /// The generated (unanchored) pattern
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Match a reference that starts at the very beginning of `text`.
    ///
    /// Text after the reference is ignored.
    #[must_use]
    pub fn match_at_start<'t>(&self, text: &'t str) -> Option<ReferenceMatch<'t>> {
        self.anchored
            .captures(text)
            .and_then(|caps| ReferenceMatch::from_captures(&caps))
            .map(|m| self.release_following(text, m))
    }

    /// All non-overlapping references in `text`, left to right.
    #[must_use]
    pub fn matches<'g, 't>(&'g self, text: &'t str) -> ReferenceMatches<'g, 't> {
        ReferenceMatches {
            grammar: self,
            text,
            position: 0,
        }
    }

    /// Give back the ordinal of a following reference that the continuation
    /// swallowed, as the "2" in "Gen 1,1; 2. Mose 3,4".
    ///
    /// `m` must have been matched against `text`.
    fn release_following<'t>(
        &self,
        text: &'t str,
        mut m: ReferenceMatch<'t>,
    ) -> ReferenceMatch<'t> {
        while let Some(cut) = m.extra.and_then(|_| trailing_ordinal(text, m.end)) {
            if !self.anchored.is_match(&text[cut..]) {
                break;
            }
            match self
                .anchored
                .captures(&text[m.start..cut])
                .and_then(|caps| ReferenceMatch::from_captures(&caps))
            {
                Some(shorter) => m = shorter.shifted(m.start),
                None => break,
            }
        }
        m
    }
}

/// Offset of a lone digit right before `end`, a possible book ordinal
fn trailing_ordinal(text: &str, end: usize) -> Option<usize> {
    let before = text.get(..end)?;
    let mut chars = before.char_indices().rev();
    let (digit_at, digit) = chars.next()?;
    if !digit.is_ascii_digit() {
        return None;
    }
    match chars.next() {
        Some((_, c)) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(digit_at),
    }
}

/// Lazy iterator over the references of one text, see [`Grammar::matches`].
#[derive(Debug)]
pub struct ReferenceMatches<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    position: usize,
}

impl<'t> Iterator for ReferenceMatches<'_, 't> {
    type Item = ReferenceMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.position > self.text.len() {
                return None;
            }
            let caps = self.grammar.pattern.captures_at(self.text, self.position)?;
            let whole = caps.get(0)?;
            match ReferenceMatch::from_captures(&caps) {
                Some(m) => {
                    let m = self.grammar.release_following(self.text, m);
                    self.position = m.end;
                    return Some(m);
                }
                None => self.position = whole.end(),
            }
        }
    }
}

/// Character class matching any accepted dash
fn dash_class() -> String {
    let dashes: String = DASH_VARIANTS
        .iter()
        .map(|&c| if c == '-' { "\\-".to_string() } else { c.to_string() })
        .collect();
    format!("[{dashes}]")
}

fn reference_pattern(book_alternation: &str) -> String {
    let dash = dash_class();
    // Dashes without the brackets, for use inside a larger class
    let dash_chars = &dash[1..dash.len() - 1];
    let num = "[0-9]+[ab]?";

    format!(
        concat!(
            r"\b(?:(?P<ordinal>[0-9])[.\s]?\s*)?",
            r"(?P<book>{names})",
            r"\s*",
            r"(?P<range>",
            r"\(?(?P<chapter>[0-9]+)",
            r"(?:",
            r"[,:]\(?(?P<cross_start>{num}){dash}(?P<cross_end_chapter>{num})[,:](?P<cross_end_verse>{num})\)?",
            r"|[,:]\(?(?P<span_start>{num}){dash}(?P<span_end>{num})f{{0,2}}\)?",
            r"|[,:]\(?(?P<verse>{num})f{{0,2}}\)?",
            r"|{dash}(?P<chapter_end>[0-9]+)f{{0,2}}",
            r")?",
            r"\)?",
            // A continuation never ends inside a word, so "1" of "1Kor" stays with its book
            r"(?P<extra>\s*[;.(0-9+][{dash_chars};,:\s0-9ab.()f]*(?:[0-9ab]\b|\)))?",
            r")",
        ),
        names = book_alternation,
        num = num,
        dash = dash,
        dash_chars = dash_chars,
    )
}
