//! Centralized text normalization helpers.
//!
//! Book names, ordinals and ranges are normalized in several places (reverse
//! lookups, grammar construction, reference construction). Keeping the rules
//! here makes sure every component agrees on them.

/// Maximum size of a text scanned for references in one call (DOS protection)
pub const MAX_INPUT_BYTES: usize = 64 * 1024 * 1024;

/// The dash every range is normalized to
pub const TYPOGRAPHIC_DASH: char = '\u{2013}';

/// Dash variants accepted in input and collapsed to [`TYPOGRAPHIC_DASH`]
pub const DASH_VARIANTS: &[char] = &[
    '-',        // hyphen-minus
    '\u{2010}', // hyphen
    '\u{2011}', // non-breaking hyphen
    '\u{2012}', // figure dash
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2212}', // minus sign
];

/// Split a display name into its leading ordinal and the remainder.
///
/// The rule is: an optional single leading ASCII digit, followed by any run of
/// `.` or whitespace, followed by the rest of the name. The remainder keeps its
/// original casing.
///
/// # Examples
///
/// ```
/// use bible_ref::utils::normalize::split_ordinal;
///
/// assert_eq!(split_ordinal("1. Mose"), (Some("1"), "Mose"));
/// assert_eq!(split_ordinal("1Kor"), (Some("1"), "Kor"));
/// assert_eq!(split_ordinal("Röm"), (None, "Röm"));
/// ```
#[must_use]
pub fn split_ordinal(name: &str) -> (Option<&str>, &str) {
    let ordinal = name
        .chars()
        .next()
        .filter(char::is_ascii_digit)
        .map(|_| &name[..1]);

    let rest = match ordinal {
        Some(digit) => &name[digit.len()..],
        None => name,
    };
    let rest = rest.trim_start_matches(|c: char| c == '.' || c.is_whitespace());

    (ordinal, rest)
}

/// Uppercase the first character and lowercase the rest.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Normalize a book name for reverse lookups: trimmed and capitalized.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    capitalize(name.trim())
}

/// Normalize a human-readable range.
///
/// Every dash variant becomes [`TYPOGRAPHIC_DASH`], every run of whitespace
/// becomes a single space and the whole string is lowercased. Applying this
/// to its own output changes nothing.
#[must_use]
pub fn normalize_range(range: &str) -> String {
    let mut out = String::with_capacity(range.len());
    let mut in_whitespace = false;

    for c in range.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        if DASH_VARIANTS.contains(&c) {
            out.push(TYPOGRAPHIC_DASH);
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Parse the leading integer of a chapter or verse token.
///
/// References routinely carry letters after a number ("3a", "5f"); only the
/// digits count. Returns `None` if the token does not start with a digit or
/// the number does not fit.
///
/// # Examples
///
/// ```
/// use bible_ref::utils::normalize::reference_int;
///
/// assert_eq!(reference_int("22"), Some(22));
/// assert_eq!(reference_int("3a"), Some(3));
/// assert_eq!(reference_int("f"), None);
/// ```
#[must_use]
pub fn reference_int(s: &str) -> Option<u32> {
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    s[..digits].parse().ok()
}

/// Check whether a text of `len` bytes may be scanned.
///
/// Returns an error message if the text exceeds [`MAX_INPUT_BYTES`], None if safe.
#[must_use]
pub fn check_input_size(len: usize) -> Option<String> {
    if len > MAX_INPUT_BYTES {
        Some(format!(
            "Input too large: {len} bytes exceeds maximum of {MAX_INPUT_BYTES}"
        ))
    } else {
        None
    }
}
