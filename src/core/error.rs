use thiserror::Error;

/// Errors raised by canons, naming schemes, the reference grammar and parser.
///
/// All of them are local and synchronous; callers decide whether to skip,
/// log or abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// A book id or a matched book name has no entry in the relevant table
    #[error("Unknown book: {0}")]
    UnknownBook(String),

    /// Ordering attempted across books of different canons
    #[error("Canon mismatch: cannot compare books of canon '{left}' with books of canon '{right}'")]
    CanonMismatch { left: String, right: String },

    /// No reference recognized at the required position
    #[error("No Bible reference recognized in '{0}'")]
    ParseError(String),

    /// Two display names of one scheme normalize to the same lookup key
    #[error("Ambiguous naming scheme '{scheme}': '{first}' and '{second}' both resolve to '{key}'")]
    AmbiguousNamingScheme {
        scheme: String,
        key: String,
        first: String,
        second: String,
    },

    /// Loader-supplied book order is unusable (duplicates, blank ids)
    #[error("Malformed canon '{name}': {reason}")]
    MalformedCanon { name: String, reason: String },

    /// Loader-supplied name table is unusable (empty, blank entries, duplicate ids)
    #[error("Invalid mapping for naming scheme '{name}': {reason}")]
    InvalidMapping { name: String, reason: String },

    /// The generated grammar was rejected by the regex engine
    #[error("Failed to build reference grammar: {0}")]
    InvalidGrammar(String),
}
