//! Error types shared by the engine crates.

/// Contract violations from the page-extraction collaborator.
///
/// Data-quality problems (no header, malformed tokens, stray lines) are not
/// errors; they degrade to fewer records and a structured report.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LayoutError {
    /// A page arrived without a width; column geometry cannot be built.
    #[error("page {page} has no width")]
    MissingPageWidth { page: usize },

    #[error("page {page} has an unusable width: {width}")]
    InvalidPageWidth { page: usize, width: f64 },
}

/// Problems building a [`crate::BankProfile`] from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("invalid {field} pattern: {source}")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("fuzzy threshold must be within 0..=100, got {0}")]
    FuzzyThreshold(u8),

    #[error("profile '{0}' declares no header synonyms")]
    NoSynonyms(String),

    #[error("{field} must be a finite, non-negative number, got {value}")]
    Distance { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
