//! Ingestion error types.

use thiserror::Error;

/// Why a receipt document produced no line items.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input is not well-formed XML. Non-fatal: callers report "no items
    /// found" rather than crashing.
    #[error("malformed receipt document: {0}")]
    Malformed(String),

    /// Well-formed XML whose root tag is not a supported dialect.
    /// [`crate::detect_and_parse`] absorbs this into an empty item list.
    #[error("unsupported receipt dialect: {0}")]
    UnknownDialect(String),
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Malformed(err.to_string())
    }
}

/// A byte source that could not be read. Surfaces to the user as
/// "could not retrieve document"; never reaches the parsers.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not retrieve document: {0}")]
    Http(#[from] reqwest::Error),
}
