//! Error types for the heritage scraper
//!
//! Every failure is recovered at the per-URL boundary; these types carry the
//! cause far enough to be logged and mapped to a [`SkipReason`].

use std::fmt;
use thiserror::Error;

/// The main error type for heritage scraper operations
#[derive(Error, Debug)]
pub enum Error {
    /// Page fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Content extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// CSV store errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Page fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// URL could not be parsed or has an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timed out
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Non-success HTTP status
    #[error("HTTP error {status} for {url}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Retry budget spent on transient failures
    #[error("Giving up on {url} after {attempts} attempts")]
    RetriesExhausted {
        /// Requested URL
        url: String,
        /// Attempts made
        attempts: u32,
    },
}

/// Content extraction errors
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Page title node missing or empty
    #[error("No title found")]
    NoTitleFound,

    /// Main content container missing
    #[error("No content container found")]
    NoContentContainer,

    /// No strategy produced body text
    #[error("No content found")]
    NoContentFound,

    /// A CSS selector failed to compile
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// CSV store errors
#[derive(Error, Debug)]
pub enum SinkError {
    /// File could not be opened or written
    #[error("CSV I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding failed
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a URL produced no record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Host matches neither site family
    UnknownDomain,
    /// Fetch failed or the extractor found nothing
    NoDataExtracted,
    /// Extracted record had empty fields
    MissingFields(Vec<&'static str>),
    /// Record could not be appended
    CsvWriteFailed,
    /// Extraction blew up unexpectedly
    ProcessingError,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownDomain => f.write_str("unknown_domain"),
            SkipReason::NoDataExtracted => f.write_str("no_data_extracted"),
            SkipReason::MissingFields(fields) => write!(f, "missing_fields_{}", fields.join(",")),
            SkipReason::CsvWriteFailed => f.write_str("csv_write_failed"),
            SkipReason::ProcessingError => f.write_str("processing_error"),
        }
    }
}

/// Result type alias for heritage scraper operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a configuration error from a string
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Extraction(ExtractionError::NoTitleFound);
        assert_eq!(err.to_string(), "Extraction error: No title found");
    }

    #[test]
    fn test_fetch_error() {
        let err = FetchError::Http {
            status: 503,
            url: "https://he.wikipedia.org/wiki/X".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("wiki/X"));
    }

    #[test]
    fn test_skip_reason_strings() {
        assert_eq!(SkipReason::UnknownDomain.to_string(), "unknown_domain");
        assert_eq!(SkipReason::NoDataExtracted.to_string(), "no_data_extracted");
        assert_eq!(
            SkipReason::MissingFields(vec!["title", "content"]).to_string(),
            "missing_fields_title,content"
        );
        assert_eq!(SkipReason::CsvWriteFailed.to_string(), "csv_write_failed");
        assert_eq!(SkipReason::ProcessingError.to_string(), "processing_error");
    }

    #[test]
    fn test_generic_error() {
        let err = Error::generic("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }
}
