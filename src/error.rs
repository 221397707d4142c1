//! Error types for the Typography Guide
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the guide controllers
#[derive(Debug, Snafu)]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// A required element is not present in the document
    #[snafu(display("Element not found: {selector}"))]
    MissingElement { selector: String },

    /// A selector string could not be parsed
    #[snafu(display("Invalid selector: {selector}"))]
    InvalidSelector { selector: String },

    /// A control value outside the accepted range
    #[snafu(display("Out of range: {message}"))]
    OutOfRange { message: String },

    /// Key-value storage is unavailable or rejected the operation
    #[snafu(display("Storage error: {message}"))]
    Storage { message: String },

    /// IO error (file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Create a missing element error for a selector
    pub fn missing(selector: impl Into<String>) -> Self {
        Error::MissingElement {
            selector: selector.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
