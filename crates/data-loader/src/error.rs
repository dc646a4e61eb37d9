//! Error types for the data-loader crate.
//!
//! Every failure to produce the feature or rating tables surfaces here;
//! nothing is ever silently replaced by an empty table.

use thiserror::Error;

/// Errors that can occur while loading the movie attributes and user ratings
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Unable to open file {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A movie's feature vector does not have the shared dimension
    #[error("Movie {movie} has {found} features, expected {expected}")]
    DimensionMismatch {
        movie: String,
        expected: usize,
        found: usize,
    },

    /// Referenced entity doesn't exist (e.g., rating column for a movie without features)
    #[error("Missing reference: {entity} {name}")]
    MissingReference { entity: String, name: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
