//! Error types for CQL translation.
//!
//! Everything the translator rejects surfaces as a [`PgCqlError`]. Most
//! failures are plain messages or messages tied to the offending search
//! clause; timestamp parsing keeps the lower-level [`chrono::ParseError`] so
//! callers can tell a malformed date apart from the rest.

use pgcql_parser::{CqlParseError, CqlTermNode};
use thiserror::Error;

/// The error type for all CQL translation operations.
#[derive(Error, Debug)]
pub enum PgCqlError {
    /// A problem not tied to a single search clause, e.g. an unknown index.
    #[error("{0}")]
    Query(String),

    /// A problem with a search clause; `term` is the clause rendered as CQL.
    #[error("{message} for: {term}")]
    Term { message: String, term: String },

    /// The query string does not match the CQL grammar.
    #[error(transparent)]
    Parse(#[from] CqlParseError),

    /// A timestamp term is not an ISO date or date-time.
    #[error("invalid timestamp '{value}'")]
    Timestamp {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// A field configuration is well-formed JSON but not a usable definition.
    #[error("invalid field definition: {0}")]
    Definition(String),

    /// A tenant or module name cannot be used in a schema name.
    #[error("{0}")]
    Name(String),

    /// A field definition file could not be decoded.
    #[error("invalid field configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A field definition file could not be read.
    #[error("cannot read field configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl PgCqlError {
    /// Creates a plain error.
    pub fn new(message: impl Into<String>) -> Self {
        PgCqlError::Query(message.into())
    }

    /// Creates an error for a search clause; displayed as `<message> for: <cql>`.
    pub fn for_term(message: impl Into<String>, term: &CqlTermNode) -> Self {
        PgCqlError::Term {
            message: message.into(),
            term: term.to_cql(),
        }
    }

    /// Returns true when the failure is a grammar error in the query string.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, PgCqlError::Parse(_))
    }
}

/// Result type alias for CQL translation.
pub type PgCqlResult<T> = Result<T, PgCqlError>;
