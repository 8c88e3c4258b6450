//! Error types for the stevedore-api crate

use miette::Diagnostic;
use serde_json::error::Category;
use thiserror::Error;

/// Main error type for stevedore-api operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The document is not syntactically valid JSON
    #[error("Malformed application JSON: {source}")]
    #[diagnostic(code(stevedore_api::decode::parse))]
    Parse {
        /// The underlying JSON parser error
        #[source]
        source: serde_json::Error,
    },

    /// The document is valid JSON but does not match the wire schema
    #[error("Invalid application document at `{path}`: {source}")]
    #[diagnostic(code(stevedore_api::decode::schema))]
    Schema {
        /// Dotted path to the field that failed to decode (e.g. `env.DATABASE_URL`)
        path: String,
        /// The underlying JSON data error
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory document could not be serialized
    #[error("Failed to encode application document: {source}")]
    #[diagnostic(code(stevedore_api::encode))]
    Encode {
        /// The underlying JSON serializer error
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Classify a decode failure, keeping the field path for data errors.
    ///
    /// Syntax-level failures (truncated or malformed JSON) carry no useful
    /// path, so they collapse into [`Error::Parse`].
    pub(crate) fn decode(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        let source = err.into_inner();
        match source.classify() {
            Category::Data => Self::Schema { path, source },
            Category::Io | Category::Syntax | Category::Eof => Self::Parse { source },
        }
    }

    /// Wrap a serializer failure.
    pub(crate) fn encode(source: serde_json::Error) -> Self {
        Self::Encode { source }
    }
}

/// Result type for stevedore-api operations
pub type Result<T> = std::result::Result<T, Error>;
