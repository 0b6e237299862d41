//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Stable error codes attached to failures surfaced by the search service.
///
/// The HTTP layer serializes these verbatim so clients can branch on them
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Embedding model failed to load or is not ready
    InitializationError,
    /// Document ingestion failed in one of the layers
    AddDocumentError,
    /// Document removal failed in one of the layers
    RemoveDocumentError,
    /// Query execution failed in one of the layers
    SearchError,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitializationError => "INITIALIZATION_ERROR",
            Self::AddDocumentError => "ADD_DOCUMENT_ERROR",
            Self::RemoveDocumentError => "REMOVE_DOCUMENT_ERROR",
            Self::SearchError => "SEARCH_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the cascade search engine
#[derive(Error, Debug)]
pub enum Error {
    /// Input outside the request contracts (empty query, malformed
    /// document, unknown user action)
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the contract violation
        message: String,
    },

    /// Operation attempted before the embedding model finished loading
    #[error("Not initialized: {message}")]
    NotInitialized {
        /// Description of the missing initialization
        message: String,
    },

    /// Internal failure within a named retrieval layer
    #[error("Layer '{layer}' error: {message}")]
    Layer {
        /// The layer that failed (layer1..layer4)
        layer: &'static str,
        /// Description of the underlying cause
        message: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Coded failure raised by the aggregating search service
    #[error("{code}: {source}")]
    Search {
        /// Stable code for transport-level branching
        code: ErrorCode,
        /// The wrapped layer failure
        #[source]
        source: Box<Error>,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-initialized error
    pub fn not_initialized<S: Into<String>>(message: S) -> Self {
        Self::NotInitialized {
            message: message.into(),
        }
    }

    /// Create a layer error with a stage tag
    pub fn layer<S: Into<String>>(layer: &'static str, message: S) -> Self {
        Self::Layer {
            layer,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wrap a layer failure in a coded service error
    pub fn coded(code: ErrorCode, source: Error) -> Self {
        Self::Search {
            code,
            source: Box::new(source),
        }
    }

    /// The stable code for this error, if it carries one
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Search { code, .. } => Some(*code),
            Self::NotInitialized { .. } => Some(ErrorCode::InitializationError),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}
