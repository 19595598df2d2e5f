//! Error types for the conversion engine.

use thiserror::Error;

/// Main error type for scene-graph and conversion operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Node handle or name does not resolve to a live node
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Attribute does not exist on the node
    #[error("Attribute not found: {node}.{attr}")]
    AttrNotFound { node: String, attr: String },

    /// Attribute value has the wrong type for the requested use
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Connect or disconnect operation failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Binding has no shader driving its surface output
    #[error("Binding has no surface shader: {0}")]
    NoSurfaceShader(String),

    /// I/O error from a filesystem walk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization error
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a connection failure from a string.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionFailed(msg.into())
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
