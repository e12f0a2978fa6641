//! Engine-boundary error taxonomy.
//!
//! Every failure in this crate is recoverable: it is surfaced to the caller
//! as a dismissible notice and leaves the board in its last committed state.

use thiserror::Error;

/// Errors surfaced at the engine boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A commit was rejected as malformed (zero-point action, blank text).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An external call (vectorization, upload) failed or timed out.
    #[error("Network error: {0}")]
    Network(String),

    /// A vectorization response was not well-formed or held no usable elements.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The local catalog store rejected a write.
    #[error("Quota exceeded: {0}")]
    Quota(String),

    /// A vectorization request was rejected because one is already in flight.
    #[error("A vectorization request is already running")]
    Busy,

    /// Catalog lookup for an unknown board id.
    #[error("Board not found: {0}")]
    NotFound(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::Validation("empty action".to_string());
        assert!(err.to_string().contains("empty action"));

        let err = EngineError::Busy;
        assert!(err.to_string().contains("already running"));
    }
}
