//! Typed construction errors
//!
//! The only failure this package originates itself is policy serialization;
//! the rest are input validation and dispatch errors. Engine-side failures
//! (creation conflicts, permissions, quotas) never appear here — they are
//! surfaced by the engine, not handled by this code.

use thiserror::Error;

/// Errors raised while constructing a component
#[derive(Debug, Error)]
pub enum ConstructError {
    /// Component name is empty
    #[error("component name cannot be empty")]
    EmptyName,

    /// A required input is missing
    #[error("missing required input '{0}'")]
    MissingInput(&'static str),

    /// An input has the wrong type
    #[error("input '{input}' must be a {expected}")]
    InvalidInput {
        input: &'static str,
        expected: &'static str,
    },

    /// Construction requested for a type token this provider does not export
    #[error("unknown component type '{0}'")]
    UnknownComponentType(String),

    /// Policy document serialization failed; fatal, never retried
    #[error("failed to serialize bucket policy: {0}")]
    PolicySerialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConstructError::EmptyName.to_string(),
            "component name cannot be empty"
        );
        assert_eq!(
            ConstructError::MissingInput("indexContent").to_string(),
            "missing required input 'indexContent'"
        );
        assert_eq!(
            ConstructError::InvalidInput {
                input: "indexContent",
                expected: "string",
            }
            .to_string(),
            "input 'indexContent' must be a string"
        );
        assert_eq!(
            ConstructError::UnknownComponentType("x:y:Z".to_string()).to_string(),
            "unknown component type 'x:y:Z'"
        );
    }
}
