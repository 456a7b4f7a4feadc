//! Error types for revit-mcp
//!
//! Centralized error handling using thiserror. Per-layer errors live next
//! to their layers; `ValidationError` is folded in here when it crosses into
//! the registry's payload builder.

use thiserror::Error;

use crate::schema::ValidationError;

/// All error types that can occur in revit-mcp
#[derive(Debug, Error)]
pub enum RevitMcpError {
    /// Two tools registered under the same name
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// Tool name not present in the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Agent arguments rejected by a tool schema
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for revit-mcp operations
pub type Result<T> = std::result::Result<T, RevitMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_tool_error() {
        let err = RevitMcpError::DuplicateTool("create_grid".to_string());
        assert_eq!(err.to_string(), "Duplicate tool: create_grid");
    }

    #[test]
    fn test_unknown_tool_error() {
        let err = RevitMcpError::UnknownTool("explode".to_string());
        assert_eq!(err.to_string(), "Unknown tool: explode");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: RevitMcpError = ValidationError::missing("xCount").into();
        assert!(matches!(err, RevitMcpError::Validation(_)));
        assert!(err.to_string().contains("xCount"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RevitMcpError = io_err.into();
        assert!(matches!(err, RevitMcpError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(RevitMcpError::UnknownTool("explode".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
