//! Error types for code generation.

use stubgen_parser::{LoadError, ParseError};
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The package could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The target type could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// IO error.
    #[error("writing output: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid combination of options.
    #[error("usage: {message}")]
    Usage {
        /// Error message.
        message: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a usage error with the given message.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by invalid options rather than input.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CodegenError::usage("-selfpkg requires -outpkg").to_string(),
            "usage: -selfpkg requires -outpkg"
        );
        let err: CodegenError = ParseError::NotFound {
            name: "Store".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Store not found");
        assert!(!err.is_usage());
        assert!(CodegenError::usage("x").is_usage());
    }
}
