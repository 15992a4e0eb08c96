//! Error types for loading and parsing Go packages.

use std::fmt;
use std::path::PathBuf;
use stubgen_model::ModelError;
use thiserror::Error;

/// Non-fatal problem found while loading a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A file contains syntax errors.
    Syntax {
        /// File path.
        file: PathBuf,
        /// Positions, `line:column`.
        positions: Vec<String>,
    },
    /// Files of one directory declare different packages.
    MixedPackages {
        /// Directory.
        dir: PathBuf,
        /// Package kept.
        kept: String,
        /// Package skipped.
        skipped: String,
    },
    /// A name is declared twice in one package.
    Duplicate {
        /// Import path of the package.
        pkg: String,
        /// Declared name.
        name: String,
    },
    /// An import could not be located.
    UnresolvedImport {
        /// Importing file.
        file: PathBuf,
        /// Import path.
        path: String,
    },
    /// A file could not be read.
    Unreadable {
        /// File path.
        file: PathBuf,
        /// Reason.
        reason: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { file, positions } => write!(
                f,
                "{}: syntax error at {}",
                file.display(),
                positions.join(", ")
            ),
            Self::MixedPackages { dir, kept, skipped } => write!(
                f,
                "{}: found packages {} and {}",
                dir.display(),
                kept,
                skipped
            ),
            Self::Duplicate { pkg, name } => write!(f, "{pkg}: {name} redeclared"),
            Self::UnresolvedImport { file, path } => {
                write!(f, "{}: could not import {}", file.display(), path)
            }
            Self::Unreadable { file, reason } => write!(f, "{}: {}", file.display(), reason),
        }
    }
}

fn join_warnings(warnings: &[LoadWarning]) -> String {
    warnings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fatal error while loading a package.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The package directory does not exist.
    #[error("directory not found: {}", .path.display())]
    DirNotFound {
        /// Directory.
        path: PathBuf,
    },

    /// The directory contains no buildable Go files.
    #[error("no buildable Go source files in {}", .path.display())]
    NoGoFiles {
        /// Directory.
        path: PathBuf,
    },

    /// A pattern matched more than one package.
    #[error("error: {count} packages found for '{pattern}'")]
    MultiplePackages {
        /// Pattern.
        pattern: String,
        /// Number of packages.
        count: usize,
    },

    /// No enclosing `go.mod`.
    #[error("no go.mod found in {} or any parent directory", .path.display())]
    NoModule {
        /// Start directory.
        path: PathBuf,
    },

    /// The import path could not be located.
    #[error("cannot find package '{pattern}'")]
    PackageNotFound {
        /// Import path.
        pattern: String,
    },

    /// `go.mod` is malformed.
    #[error("{}: {message}", .path.display())]
    InvalidModFile {
        /// File path.
        path: PathBuf,
        /// Description.
        message: String,
    },

    /// I/O failure.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The Go grammar could not be used.
    #[error("go grammar: {message}")]
    Grammar {
        /// Description.
        message: String,
    },

    /// Loading produced warnings and the parser was asked to stop on them.
    #[error("error occurred when loading package: {}", join_warnings(.warnings))]
    Warnings {
        /// Collected warnings.
        warnings: Vec<LoadWarning>,
    },
}

impl LoadError {
    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error converting a loaded package into the type model.
#[derive(Debug, Error)]
pub enum ParseError {
    /// `parse` was called before a package was loaded.
    #[error("invalid parser settings: no package loaded")]
    NotLoaded,

    /// Exactly one target name is supported.
    #[error("unsupported parser settings: expected 1 target, got {count}")]
    TargetCount {
        /// Number of targets configured.
        count: usize,
    },

    /// The target is not declared in the package.
    #[error("{name} not found")]
    NotFound {
        /// Target name.
        name: String,
    },

    /// The target is neither an interface nor a struct.
    #[error("{name} is unsupported: {kind}")]
    Unsupported {
        /// Target name.
        name: String,
        /// Description of what it is.
        kind: String,
    },

    /// A type expression cannot be represented.
    #[error("unexpected type: {text}")]
    UnsupportedType {
        /// Source text.
        text: String,
    },

    /// An identifier does not name a type.
    #[error("undefined: {name}")]
    Undefined {
        /// Identifier as written.
        name: String,
    },

    /// An alias refers back to itself.
    #[error("invalid recursive type alias {name}")]
    AliasCycle {
        /// Alias name.
        name: String,
    },

    /// An array length is not a constant the parser can evaluate.
    #[error("invalid array length {text}: {reason}")]
    ArrayLength {
        /// Expression text.
        text: String,
        /// Reason.
        reason: String,
    },

    /// Method set computation failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// An invariant of the parser was violated.
    #[error("internal error. {message}")]
    Internal {
        /// Description.
        message: String,
    },
}

impl ParseError {
    /// Creates an unsupported type error.
    pub fn unsupported_type(text: impl Into<String>) -> Self {
        Self::UnsupportedType { text: text.into() }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an array length error.
    pub fn array_length(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArrayLength {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_display() {
        let err = LoadError::Warnings {
            warnings: vec![
                LoadWarning::UnresolvedImport {
                    file: PathBuf::from("a.go"),
                    path: "example.com/missing".to_string(),
                },
                LoadWarning::Duplicate {
                    pkg: "example.com/p".to_string(),
                    name: "T".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "error occurred when loading package: a.go: could not import example.com/missing; example.com/p: T redeclared"
        );
    }

    #[test]
    fn test_parse_error_helpers() {
        assert_eq!(
            ParseError::unsupported_type("[...]int").to_string(),
            "unexpected type: [...]int"
        );
        assert!(matches!(
            ParseError::internal("boom"),
            ParseError::Internal { .. }
        ));
        let model: ParseError = ModelError::NotAnInterface {
            name: "X".to_string(),
        }
        .into();
        assert_eq!(model.to_string(), "embedded type 'X' is not an interface");
    }
}
