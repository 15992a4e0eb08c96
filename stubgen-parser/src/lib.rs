//! # Stubgen Parser
//!
//! Loads Go packages from source and builds the type model of a target type.
//!
//! This crate provides:
//! - Go source parsing with tree-sitter into an owned syntax model
//! - Package discovery through `go.mod`, vendor directories, the module
//!   cache and `$GOROOT`, honouring build constraints
//! - A type-graph parser that handles recursive and generic named types
//! - Method sets of interfaces and structs, promoted methods included

pub mod build;
pub mod error;
pub mod gomod;
pub mod loader;
pub mod object;
pub mod parser;
pub mod stdlib;
pub mod syntax;
pub mod types;

pub use build::BuildContext;
pub use error::{LoadError, LoadWarning, ParseError};
pub use gomod::{GoModule, guess_package_name};
pub use loader::{GoPackage, Loader, LoaderConfig};
pub use parser::{Parser, ParserConfig};
pub use types::{Scope, TypeParser};
