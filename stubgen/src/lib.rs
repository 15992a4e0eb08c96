//! # Stubgen
//!
//! Mock, stub and interface generator for Go.
//!
//! Stubgen reads a Go package from source, extracts an interface (or the
//! method set of a struct) and writes hand-written-style test doubles for it.
//!
//! ## Features
//!
//! - **Mocks** - `MockX` holds one function field per method and delegates to it
//! - **Stubs** - `StubX` holds canned results per method and builds a `MockX`
//! - **Interfaces** - `XInterface` from the exported method set of a struct
//! - **Generics** - generic interfaces and structs keep their type parameters
//! - **No Go toolchain** - packages are loaded with tree-sitter-go
//!
//! ## Quick Start
//!
//! ```ignore
//! use stubgen::codegen::{MockOptions, OutputTarget, run_mock};
//!
//! let source = run_mock(&MockOptions {
//!     pkg: "./store".to_string(),
//!     type_name: "Repository".to_string(),
//!     output: OutputTarget::default(),
//!     stop_on_load_error: false,
//! })?;
//! print!("{source}");
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Go type model and printer
//! - [`parser`] - Go package loading and type-graph parsing
//! - [`codegen`] - Mock, stub and interface generation
//! - [`cli`] - The `stubgen` command line

pub mod cli;

/// Go type model and printer.
pub mod model {
    pub use stubgen_model::*;
}

/// Go package loading and type-graph parsing.
pub mod parser {
    pub use stubgen_parser::*;
}

/// Mock, stub and interface generation.
pub mod codegen {
    pub use stubgen_codegen::*;
}

// Re-export commonly used items at the crate root
pub use stubgen_codegen::{
    CodegenError, Command, InterfaceOptions, MockOptions, OutputTarget, run_interface, run_mock,
};
pub use stubgen_model::{File, Interface, Package, PkgInfo};
pub use stubgen_parser::{LoadError, ParseError, Parser, ParserConfig};
