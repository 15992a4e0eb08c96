//! # Stubgen Model
//!
//! Type model and source printer for generated Go code.
//!
//! This crate provides:
//! - Go type definitions, including generic type parameters and constraints
//! - An arena of named type definitions that tolerates recursive types
//! - Package bookkeeping with import alias conflict resolution
//! - Declarations (interfaces, structs, methods, functions) and whole files
//! - gofmt-style rendering of all of the above

pub mod arena;
pub mod contents;
pub mod error;
pub mod file;
pub mod imports;
pub mod package;
pub mod pkgmap;
pub mod print;
pub mod types;

pub use arena::{NamedType, NamedTypeId, TypeArena, binding};
pub use contents::{Contents, Func, Interface, Method, Struct};
pub use error::ModelError;
pub use file::File;
pub use package::Package;
pub use pkgmap::{BLANK_IMPORT, DOT_IMPORT, GO_RESERVED_WORDS, PackageMap, PkgInfo};
pub use types::{
    ChanDir, Constraint, Field, InterfaceType, NamedRef, Parameter, Signature, StructType, Type,
    TypeParam, UnionTerm, type_args_of,
};
