//! # CLI Module
//!
//! Command-line interface of the `stubgen` binary.
//!
//! ## Commands
//!
//! ### `mock`
//!
//! Generate a mock and a stub for an interface, or for the exported method
//! set of a struct:
//!
//! ```bash
//! stubgen mock -pkg ./store -type Repository -out store/mock_repository.go
//! ```
//!
//! Options:
//! - `-pkg <PKG>` - Directory or import path of the package (default: `.`)
//! - `-type <TYPE>` - Interface or struct to mock (required)
//! - `-out <FILE>` - Output file (default: stdout)
//! - `-outpkg <NAME>` - Output package name (default: the package of the type)
//! - `-selfpkg <PATH>` - Import path of the output package (requires `-outpkg`)
//! - `--stop-on-load-error` - Fail when the package loaded with errors
//!
//! ### `interface`
//!
//! Generate an interface from the exported method set of a struct:
//!
//! ```bash
//! stubgen interface -pkg ./store -type Cache -name Store
//! ```
//!
//! Takes the options of `mock` plus `-name <NAME>` for the interface name
//! (default: `<Struct>Interface`).
//!
//! Flags are accepted with one or two leading dashes.
//!
//! ## Exit Codes
//!
//! - `0` - success
//! - `1` - the package could not be loaded or parsed, or writing failed
//! - `2` - invalid arguments
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use stubgen::cli::{Cli, normalize_args, run_cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(normalize_args(std::env::args_os()));
//! run_cli(cli, &mut std::io::stdout())?;
//! ```

mod commands;

pub use commands::{Cli, Commands, TargetArgs, exit_code, normalize_args, run_cli, usage_message};
