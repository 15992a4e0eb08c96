//! Generation options.

use crate::error::CodegenError;
use std::path::PathBuf;
use stubgen_model::{Package, PkgInfo};

/// Generator commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Mock and stub for an interface, or for the interface of a struct.
    Mock,
    /// Interface of a struct.
    Interface,
}

impl Command {
    /// Returns the command name used on the command line and in headers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Interface => "interface",
        }
    }

    /// Returns a one-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Mock => "generate mock and stub for an interface",
            Self::Interface => "generate interface from struct",
        }
    }
}

/// Where generated code goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTarget {
    /// Output file; standard output when `None`.
    pub out: Option<PathBuf>,
    /// Output package name; the target package when empty.
    pub outpkg: String,
    /// Import path of the output package; `outpkg` when empty.
    pub selfpkg: String,
}

impl OutputTarget {
    /// Checks that the options can be combined.
    ///
    /// # Errors
    /// Returns `CodegenError::Usage` when `selfpkg` is set without `outpkg`.
    pub fn validate(&self) -> Result<(), CodegenError> {
        if self.outpkg.is_empty() && !self.selfpkg.is_empty() {
            return Err(CodegenError::usage("-selfpkg requires -outpkg"));
        }
        Ok(())
    }

    /// Resolves the output package for a parsed target package.
    ///
    /// # Errors
    /// Returns `CodegenError::Usage` when `selfpkg` is set without `outpkg`.
    pub fn package(&self, target: &Package) -> Result<PkgInfo, CodegenError> {
        self.validate()?;
        if self.outpkg.is_empty() {
            return Ok(PkgInfo::new(&target.name, &target.path, ""));
        }
        let path = if self.selfpkg.is_empty() {
            &self.outpkg
        } else {
            &self.selfpkg
        };
        Ok(PkgInfo::new(&self.outpkg, path, ""))
    }

    /// Returns the output path as a string, empty for standard output.
    #[must_use]
    pub fn path_string(&self) -> String {
        self.out
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

/// Options of the `mock` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockOptions {
    /// Package pattern: a directory or an import path.
    pub pkg: String,
    /// Interface or struct to mock.
    pub type_name: String,
    /// Output settings.
    pub output: OutputTarget,
    /// Abort when loading produced warnings.
    pub stop_on_load_error: bool,
}

/// Options of the `interface` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceOptions {
    /// Package pattern: a directory or an import path.
    pub pkg: String,
    /// Struct to derive the interface from.
    pub type_name: String,
    /// Interface name; `<Struct>Interface` when `None`.
    pub name: Option<String>,
    /// Output settings.
    pub output: OutputTarget,
    /// Abort when loading produced warnings.
    pub stop_on_load_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Package {
        Package {
            name: "store".to_string(),
            path: "example.com/app/store".to_string(),
            ..Package::default()
        }
    }

    #[test]
    fn test_output_package_resolution() {
        let same = OutputTarget::default().package(&target()).expect("valid");
        assert_eq!(same, PkgInfo::new("store", "example.com/app/store", ""));

        let named = OutputTarget {
            outpkg: "mocks".to_string(),
            ..OutputTarget::default()
        };
        assert_eq!(
            named.package(&target()).expect("valid"),
            PkgInfo::new("mocks", "mocks", "")
        );

        let full = OutputTarget {
            outpkg: "mocks".to_string(),
            selfpkg: "example.com/app/mocks".to_string(),
            ..OutputTarget::default()
        };
        assert_eq!(
            full.package(&target()).expect("valid"),
            PkgInfo::new("mocks", "example.com/app/mocks", "")
        );
    }

    #[test]
    fn test_selfpkg_requires_outpkg() {
        let bad = OutputTarget {
            selfpkg: "example.com/app/mocks".to_string(),
            ..OutputTarget::default()
        };
        assert!(matches!(bad.validate(), Err(CodegenError::Usage { .. })));
        assert!(bad.package(&target()).is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Mock.name(), "mock");
        assert_eq!(Command::Interface.name(), "interface");
        assert_eq!(OutputTarget::default().path_string(), "");
    }
}
