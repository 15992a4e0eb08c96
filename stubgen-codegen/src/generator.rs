//! Output assembly: header, rendered file and destination.

use crate::error::CodegenError;
use crate::options::Command;
use std::fs;
use std::io::Write;
use std::path::Path;
use stubgen_model::File;
use tracing::debug;

/// Name written into generated file headers.
pub const TOOL_NAME: &str = "stubgen";

/// Renders generated files with their header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    command: Command,
    description: String,
}

impl Generator {
    /// Creates a generator for `command`.
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            command,
            description: String::new(),
        }
    }

    /// Sets the line describing what was generated, e.g. `Mock for io.Reader`.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the header comment, one `//` line each.
    #[must_use]
    pub fn header(&self) -> String {
        let mut output = format!(
            "// Code generated by {TOOL_NAME} {}. DO NOT EDIT.\n",
            self.command.name()
        );
        if !self.description.is_empty() {
            output.push_str(&format!("// {}\n", self.description));
        }
        output
    }

    /// Resolves imports and renders the file below the header.
    #[must_use]
    pub fn render(&self, file: &mut File) -> String {
        file.tidy();
        let mut output = self.header();
        output.push('\n');
        output.push_str(&file.render());
        output
    }
}

/// Writes generated source to `out`, or to `stdout` when `out` is `None`.
///
/// Parent directories of `out` are created as needed.
///
/// # Errors
/// Returns `CodegenError::Io` if writing fails.
pub fn write_output<W: Write>(
    source: &str,
    out: Option<&Path>,
    stdout: &mut W,
) -> Result<(), CodegenError> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, source)?;
            debug!("wrote {} bytes to {}", source.len(), path.display());
        }
        None => {
            stdout.write_all(source.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubgen_model::PackageMap;

    #[test]
    fn test_header() {
        let generator = Generator::new(Command::Mock).with_description("Mock for io.Reader");
        assert_eq!(
            generator.header(),
            "// Code generated by stubgen mock. DO NOT EDIT.\n// Mock for io.Reader\n"
        );
        assert_eq!(
            Generator::new(Command::Interface).header(),
            "// Code generated by stubgen interface. DO NOT EDIT.\n"
        );
    }

    #[test]
    fn test_render_prepends_header() {
        let mut file = File::new("", "mocks", "mocks", PackageMap::new("mocks", "mocks"));
        let source = Generator::new(Command::Mock).render(&mut file);
        assert_eq!(
            source,
            "// Code generated by stubgen mock. DO NOT EDIT.\n\npackage mocks\n"
        );
    }

    #[test]
    fn test_write_output_to_file_and_stdout() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested/mock.go");
        let mut stdout = Vec::new();

        write_output("package x\n", Some(path.as_path()), &mut stdout).expect("Failed to write file");
        assert!(stdout.is_empty());
        assert_eq!(
            fs::read_to_string(&path).expect("Failed to read file"),
            "package x\n"
        );

        write_output("package y\n", None, &mut stdout).expect("Failed to write stdout");
        assert_eq!(stdout, b"package y\n");
    }
}
