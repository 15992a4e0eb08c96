//! # Stubgen Codegen
//!
//! Mock, stub and interface generation for Go packages.
//!
//! This crate provides:
//! - Mock and stub generation for interfaces, generic ones included
//! - Interface generation from the method set of a struct
//! - Generated file headers and output handling
//! - Entry points running the whole load, parse and generate flow

pub mod error;
pub mod generator;
pub mod go;
pub mod options;

pub use error::CodegenError;
pub use generator::{Generator, TOOL_NAME, write_output};
pub use go::{InterfaceGenerator, MockGenerator};
pub use options::{Command, InterfaceOptions, MockOptions, OutputTarget};

use stubgen_model::{Interface, Package};
use stubgen_parser::{Parser, ParserConfig};
use tracing::debug;

/// Loads `pattern` and parses the single type `type_name` from it.
///
/// # Errors
/// Returns `CodegenError` if loading or parsing fails.
pub fn parse_target(
    pattern: &str,
    type_name: &str,
    stop_on_load_error: bool,
) -> Result<Package, CodegenError> {
    let config = ParserConfig::new(vec![type_name.to_string()])
        .with_stop_on_load_error(stop_on_load_error);
    let mut parser = Parser::new(config);
    parser.load_package(pattern)?;
    Ok(parser.parse()?)
}

fn target_interface(package: &Package) -> Result<&Interface, CodegenError> {
    package
        .interfaces
        .first()
        .ok_or_else(|| CodegenError::generation(format!("no interface parsed from {}", package.path)))
}

/// Generates mock and stub source for a parsed package.
///
/// When the target was a struct, its synthesized interface is emitted
/// ahead of the mock so that the mock has something to embed.
///
/// # Errors
/// Returns `CodegenError` if the output settings are invalid or the package
/// holds no interface.
pub fn generate_mock(
    package: &Package,
    type_name: &str,
    output: &OutputTarget,
) -> Result<String, CodegenError> {
    let out = output.package(package)?;
    let iface = target_interface(package)?;
    debug!(
        "generating mock for {}.{} into package {}",
        package.path, iface.name, out.name
    );

    let path = output.path_string();
    let mut file = if iface.name == type_name {
        MockGenerator::new(package, iface, out).generate(&path)
    } else {
        let interface_generator = InterfaceGenerator::new(package, iface, out.clone());
        let declared = interface_generator.generate_interface();
        let mut file = interface_generator.generate(&path);
        MockGenerator::new(package, &declared, out).generate_into(&mut file);
        file
    };

    let generator = Generator::new(Command::Mock)
        .with_description(format!("Mock for {}.{}", package.path, iface.name));
    Ok(generator.render(&mut file))
}

/// Generates interface source for a parsed struct package.
///
/// # Errors
/// Returns `CodegenError` if the output settings are invalid or the package
/// holds no interface.
pub fn generate_interface(
    package: &Package,
    type_name: &str,
    name: Option<String>,
    output: &OutputTarget,
) -> Result<String, CodegenError> {
    let out = output.package(package)?;
    let iface = target_interface(package)?;
    let interface_generator = InterfaceGenerator::new(package, iface, out).with_name(name);
    debug!(
        "generating interface {} from {}.{}",
        interface_generator.interface_name(),
        package.path,
        type_name
    );

    let mut file = interface_generator.generate(&output.path_string());
    let generator = Generator::new(Command::Interface).with_description(format!(
        "Interface generated from {}.{}",
        package.path, type_name
    ));
    Ok(generator.render(&mut file))
}

/// Runs the `mock` command and returns the generated source.
///
/// # Errors
/// Returns `CodegenError` if the options are invalid, or loading, parsing or
/// generation fails.
pub fn run_mock(options: &MockOptions) -> Result<String, CodegenError> {
    options.output.validate()?;
    let package = parse_target(&options.pkg, &options.type_name, options.stop_on_load_error)?;
    generate_mock(&package, &options.type_name, &options.output)
}

/// Runs the `interface` command and returns the generated source.
///
/// # Errors
/// Returns `CodegenError` if the options are invalid, or loading, parsing or
/// generation fails.
pub fn run_interface(options: &InterfaceOptions) -> Result<String, CodegenError> {
    options.output.validate()?;
    let package = parse_target(&options.pkg, &options.type_name, options.stop_on_load_error)?;
    generate_interface(
        &package,
        &options.type_name,
        options.name.clone(),
        &options.output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubgen_model::{Func, PackageMap, Parameter, PkgInfo, Signature, Type};

    const PATH: &str = "example.com/app/calc";

    fn package(iface_name: &str) -> Package {
        let iface = Interface::new(
            PkgInfo::new("calc", PATH, ""),
            iface_name,
            vec![Func::new(
                "Add",
                Signature::new(
                    vec![
                        Parameter::new("a", Type::basic("int")),
                        Parameter::new("b", Type::basic("int")),
                    ],
                    None,
                    vec![Parameter::unnamed(Type::basic("int"))],
                ),
                "",
            )],
        );
        Package {
            name: "calc".to_string(),
            path: PATH.to_string(),
            dependencies: PackageMap::new("calc", PATH),
            interfaces: vec![iface],
            ..Package::default()
        }
    }

    #[test]
    fn test_generate_mock_header_and_body() {
        let source = generate_mock(&package("Adder"), "Adder", &OutputTarget::default())
            .expect("Failed to generate mock");
        assert!(source.starts_with(
            "// Code generated by stubgen mock. DO NOT EDIT.\n// Mock for example.com/app/calc.Adder\n\npackage calc\n"
        ));
        assert!(source.contains("func (m MockAdder) Add(a0 int, a1 int) int {\n\treturn m.FakeAdd(a0, a1)\n}"));
        assert!(!source.contains("type Adder interface"));
    }

    #[test]
    fn test_generate_mock_for_struct_declares_interface() {
        let output = OutputTarget {
            outpkg: "mocks".to_string(),
            ..OutputTarget::default()
        };
        let source = generate_mock(&package("CalcInterface"), "Calc", &output)
            .expect("Failed to generate mock");
        let iface = source
            .find("type CalcInterface interface {")
            .expect("interface missing");
        let mock = source.find("type MockCalcInterface struct {").expect("mock missing");
        assert!(iface < mock);
        assert!(source.contains("\tCalcInterface\n"));
        assert!(!source.contains("import"));
    }

    #[test]
    fn test_generate_interface_with_name() {
        let source = generate_interface(
            &package("CalcInterface"),
            "Calc",
            Some("Adder".to_string()),
            &OutputTarget::default(),
        )
        .expect("Failed to generate interface");
        assert_eq!(
            source,
            "// Code generated by stubgen interface. DO NOT EDIT.\n// Interface generated from example.com/app/calc.Calc\n\npackage calc\n\ntype Adder interface {\n\tAdd(a int, b int) int\n}\n"
        );
    }

    #[test]
    fn test_invalid_output_and_empty_package() {
        let output = OutputTarget {
            selfpkg: "example.com/app/mocks".to_string(),
            ..OutputTarget::default()
        };
        let err = generate_mock(&package("Adder"), "Adder", &output).expect_err("usage error");
        assert!(err.is_usage());

        let empty = Package::default();
        let err = generate_interface(&empty, "Calc", None, &OutputTarget::default())
            .expect_err("generation error");
        assert!(matches!(err, CodegenError::Generation { .. }));
    }
}
