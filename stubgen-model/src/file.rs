//! Generated source file.

use crate::contents::{Contents, Func, Interface, Struct};
use crate::pkgmap::{PackageMap, PkgInfo};

/// A Go source file under construction.
#[derive(Debug, Clone)]
pub struct File {
    /// Output path; empty for standard output.
    pub path: String,
    /// Package the file belongs to.
    pub pkg: PkgInfo,
    /// Packages the file may depend on.
    pub dependencies: PackageMap,
    contents: Vec<Contents>,
}

impl File {
    /// Creates an empty file.
    ///
    /// The file's own package is added to `dependencies`.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        pkg_name: &str,
        pkg_path: &str,
        mut dependencies: PackageMap,
    ) -> Self {
        let pkg = PkgInfo::new(pkg_name, pkg_path, "");
        dependencies.add(pkg_path, pkg.clone());
        Self {
            path: path.into(),
            pkg,
            dependencies,
            contents: Vec::new(),
        }
    }

    /// Appends an interface declaration.
    pub fn add_interface(&mut self, iface: Interface) {
        self.contents.push(Contents::Interface(iface));
    }

    /// Appends a struct declaration.
    pub fn add_struct(&mut self, st: Struct) {
        self.contents.push(Contents::Struct(st));
    }

    /// Appends a function.
    pub fn add_func(&mut self, func: Func) {
        self.contents.push(Contents::Func(func));
    }

    /// Returns the declarations in order.
    #[must_use]
    pub fn contents(&self) -> &[Contents] {
        &self.contents
    }

    /// Recomputes the required imports from the contents and resolves alias conflicts.
    pub fn tidy(&mut self) -> &PackageMap {
        self.dependencies.clear_all_required();
        for content in &self.contents {
            content.collect_imports(&mut self.dependencies);
        }
        self.dependencies.resolve_alias_conflicts(&self.pkg.path);
        &self.dependencies
    }

    /// Renders the file: package clause, import block, then each declaration.
    ///
    /// Call [`File::tidy`] first so that the import block matches the contents.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = format!("package {}\n", self.pkg.name);

        let imports = self.dependencies.render_import_block(&self.pkg.path);
        if !imports.is_empty() {
            output.push('\n');
            output.push_str(&imports);
            output.push('\n');
        }

        for content in &self.contents {
            output.push('\n');
            output.push_str(&content.render(&self.pkg.path, &self.dependencies));
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NamedRef, Parameter, Signature, Type};

    const MY: &str = "example.com/mocks";

    fn rand_reader(path: &str) -> Type {
        Type::Named(NamedRef::new(Some(PkgInfo::new("rand", path, "")), "Rand"))
    }

    #[test]
    fn test_tidy_drops_unused_and_renames_conflicts() {
        let mut deps = PackageMap::new("mocks", MY);
        deps.add("fmt", PkgInfo::new("fmt", "fmt", ""));

        let mut file = File::new("", "mocks", MY, deps);
        file.add_func(Func::new(
            "Pick",
            Signature::new(
                vec![
                    Parameter::new("a", rand_reader("crypto/rand")),
                    Parameter::new("b", rand_reader("math/rand")),
                ],
                None,
                vec![],
            ),
            "",
        ));
        file.tidy();

        assert!(!file.dependencies.is_required("fmt"));
        let code = file.render();
        assert_eq!(
            code,
            "package mocks\n\n\
             import (\n\t\"crypto/rand\"\n\trand0 \"math/rand\"\n)\n\n\
             func Pick(a rand.Rand, b rand0.Rand) {\n}\n"
        );
    }

    #[test]
    fn test_render_without_imports() {
        let mut file = File::new("", "mocks", MY, PackageMap::new("mocks", MY));
        file.add_struct(Struct::new(PkgInfo::new("mocks", MY, ""), "MockEmpty"));
        file.tidy();
        assert_eq!(file.render(), "package mocks\n\ntype MockEmpty struct{}\n");
        assert_eq!(file.contents().len(), 1);
    }
}
