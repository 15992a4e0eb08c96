//! Parsed package.

use crate::arena::TypeArena;
use crate::contents::{Interface, Struct};
use crate::pkgmap::PackageMap;

/// Everything the parser extracted from one Go package.
#[derive(Debug, Clone, Default)]
pub struct Package {
    /// Package name.
    pub name: String,
    /// Import path.
    pub path: String,
    /// Packages imported by the package's files.
    pub dependencies: PackageMap,
    /// Interfaces, in declaration order.
    pub interfaces: Vec<Interface>,
    /// Structs, in declaration order.
    pub structs: Vec<Struct>,
    /// Named type definitions reachable from the package.
    pub arena: TypeArena,
}

impl Package {
    /// Returns a copy of the dependency map with every entry kept.
    #[must_use]
    pub fn copy_dependencies(&self) -> PackageMap {
        let mut pm = PackageMap::new(&self.name, &self.path);
        for (path, info) in self.dependencies.iter() {
            pm.add_if_absent(path, info.clone());
            pm.set_required(path, self.dependencies.is_required(path));
        }
        pm
    }

    /// Finds an interface by name.
    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Finds a struct by name.
    #[must_use]
    pub fn structure(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkgmap::PkgInfo;

    #[test]
    fn test_copy_dependencies_is_independent() {
        let mut pkg = Package {
            name: "sample".to_string(),
            path: "example.com/sample".to_string(),
            dependencies: PackageMap::new("sample", "example.com/sample"),
            ..Package::default()
        };
        pkg.dependencies.add("io", PkgInfo::new("io", "io", ""));

        let mut copy = pkg.copy_dependencies();
        copy.add("fmt", PkgInfo::new("fmt", "fmt", ""));

        assert!(copy.get("io").is_some());
        assert!(pkg.dependencies.get("fmt").is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let info = PkgInfo::new("sample", "example.com/sample", "");
        let pkg = Package {
            interfaces: vec![Interface::new(info.clone(), "Store", vec![])],
            structs: vec![Struct::new(info, "User")],
            ..Package::default()
        };
        assert!(pkg.interface("Store").is_some());
        assert!(pkg.structure("User").is_some());
        assert!(pkg.interface("User").is_none());
    }
}
