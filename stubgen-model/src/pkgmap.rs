//! Package and import bookkeeping.
//!
//! A [`PackageMap`] records every package a generated file may depend on,
//! which of them are currently required, and the alias each one is imported
//! under.

use std::collections::BTreeMap;

/// Go reserved words; an import name may not collide with any of them.
pub const GO_RESERVED_WORDS: &[&str] = &[
    "break",
    "default",
    "func",
    "interface",
    "select",
    "case",
    "defer",
    "go",
    "map",
    "struct",
    "chan",
    "else",
    "goto",
    "package",
    "switch",
    "const",
    "fallthrough",
    "if",
    "range",
    "type",
    "continue",
    "for",
    "import",
    "return",
    "var",
];

/// Alias of a dot import.
pub const DOT_IMPORT: &str = ".";
/// Alias of a blank import.
pub const BLANK_IMPORT: &str = "_";

/// Package identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PkgInfo {
    /// Package name from the package clause.
    pub name: String,
    /// Import path.
    pub path: String,
    /// Import alias; empty when imported under its own name.
    pub alias: String,
}

impl PkgInfo {
    /// Creates package info.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            alias: alias.into(),
        }
    }

    /// Returns the import spec line, `alias "path"` or `"path"`.
    #[must_use]
    pub fn import_spec(&self) -> String {
        if self.alias.is_empty() {
            format!("\"{}\"", self.path)
        } else {
            format!("{} \"{}\"", self.alias, self.path)
        }
    }

    /// Returns the qualifier to use for this package's types from `my_pkg_path`.
    #[must_use]
    pub fn prefix(&self, my_pkg_path: &str) -> String {
        if self.path == my_pkg_path || self.alias == DOT_IMPORT {
            return String::new();
        }
        if self.alias.is_empty() {
            format!("{}.", self.name)
        } else {
            format!("{}.", self.alias)
        }
    }

    /// Returns the identifier the package is referenced by in source.
    #[must_use]
    pub fn import_name(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }
}

/// Packages keyed by import path, with a per-path "import required" flag.
#[derive(Debug, Clone, Default)]
pub struct PackageMap {
    pkgs: BTreeMap<String, PkgInfo>,
    required: BTreeMap<String, bool>,
}

impl PackageMap {
    /// Creates a map containing the file's own package.
    #[must_use]
    pub fn new(my_pkg_name: &str, my_pkg_path: &str) -> Self {
        let mut map = Self::default();
        map.add(my_pkg_path, PkgInfo::new(my_pkg_name, my_pkg_path, ""));
        map
    }

    /// Registers a package and marks it required.
    pub fn add(&mut self, path: &str, pkg: PkgInfo) {
        self.pkgs.insert(path.to_string(), pkg);
        self.required.insert(path.to_string(), true);
    }

    /// Registers a package without changing an existing entry's alias.
    pub fn add_if_absent(&mut self, path: &str, pkg: PkgInfo) {
        if !self.pkgs.contains_key(path) {
            self.add(path, pkg);
        }
    }

    /// Sets whether the package must be imported.
    pub fn set_required(&mut self, path: &str, required: bool) {
        self.required.insert(path.to_string(), required);
    }

    /// Marks every package as not required.
    pub fn clear_all_required(&mut self) {
        for flag in self.required.values_mut() {
            *flag = false;
        }
    }

    /// Looks up a package by import path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&PkgInfo> {
        self.pkgs.get(path)
    }

    /// Returns true if the package is currently required.
    #[must_use]
    pub fn is_required(&self, path: &str) -> bool {
        self.required.get(path).copied().unwrap_or(false)
    }

    /// Returns the number of known packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pkgs.len()
    }

    /// Returns true if no package is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pkgs.is_empty()
    }

    /// Returns the sorted import paths that `my_pkg_path` must import.
    #[must_use]
    pub fn required_paths(&self, my_pkg_path: &str) -> Vec<String> {
        self.required
            .iter()
            .filter(|(path, required)| **required && path.as_str() != my_pkg_path)
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Assigns numeric-suffixed aliases to required packages whose names collide.
    ///
    /// Paths are processed in sorted order so the result is reproducible.
    /// Running it again on an already resolved map changes nothing.
    pub fn resolve_alias_conflicts(&mut self, my_pkg_path: &str) {
        let mut used: Vec<String> = Vec::new();
        for path in self.required_paths(my_pkg_path) {
            let Some(info) = self.pkgs.get_mut(&path) else {
                continue;
            };
            if info.alias == DOT_IMPORT || info.alias == BLANK_IMPORT {
                continue;
            }

            let base = info.import_name().to_string();
            let mut candidate = base.clone();
            let mut suffix = 0usize;
            while used.contains(&candidate) || GO_RESERVED_WORDS.contains(&candidate.as_str()) {
                candidate = format!("{base}{suffix}");
                suffix += 1;
            }
            if candidate != base {
                tracing::debug!("aliasing import {} as {}", path, candidate);
                info.alias.clone_from(&candidate);
            }
            used.push(candidate);
        }
    }

    /// Renders the import block for `my_pkg_path`; empty when nothing is required.
    #[must_use]
    pub fn render_import_block(&self, my_pkg_path: &str) -> String {
        let paths = self.required_paths(my_pkg_path);
        if paths.is_empty() {
            return String::new();
        }

        let mut output = String::from("import (\n");
        for path in &paths {
            let spec = self.pkgs.get(path).map_or_else(
                || format!("\"{path}\""),
                PkgInfo::import_spec,
            );
            output.push('\t');
            output.push_str(&spec);
            output.push('\n');
        }
        output.push(')');
        output
    }

    /// Iterates over all packages in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PkgInfo)> {
        self.pkgs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contains_own_package() {
        let pm = PackageMap::new("sample", "example.com/sample");
        assert!(pm.get("example.com/sample").is_some());
        assert!(pm.required_paths("example.com/sample").is_empty());
        assert_eq!(pm.render_import_block("example.com/sample"), "");
    }

    #[test]
    fn test_prefix() {
        let pkg = PkgInfo::new("fmt", "fmt", "");
        assert_eq!(pkg.prefix("example.com/x"), "fmt.");
        assert_eq!(pkg.prefix("fmt"), "");

        let aliased = PkgInfo::new("rand", "crypto/rand", "crand");
        assert_eq!(aliased.prefix("example.com/x"), "crand.");

        let dot = PkgInfo::new("strings", "strings", DOT_IMPORT);
        assert_eq!(dot.prefix("example.com/x"), "");
    }

    #[test]
    fn test_import_block_sorted_and_filtered() {
        let mut pm = PackageMap::new("sample", "example.com/sample");
        pm.add("time", PkgInfo::new("time", "time", ""));
        pm.add("context", PkgInfo::new("context", "context", ""));
        pm.add("fmt", PkgInfo::new("fmt", "fmt", ""));
        pm.set_required("fmt", false);

        assert_eq!(
            pm.render_import_block("example.com/sample"),
            "import (\n\t\"context\"\n\t\"time\"\n)"
        );
    }

    #[test]
    fn test_clear_all_required() {
        let mut pm = PackageMap::new("sample", "example.com/sample");
        pm.add("io", PkgInfo::new("io", "io", ""));
        pm.clear_all_required();
        assert!(!pm.is_required("io"));
        assert!(pm.get("io").is_some());
    }

    #[test]
    fn test_resolve_alias_conflicts() {
        let mut pm = PackageMap::new("sample", "example.com/sample");
        pm.add("crypto/rand", PkgInfo::new("rand", "crypto/rand", ""));
        pm.add("math/rand", PkgInfo::new("rand", "math/rand", ""));
        pm.add("example.com/type", PkgInfo::new("type", "example.com/type", ""));

        pm.resolve_alias_conflicts("example.com/sample");

        assert_eq!(pm.get("crypto/rand").map(|p| p.alias.as_str()), Some(""));
        assert_eq!(pm.get("math/rand").map(|p| p.alias.as_str()), Some("rand0"));
        assert_eq!(
            pm.get("example.com/type").map(|p| p.alias.as_str()),
            Some("type0")
        );

        let before = pm.render_import_block("example.com/sample");
        pm.resolve_alias_conflicts("example.com/sample");
        assert_eq!(pm.render_import_block("example.com/sample"), before);
        assert!(before.contains("rand0 \"math/rand\""));
    }

    #[test]
    fn test_resolve_skips_dot_and_blank_imports() {
        let mut pm = PackageMap::new("sample", "example.com/sample");
        pm.add("a/strings", PkgInfo::new("strings", "a/strings", DOT_IMPORT));
        pm.add("strings", PkgInfo::new("strings", "strings", ""));
        pm.resolve_alias_conflicts("example.com/sample");
        assert_eq!(pm.get("strings").map(|p| p.alias.as_str()), Some(""));
    }
}
