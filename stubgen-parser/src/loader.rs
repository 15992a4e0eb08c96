//! Package loading.
//!
//! The [`Loader`] locates Go packages on disk, parses their files into the
//! owned syntax model and indexes their declarations. Packages are loaded on
//! demand and cached by import path; an import that cannot be located is
//! cached as opaque.

use crate::build::BuildContext;
use crate::error::{LoadError, LoadWarning};
use crate::gomod::{GoModule, goroot_from_env, guess_package_name, mod_cache_from_env};
use crate::stdlib::{builtin_source, is_pseudo_package};
use crate::syntax::{self, ConstDecl, MethodDecl, SourceFile, TypeDecl};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use stubgen_model::PkgInfo;
use tracing::{debug, warn};

/// Position of a declaration: file index and index within that file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeclRef {
    file: usize,
    index: usize,
}

/// A loaded Go package with its declarations indexed by name.
#[derive(Debug, Clone)]
pub struct GoPackage {
    /// Package name.
    pub name: String,
    /// Import path.
    pub path: String,
    /// Source directory; `None` for built-in declarations.
    pub dir: Option<PathBuf>,
    /// Parsed files.
    pub files: Vec<SourceFile>,
    types: HashMap<String, DeclRef>,
    consts: HashMap<String, DeclRef>,
    methods: HashMap<String, Vec<DeclRef>>,
}

impl GoPackage {
    /// Indexes the declarations of `files`, reporting duplicates.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        dir: Option<PathBuf>,
        files: Vec<SourceFile>,
        warnings: &mut Vec<LoadWarning>,
    ) -> Self {
        let mut pkg = Self {
            name: name.into(),
            path: path.into(),
            dir,
            files,
            types: HashMap::new(),
            consts: HashMap::new(),
            methods: HashMap::new(),
        };

        for (file_idx, file) in pkg.files.iter().enumerate() {
            let decls = file
                .types
                .iter()
                .map(|t| (&t.name, true))
                .chain(file.consts.iter().map(|c| (&c.name, false)));
            let mut counters = (0usize, 0usize);
            for (name, is_type) in decls {
                let index = if is_type { &mut counters.0 } else { &mut counters.1 };
                let decl = DeclRef {
                    file: file_idx,
                    index: *index,
                };
                *index += 1;
                if name == "_" {
                    continue;
                }
                if pkg.types.contains_key(name) || pkg.consts.contains_key(name) {
                    warnings.push(LoadWarning::Duplicate {
                        pkg: pkg.path.clone(),
                        name: name.clone(),
                    });
                    continue;
                }
                if is_type {
                    pkg.types.insert(name.clone(), decl);
                } else {
                    pkg.consts.insert(name.clone(), decl);
                }
            }

            for (index, method) in file.methods.iter().enumerate() {
                pkg.methods
                    .entry(method.receiver.type_name.clone())
                    .or_default()
                    .push(DeclRef {
                        file: file_idx,
                        index,
                    });
            }
        }
        pkg
    }

    /// Returns the package identity.
    #[must_use]
    pub fn info(&self) -> PkgInfo {
        PkgInfo::new(&self.name, &self.path, "")
    }

    /// Looks up a type declaration, with the index of its file.
    #[must_use]
    pub fn type_decl(&self, name: &str) -> Option<(usize, &TypeDecl)> {
        let decl = self.types.get(name)?;
        Some((decl.file, self.files[decl.file].types.get(decl.index)?))
    }

    /// Looks up a constant, with the index of its file.
    #[must_use]
    pub fn const_decl(&self, name: &str) -> Option<(usize, &ConstDecl)> {
        let decl = self.consts.get(name)?;
        Some((decl.file, self.files[decl.file].consts.get(decl.index)?))
    }

    /// Returns the methods declared on a receiver base type, with their file indexes.
    #[must_use]
    pub fn methods_of(&self, type_name: &str) -> Vec<(usize, &MethodDecl)> {
        self.methods
            .get(type_name)
            .map(|decls| {
                decls
                    .iter()
                    .filter_map(|d| Some((d.file, self.files[d.file].methods.get(d.index)?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns every import path used by the package's files, sorted.
    #[must_use]
    pub fn import_paths(&self) -> BTreeSet<String> {
        self.files
            .iter()
            .flat_map(|f| f.imports.iter().map(|i| i.path.clone()))
            .collect()
    }
}

/// Loader settings.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Abort when loading produced warnings.
    pub stop_on_load_error: bool,
    /// Go installation used for standard library packages.
    pub goroot: Option<PathBuf>,
    /// Module cache used for required modules.
    pub mod_cache: Option<PathBuf>,
    /// Target platform for file selection.
    pub build: BuildContext,
    /// Fall back to built-in declarations for common standard library packages.
    pub builtin_stdlib: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            stop_on_load_error: false,
            goroot: goroot_from_env(),
            mod_cache: mod_cache_from_env(),
            build: BuildContext::from_env(),
            builtin_stdlib: true,
        }
    }
}

enum Location {
    Dir(PathBuf),
    Builtin(&'static str),
}

/// Locates, parses and caches Go packages.
pub struct Loader {
    config: LoaderConfig,
    parser: tree_sitter::Parser,
    module: Option<GoModule>,
    cache: HashMap<String, Option<Rc<GoPackage>>>,
    names: HashMap<String, String>,
    warnings: Vec<LoadWarning>,
    // Number of warnings already written to the log.
    logged: usize,
    target_loaded: bool,
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("config", &self.config)
            .field("module", &self.module)
            .field("cached", &self.cache.len())
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

impl Loader {
    /// Creates a loader.
    ///
    /// # Errors
    /// Returns `LoadError::Grammar` if the Go grammar cannot be initialised.
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        Ok(Self {
            config,
            parser: syntax::go_parser()?,
            module: None,
            cache: HashMap::new(),
            names: HashMap::new(),
            warnings: Vec::new(),
            logged: 0,
            target_loaded: false,
        })
    }

    /// Returns the main module, once a target has been loaded.
    #[must_use]
    pub fn module(&self) -> Option<&GoModule> {
        self.module.as_ref()
    }

    /// Returns the warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Loads the package named by `pattern` together with its direct imports.
    ///
    /// `pattern` is a directory (absolute or starting with `.`), a directory
    /// followed by `/...`, or an import path.
    ///
    /// # Errors
    /// Returns `LoadError` if the package cannot be located or read, if the
    /// pattern matches more than one package, or if warnings were produced and
    /// `stop_on_load_error` is set.
    pub fn load_target(&mut self, pattern: &str) -> Result<Rc<GoPackage>, LoadError> {
        let pkg = if is_dir_pattern(pattern) {
            self.load_target_dir(pattern)?
        } else {
            self.load_target_path(pattern)?
        };
        debug!("loaded {} ({} files)", pkg.path, pkg.files.len());

        let mut unresolved = BTreeSet::new();
        for file in &pkg.files {
            for import in &file.imports {
                if is_pseudo_package(&import.path) || unresolved.contains(&import.path) {
                    continue;
                }
                if self.import(&import.path).is_none() {
                    unresolved.insert(import.path.clone());
                    let file_path = pkg
                        .dir
                        .as_ref()
                        .map_or_else(|| PathBuf::from(&file.file_name), |d| d.join(&file.file_name));
                    self.warnings.push(LoadWarning::UnresolvedImport {
                        file: file_path,
                        path: import.path.clone(),
                    });
                }
            }
        }

        self.target_loaded = true;
        if !self.warnings.is_empty() {
            if self.config.stop_on_load_error {
                return Err(LoadError::Warnings {
                    warnings: self.warnings.clone(),
                });
            }
            if self.log_warnings() {
                warn!("error occurred when loading package");
            }
        }
        Ok(pkg)
    }

    /// Drops repeats of earlier warnings and logs the ones not yet logged.
    ///
    /// Returns true if anything was logged.
    fn log_warnings(&mut self) -> bool {
        let mut index = self.logged;
        while index < self.warnings.len() {
            if self.warnings[..index].contains(&self.warnings[index]) {
                self.warnings.remove(index);
            } else {
                index += 1;
            }
        }
        let fresh = &self.warnings[self.logged..];
        for warning in fresh {
            warn!("{}", warning);
        }
        let logged = !fresh.is_empty();
        self.logged = self.warnings.len();
        logged
    }

    fn load_target_dir(&mut self, pattern: &str) -> Result<Rc<GoPackage>, LoadError> {
        let (base, recursive) = match pattern.strip_suffix("/...") {
            Some(base) => (if base.is_empty() { "/" } else { base }, true),
            None if pattern == "..." => (".", true),
            None => (pattern, false),
        };
        let base = Path::new(base);
        if !base.is_dir() {
            return Err(LoadError::DirNotFound {
                path: base.to_path_buf(),
            });
        }

        let dir = if recursive {
            let mut dirs = Vec::new();
            self.package_dirs(base, &mut dirs)?;
            match dirs.len() {
                0 => {
                    return Err(LoadError::NoGoFiles {
                        path: base.to_path_buf(),
                    });
                }
                1 => dirs.remove(0),
                count => {
                    return Err(LoadError::MultiplePackages {
                        pattern: pattern.to_string(),
                        count,
                    });
                }
            }
        } else {
            base.to_path_buf()
        };

        let dir = dir.canonicalize().map_err(|e| LoadError::io(&dir, e))?;
        let module = GoModule::find(&dir)?;
        let import_path = module
            .import_path_of(&dir)
            .ok_or_else(|| LoadError::NoModule { path: dir.clone() })?;
        self.module = Some(module);

        let pkg = Rc::new(self.load_dir(&dir, &import_path)?);
        self.cache.insert(import_path, Some(Rc::clone(&pkg)));
        Ok(pkg)
    }

    fn load_target_path(&mut self, pattern: &str) -> Result<Rc<GoPackage>, LoadError> {
        if pattern.ends_with("/...") {
            return Err(LoadError::MultiplePackages {
                pattern: pattern.to_string(),
                count: 0,
            });
        }
        if let Ok(cwd) = std::env::current_dir() {
            self.module = GoModule::find(&cwd).ok();
        }
        let pkg = match self.locate(pattern) {
            Some(Location::Dir(dir)) => self.load_dir(&dir, pattern)?,
            Some(Location::Builtin(src)) => self.load_builtin(pattern, src)?,
            None => {
                return Err(LoadError::PackageNotFound {
                    pattern: pattern.to_string(),
                });
            }
        };
        let pkg = Rc::new(pkg);
        self.cache.insert(pattern.to_string(), Some(Rc::clone(&pkg)));
        Ok(pkg)
    }

    /// Returns an imported package, loading it on first use.
    ///
    /// `None` means the package is opaque: it could not be located or read.
    pub fn import(&mut self, import_path: &str) -> Option<Rc<GoPackage>> {
        if let Some(cached) = self.cache.get(import_path) {
            return cached.clone();
        }
        if is_pseudo_package(import_path) {
            self.cache.insert(import_path.to_string(), None);
            return None;
        }

        let loaded = match self.locate(import_path) {
            Some(Location::Dir(dir)) => self.load_dir(&dir, import_path).ok(),
            Some(Location::Builtin(src)) => self.load_builtin(import_path, src).ok(),
            None => None,
        };
        if loaded.is_none() {
            debug!("package {} is opaque", import_path);
        }
        if self.target_loaded {
            self.log_warnings();
        }

        let loaded = loaded.map(Rc::new);
        self.cache.insert(import_path.to_string(), loaded.clone());
        loaded
    }

    /// Returns the name of an imported package, guessed from the path when
    /// its source is unavailable.
    pub fn package_name(&mut self, import_path: &str) -> String {
        if let Some(Some(pkg)) = self.cache.get(import_path) {
            return pkg.name.clone();
        }
        if let Some(name) = self.names.get(import_path) {
            return name.clone();
        }

        let name = match self.locate(import_path) {
            Some(Location::Dir(dir)) => self.read_package_clause(&dir),
            Some(Location::Builtin(src)) => syntax::package_name(&mut self.parser, src),
            None => None,
        }
        .unwrap_or_else(|| guess_package_name(import_path));
        self.names.insert(import_path.to_string(), name.clone());
        name
    }

    fn locate(&self, import_path: &str) -> Option<Location> {
        if let Some(module) = &self.module {
            if let Some(dir) = module.local_dir(import_path) {
                if dir.is_dir() {
                    return Some(Location::Dir(dir));
                }
            }
            let found = module
                .dependency_dirs(import_path, self.config.mod_cache.as_deref())
                .into_iter()
                .find(|d| d.is_dir());
            if let Some(dir) = found {
                return Some(Location::Dir(dir));
            }
        }
        if let Some(goroot) = &self.config.goroot {
            let src = goroot.join("src");
            for dir in [src.join(import_path), src.join("vendor").join(import_path)] {
                if dir.is_dir() {
                    return Some(Location::Dir(dir));
                }
            }
        }
        if self.config.builtin_stdlib {
            return builtin_source(import_path).map(Location::Builtin);
        }
        None
    }

    fn go_files(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let entries = std::fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| self.config.build.matches_file_name(n))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn package_dirs(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
        if !self.go_files(dir)?.is_empty() {
            out.push(dir.to_path_buf());
        }
        let entries = std::fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;
        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .filter(|p| {
                p.file_name().and_then(|n| n.to_str()).is_some_and(|n| {
                    !(n.starts_with('.') || n.starts_with('_') || n == "testdata" || n == "vendor")
                })
            })
            .collect();
        subdirs.sort();
        for sub in subdirs {
            self.package_dirs(&sub, out)?;
        }
        Ok(())
    }

    fn read_package_clause(&mut self, dir: &Path) -> Option<String> {
        for path in self.go_files(dir).ok()? {
            let Ok(source) = std::fs::read_to_string(&path) else {
                continue;
            };
            if let Some(name) = syntax::package_name(&mut self.parser, &source) {
                return Some(name);
            }
        }
        None
    }

    fn load_dir(&mut self, dir: &Path, import_path: &str) -> Result<GoPackage, LoadError> {
        let paths = self.go_files(dir)?;
        let mut files: Vec<SourceFile> = Vec::with_capacity(paths.len());
        let mut name: Option<String> = None;

        for path in paths {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    self.warnings.push(LoadWarning::Unreadable {
                        file: path.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let file = syntax::parse_source(&mut self.parser, &file_name, &source)?;
            if !self.is_buildable(&file) {
                debug!("skipping {} (build constraints)", path.display());
                continue;
            }
            if !file.errors.is_empty() {
                self.warnings.push(LoadWarning::Syntax {
                    file: path.clone(),
                    positions: file.errors.clone(),
                });
            }
            match &name {
                None => name = Some(file.package.clone()),
                Some(kept) if *kept != file.package => {
                    self.warnings.push(LoadWarning::MixedPackages {
                        dir: dir.to_path_buf(),
                        kept: kept.clone(),
                        skipped: file.package.clone(),
                    });
                    continue;
                }
                Some(_) => {}
            }
            files.push(file);
        }

        let Some(name) = name else {
            return Err(LoadError::NoGoFiles {
                path: dir.to_path_buf(),
            });
        };
        Ok(GoPackage::new(
            name,
            import_path,
            Some(dir.to_path_buf()),
            files,
            &mut self.warnings,
        ))
    }

    fn load_builtin(&mut self, import_path: &str, source: &str) -> Result<GoPackage, LoadError> {
        let file = syntax::parse_source(&mut self.parser, &format!("{import_path}.go"), source)?;
        Ok(GoPackage::new(
            file.package.clone(),
            import_path,
            None,
            vec![file],
            &mut self.warnings,
        ))
    }

    fn is_buildable(&self, file: &SourceFile) -> bool {
        if let Some(expr) = &file.go_build {
            return self.config.build.eval_go_build(expr).unwrap_or(false);
        }
        file.plus_build
            .iter()
            .all(|line| self.config.build.eval_plus_build(line))
    }
}

fn is_dir_pattern(pattern: &str) -> bool {
    pattern.starts_with('.') || Path::new(pattern).is_absolute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config() -> LoaderConfig {
        LoaderConfig {
            stop_on_load_error: false,
            goroot: None,
            mod_cache: None,
            build: BuildContext::new("linux", "amd64"),
            builtin_stdlib: true,
        }
    }

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(path, contents).expect("Failed to write file");
    }

    fn module_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        write(dir.path(), "go.mod", "module example.com/app\n\ngo 1.22\n");
        dir
    }

    #[test]
    fn test_load_target_dir_filters_files() {
        let dir = module_dir();
        write(dir.path(), "store/store.go", "package store\n\ntype Store interface{}\n");
        write(dir.path(), "store/store_test.go", "package store\n\ntype Hidden int\n");
        write(dir.path(), "store/store_windows.go", "package store\n\ntype Win int\n");
        write(
            dir.path(),
            "store/gen.go",
            "//go:build ignore\n\npackage main\n\ntype Gen int\n",
        );

        let mut loader = Loader::new(config()).expect("Failed to create loader");
        let target = dir.path().join("store");
        let pkg = loader
            .load_target(target.to_str().expect("utf8 path"))
            .expect("Failed to load");

        assert_eq!(pkg.name, "store");
        assert_eq!(pkg.path, "example.com/app/store");
        assert_eq!(pkg.files.len(), 1);
        assert!(pkg.type_decl("Store").is_some());
        assert!(pkg.type_decl("Hidden").is_none());
        assert!(pkg.type_decl("Win").is_none());
        assert!(loader.warnings().is_empty());
    }

    #[test]
    fn test_unresolved_import_is_warning_or_error() {
        let dir = module_dir();
        write(
            dir.path(),
            "svc/svc.go",
            "package svc\n\nimport \"example.com/missing/dep\"\n\ntype S struct{ D dep.Thing }\n",
        );
        let target = dir.path().join("svc");
        let target = target.to_str().expect("utf8 path");

        let mut loader = Loader::new(config()).expect("Failed to create loader");
        assert!(loader.load_target(target).is_ok());
        assert!(matches!(
            loader.warnings(),
            [LoadWarning::UnresolvedImport { path, .. }] if path == "example.com/missing/dep"
        ));
        assert_eq!(loader.package_name("example.com/missing/dep"), "dep");

        let mut strict = Loader::new(LoaderConfig {
            stop_on_load_error: true,
            ..config()
        })
        .expect("Failed to create loader");
        assert!(matches!(
            strict.load_target(target),
            Err(LoadError::Warnings { .. })
        ));
    }

    #[test]
    fn test_warnings_recorded_once() {
        let dir = module_dir();
        write(
            dir.path(),
            "svc/a.go",
            "package svc\n\nimport \"example.com/missing/dep\"\n\nvar _ dep.Thing\n",
        );
        write(
            dir.path(),
            "svc/b.go",
            "package svc\n\nimport dep \"example.com/missing/dep\"\n\ntype S struct{ D dep.Thing }\n",
        );
        write(dir.path(), "svc/c.go", "package other\n");
        let target = dir.path().join("svc");
        let target = target.to_str().expect("utf8 path");

        let mut loader = Loader::new(config()).expect("Failed to create loader");
        loader.load_target(target).expect("Failed to load");
        loader.load_target(target).expect("Failed to reload");
        assert!(loader.import("example.com/missing/dep").is_none());

        let unresolved = loader
            .warnings()
            .iter()
            .filter(|w| matches!(w, LoadWarning::UnresolvedImport { .. }))
            .count();
        let mixed = loader
            .warnings()
            .iter()
            .filter(|w| matches!(w, LoadWarning::MixedPackages { .. }))
            .count();
        assert_eq!((unresolved, mixed), (1, 1));
        assert_eq!(loader.warnings().len(), 2);
    }

    #[test]
    fn test_local_imports_and_builtins() {
        let dir = module_dir();
        write(dir.path(), "model/user.go", "package model\n\ntype User struct{ ID int }\n");
        write(
            dir.path(),
            "api/api.go",
            "package api\n\nimport (\n\t\"context\"\n\t\"example.com/app/model\"\n)\n\ntype API interface {\n\tGet(ctx context.Context) model.User\n}\n",
        );
        let mut loader = Loader::new(config()).expect("Failed to create loader");
        let target = dir.path().join("api");
        loader
            .load_target(target.to_str().expect("utf8 path"))
            .expect("Failed to load");

        let model = loader.import("example.com/app/model").expect("model not loaded");
        assert_eq!(model.name, "model");
        let ctx = loader.import("context").expect("builtin context missing");
        assert!(ctx.type_decl("Context").is_some());
        assert!(loader.warnings().is_empty());
    }

    #[test]
    fn test_mixed_packages_and_duplicates() {
        let dir = module_dir();
        write(dir.path(), "p/a.go", "package p\n\ntype T int\n");
        write(dir.path(), "p/b.go", "package q\n\ntype U int\n");
        write(dir.path(), "p/c.go", "package p\n\ntype T string\n");
        let mut loader = Loader::new(config()).expect("Failed to create loader");
        let target = dir.path().join("p");
        let pkg = loader
            .load_target(target.to_str().expect("utf8 path"))
            .expect("Failed to load");

        assert_eq!(pkg.files.len(), 2);
        assert!(loader
            .warnings()
            .iter()
            .any(|w| matches!(w, LoadWarning::MixedPackages { skipped, .. } if skipped == "q")));
        assert!(loader
            .warnings()
            .iter()
            .any(|w| matches!(w, LoadWarning::Duplicate { name, .. } if name == "T")));
    }

    #[test]
    fn test_fatal_load_errors() {
        let mut loader = Loader::new(config()).expect("Failed to create loader");
        assert!(matches!(
            loader.load_target("./definitely/not/here"),
            Err(LoadError::DirNotFound { .. })
        ));

        let dir = module_dir();
        write(dir.path(), "empty/readme.txt", "nothing here");
        let empty = dir.path().join("empty");
        assert!(matches!(
            loader.load_target(empty.to_str().expect("utf8 path")),
            Err(LoadError::NoGoFiles { .. })
        ));

        let no_module = tempfile::tempdir().expect("Failed to create temp dir");
        write(no_module.path(), "x.go", "package x\n");
        assert!(matches!(
            loader.load_target(no_module.path().to_str().expect("utf8 path")),
            Err(LoadError::NoModule { .. })
        ));
    }

    #[test]
    fn test_recursive_pattern_must_match_one_package() {
        let dir = module_dir();
        write(dir.path(), "a/a.go", "package a\n");
        write(dir.path(), "a/b/b.go", "package b\n");
        let mut loader = Loader::new(config()).expect("Failed to create loader");
        let pattern = format!("{}/a/...", dir.path().display());
        assert!(matches!(
            loader.load_target(&pattern),
            Err(LoadError::MultiplePackages { count: 2, .. })
        ));
    }
}
