//! Parser entry point.

use crate::build::BuildContext;
use crate::error::{LoadError, LoadWarning, ParseError};
use crate::loader::{GoPackage, Loader, LoaderConfig};
use crate::object::{interface_target, kind_name, struct_interface};
use crate::types::TypeParser;
use std::path::PathBuf;
use std::rc::Rc;
use stubgen_model::{Package, PackageMap, PkgInfo, Type};
use tracing::debug;

/// Parser settings.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Names of the types to extract; exactly one is supported.
    pub targets: Vec<String>,
    /// Abort when loading produced warnings.
    pub stop_on_load_error: bool,
    /// Go installation; `None` disables `$GOROOT` lookups.
    pub goroot: Option<PathBuf>,
    /// Module cache; `None` disables module cache lookups.
    pub mod_cache: Option<PathBuf>,
    /// Target platform.
    pub build: BuildContext,
}

impl ParserConfig {
    /// Creates settings for `targets`, locating Go from the environment.
    #[must_use]
    pub fn new(targets: Vec<String>) -> Self {
        let loader = LoaderConfig::default();
        Self {
            targets,
            stop_on_load_error: false,
            goroot: loader.goroot,
            mod_cache: loader.mod_cache,
            build: loader.build,
        }
    }

    /// Sets whether load warnings abort loading.
    #[must_use]
    pub fn with_stop_on_load_error(mut self, stop: bool) -> Self {
        self.stop_on_load_error = stop;
        self
    }

    fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            stop_on_load_error: self.stop_on_load_error,
            goroot: self.goroot.clone(),
            mod_cache: self.mod_cache.clone(),
            build: self.build.clone(),
            builtin_stdlib: true,
        }
    }
}

/// Loads a Go package and extracts the target type from it.
#[derive(Debug)]
pub struct Parser {
    config: ParserConfig,
    loader: Option<Loader>,
    target: Option<Rc<GoPackage>>,
}

impl Parser {
    /// Creates a parser.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            loader: None,
            target: None,
        }
    }

    /// Loads the package named by `pattern`: a directory or an import path.
    ///
    /// # Errors
    /// Returns `LoadError` if the package cannot be loaded, or if loading
    /// produced warnings and `stop_on_load_error` is set.
    pub fn load_package(&mut self, pattern: &str) -> Result<(), LoadError> {
        let mut loader = Loader::new(self.config.loader_config())?;
        let target = loader.load_target(pattern)?;
        debug!("loaded package {} from '{}'", target.path, pattern);
        self.target = Some(target);
        self.loader = Some(loader);
        Ok(())
    }

    /// Returns the warnings collected while loading.
    #[must_use]
    pub fn warnings(&self) -> &[LoadWarning] {
        self.loader.as_ref().map(Loader::warnings).unwrap_or_default()
    }

    /// Extracts the target type of the loaded package.
    ///
    /// # Errors
    /// Returns `ParseError` if no package is loaded, the number of targets is
    /// not one, the target is missing or is neither an interface nor a struct,
    /// or one of its types cannot be represented.
    pub fn parse(&mut self) -> Result<Package, ParseError> {
        let (Some(loader), Some(target)) = (self.loader.as_mut(), self.target.clone()) else {
            return Err(ParseError::NotLoaded);
        };
        let [name] = self.config.targets.as_slice() else {
            return Err(ParseError::TargetCount {
                count: self.config.targets.len(),
            });
        };

        let mut dependencies = PackageMap::new(&target.name, &target.path);
        for path in target.import_paths() {
            if path == "C" {
                continue;
            }
            let pkg_name = loader.package_name(&path);
            dependencies.add(&path, PkgInfo::new(pkg_name, &path, ""));
        }

        let mut package = Package {
            name: target.name.clone(),
            path: target.path.clone(),
            dependencies,
            ..Package::default()
        };

        let mut tp = TypeParser::new(loader);
        if target.type_decl(name).is_none() {
            return Err(ParseError::NotFound { name: name.clone() });
        }
        let ty = tp.resolve_decl(&target, name, Vec::new())?;
        let Type::Named(named) = &ty else {
            return Err(ParseError::Unsupported {
                name: name.clone(),
                kind: kind_name(&ty).to_string(),
            });
        };
        let underlying = named
            .id
            .and_then(|id| tp.arena().get(id))
            .and_then(|def| def.underlying.clone());
        match underlying {
            Some(Type::Interface(_)) => {
                let iface = interface_target(&tp, target.info(), name, named)?;
                debug!("{} has {} methods", name, iface.methods.len());
                package.interfaces.push(iface);
            }
            Some(Type::Struct(_)) => {
                let iface = struct_interface(&mut tp, target.info(), name, named)?;
                debug!("{} has {} exported methods", name, iface.methods.len());
                package.interfaces.push(iface);
            }
            Some(other) => {
                return Err(ParseError::Unsupported {
                    name: name.clone(),
                    kind: kind_name(&other).to_string(),
                });
            }
            None => {
                return Err(ParseError::Unsupported {
                    name: name.clone(),
                    kind: "opaque type".to_string(),
                });
            }
        }

        package.arena = tp.into_arena();
        Ok(package)
    }
}
