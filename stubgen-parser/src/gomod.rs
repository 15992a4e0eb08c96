//! `go.mod` handling and import path resolution.

use crate::error::LoadError;
use std::path::{Path, PathBuf};

/// A module requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    /// Module path.
    pub path: String,
    /// Version.
    pub version: String,
}

/// A `replace` directive pointing at a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    /// Replaced module path.
    pub path: String,
    /// Replacement directory, relative to the module root when not absolute.
    pub dir: PathBuf,
}

/// The main module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Module path from the `module` directive.
    pub path: String,
    /// Directory containing `go.mod`.
    pub root: PathBuf,
    /// Requirements.
    pub requires: Vec<Require>,
    /// Local replacements.
    pub replaces: Vec<Replace>,
}

impl GoModule {
    /// Finds the module enclosing `dir` by walking up to the nearest `go.mod`.
    ///
    /// # Errors
    /// Returns `LoadError::NoModule` when no `go.mod` exists, or an I/O or
    /// syntax error when it cannot be read.
    pub fn find(dir: &Path) -> Result<Self, LoadError> {
        let start = dir
            .canonicalize()
            .map_err(|e| LoadError::io(dir, e))?;
        let mut current = Some(start.as_path());
        while let Some(candidate) = current {
            let mod_file = candidate.join("go.mod");
            if mod_file.is_file() {
                let contents =
                    std::fs::read_to_string(&mod_file).map_err(|e| LoadError::io(&mod_file, e))?;
                return Self::parse(&contents, candidate, &mod_file);
            }
            current = candidate.parent();
        }
        Err(LoadError::NoModule { path: start })
    }

    /// Parses the contents of a `go.mod` file located in `root`.
    ///
    /// # Errors
    /// Returns `LoadError::InvalidModFile` when there is no `module` directive.
    pub fn parse(contents: &str, root: &Path, mod_file: &Path) -> Result<Self, LoadError> {
        let mut module = None;
        let mut requires = Vec::new();
        let mut replaces = Vec::new();
        let mut block: Option<&str> = None;

        for raw in contents.lines() {
            let line = raw.split("//").next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            if let Some(kind) = block {
                if line == ")" {
                    block = None;
                } else {
                    read_directive(kind, line, &mut requires, &mut replaces);
                }
                continue;
            }

            let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();
            match keyword {
                "module" => module = Some(unquote_mod(rest)),
                "require" | "replace" if rest == "(" => block = Some(keyword),
                "require" | "replace" => read_directive(keyword, rest, &mut requires, &mut replaces),
                _ => {}
            }
        }

        let path = module.ok_or_else(|| LoadError::InvalidModFile {
            path: mod_file.to_path_buf(),
            message: "missing module directive".to_string(),
        })?;
        Ok(Self {
            path,
            root: root.to_path_buf(),
            requires,
            replaces,
        })
    }

    /// Returns the import path of a directory inside the module.
    #[must_use]
    pub fn import_path_of(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if rel.is_empty() {
            Some(self.path.clone())
        } else {
            Some(format!("{}/{}", self.path, rel))
        }
    }

    /// Returns the directory of an import path that lives in the main module.
    #[must_use]
    pub fn local_dir(&self, import_path: &str) -> Option<PathBuf> {
        let rest = strip_module(import_path, &self.path)?;
        Some(join_rel(&self.root, rest))
    }

    /// Returns candidate directories for an import path outside the main module,
    /// in lookup order: local replacement, vendor directory, module cache.
    #[must_use]
    pub fn dependency_dirs(&self, import_path: &str, mod_cache: Option<&Path>) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some((replace, rest)) = longest_match(&self.replaces, import_path, |r| r.path.as_str()) {
            let base = if replace.dir.is_absolute() {
                replace.dir.clone()
            } else {
                self.root.join(&replace.dir)
            };
            dirs.push(join_rel(&base, rest));
        }
        dirs.push(join_rel(&self.root.join("vendor"), import_path));
        if let (Some(cache), Some((req, rest))) = (
            mod_cache,
            longest_match(&self.requires, import_path, |r| r.path.as_str()),
        ) {
            let module_dir = format!("{}@{}", escape_module_path(&req.path), req.version);
            dirs.push(join_rel(&cache.join(module_dir), rest));
        }
        dirs
    }
}

fn read_directive(kind: &str, line: &str, requires: &mut Vec<Require>, replaces: &mut Vec<Replace>) {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match kind {
        "require" => {
            if let [path, version, ..] = fields.as_slice() {
                requires.push(Require {
                    path: unquote_mod(path),
                    version: (*version).to_string(),
                });
            }
        }
        "replace" => {
            let Some(arrow) = fields.iter().position(|f| *f == "=>") else {
                return;
            };
            let (Some(from), Some(to)) = (fields.first(), fields.get(arrow + 1)) else {
                return;
            };
            // only directory replacements can be read without the module cache
            if to.starts_with("./") || to.starts_with("../") || to.starts_with('/') {
                replaces.push(Replace {
                    path: unquote_mod(from),
                    dir: PathBuf::from(unquote_mod(to)),
                });
            }
        }
        _ => {}
    }
}

fn unquote_mod(s: &str) -> String {
    s.trim().trim_matches('"').to_string()
}

fn strip_module<'a>(import_path: &'a str, module: &str) -> Option<&'a str> {
    if import_path == module {
        return Some("");
    }
    import_path
        .strip_prefix(module)
        .and_then(|rest| rest.strip_prefix('/'))
}

fn longest_match<'a, 'p, T>(
    items: &'a [T],
    import_path: &'p str,
    key: impl Fn(&T) -> &str,
) -> Option<(&'a T, &'p str)> {
    items
        .iter()
        .filter_map(|item| strip_module(import_path, key(item)).map(|rest| (item, rest)))
        .max_by_key(|(item, _)| key(*item).len())
}

fn join_rel(base: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|part| !part.is_empty())
        .fold(base.to_path_buf(), |dir, part| dir.join(part))
}

/// Escapes upper-case letters the way the module cache stores paths: `!x`.
#[must_use]
pub fn escape_module_path(path: &str) -> String {
    let mut output = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            output.push('!');
            output.push(c.to_ascii_lowercase());
        } else {
            output.push(c);
        }
    }
    output
}

/// Locates the module cache from `GOMODCACHE`, `GOPATH` or `$HOME/go`.
#[must_use]
pub fn mod_cache_from_env() -> Option<PathBuf> {
    if let Some(cache) = std::env::var_os("GOMODCACHE").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(cache));
    }
    if let Some(gopath) = std::env::var_os("GOPATH").filter(|v| !v.is_empty()) {
        let first = std::env::split_paths(&gopath).next()?;
        return Some(first.join("pkg").join("mod"));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join("go").join("pkg").join("mod"))
}

/// Locates `$GOROOT`.
#[must_use]
pub fn goroot_from_env() -> Option<PathBuf> {
    std::env::var_os("GOROOT")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            let default = PathBuf::from("/usr/local/go");
            default.join("src").is_dir().then_some(default)
        })
}

/// Guesses a package name from its import path.
///
/// Takes the last path element, skipping a `/vN` major version suffix,
/// trimming a `go-` prefix and anything after the first `.` or `-`.
#[must_use]
pub fn guess_package_name(import_path: &str) -> String {
    let mut elems: Vec<&str> = import_path.split('/').filter(|e| !e.is_empty()).collect();
    if elems.len() > 1 && is_major_version(elems[elems.len() - 1]) {
        elems.pop();
    }
    let last = elems.last().copied().unwrap_or(import_path);
    let last = last.strip_prefix("go-").unwrap_or(last);
    let name = last.split(['.', '-']).next().unwrap_or(last);
    if name.is_empty() {
        last.to_string()
    } else {
        name.to_string()
    }
}

fn is_major_version(elem: &str) -> bool {
    elem.strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GO_MOD: &str = r#"module example.com/app // main module

go 1.22

require (
	github.com/Foo/bar v1.2.3
	golang.org/x/sync v0.7.0 // indirect
)

require gopkg.in/yaml.v3 v3.0.1

replace example.com/lib => ../lib
replace github.com/other/x => github.com/fork/x v1.0.0
"#;

    fn module() -> GoModule {
        GoModule::parse(GO_MOD, Path::new("/work/app"), Path::new("/work/app/go.mod"))
            .expect("Failed to parse go.mod")
    }

    #[test]
    fn test_parse_go_mod() {
        let m = module();
        assert_eq!(m.path, "example.com/app");
        assert_eq!(m.requires.len(), 3);
        assert_eq!(m.requires[1].path, "golang.org/x/sync");
        assert_eq!(m.replaces.len(), 1);
        assert_eq!(m.replaces[0].dir, PathBuf::from("../lib"));
    }

    #[test]
    fn test_missing_module_directive() {
        let err = GoModule::parse("go 1.22\n", Path::new("/x"), Path::new("/x/go.mod"));
        assert!(matches!(err, Err(LoadError::InvalidModFile { .. })));
    }

    #[test]
    fn test_local_and_import_paths() {
        let m = module();
        assert_eq!(
            m.local_dir("example.com/app/internal/store"),
            Some(PathBuf::from("/work/app/internal/store"))
        );
        assert_eq!(m.local_dir("example.com/app"), Some(PathBuf::from("/work/app")));
        assert_eq!(m.local_dir("example.com/application"), None);
        assert_eq!(
            m.import_path_of(Path::new("/work/app/pkg/api")),
            Some("example.com/app/pkg/api".to_string())
        );
    }

    #[test]
    fn test_dependency_dirs() {
        let m = module();
        let dirs = m.dependency_dirs("github.com/Foo/bar/sub", Some(Path::new("/cache")));
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/work/app/vendor/github.com/Foo/bar/sub"),
                PathBuf::from("/cache/github.com/!foo/bar@v1.2.3/sub"),
            ]
        );
        let replaced = m.dependency_dirs("example.com/lib/util", None);
        assert_eq!(replaced[0], PathBuf::from("/work/app/../lib/util"));
    }

    #[test]
    fn test_guess_package_name() {
        assert_eq!(guess_package_name("fmt"), "fmt");
        assert_eq!(guess_package_name("net/http"), "http");
        assert_eq!(guess_package_name("gopkg.in/yaml.v3"), "yaml");
        assert_eq!(guess_package_name("github.com/mattn/go-isatty"), "isatty");
        assert_eq!(guess_package_name("github.com/org/lib/v2"), "lib");
        assert_eq!(guess_package_name("example.com/foo-bar"), "foo");
    }
}
