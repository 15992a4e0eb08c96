//! Build constraints.
//!
//! Decides which files of a package directory take part in the build for the
//! target platform: `_test.go` files are never included, `_GOOS`/`_GOARCH`
//! file name suffixes must match, and `//go:build` (or legacy `// +build`)
//! expressions must evaluate to true.

/// Operating systems recognised in file name suffixes.
pub const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures recognised in file name suffixes.
pub const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Newest `go1.N` release tag considered satisfied.
const MAX_GO_MINOR: u32 = 30;

/// Target platform for file selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Target operating system, Go spelling.
    pub goos: String,
    /// Target architecture, Go spelling.
    pub goarch: String,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::from_env()
    }
}

impl BuildContext {
    /// Creates a context for the given platform.
    #[must_use]
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
        }
    }

    /// Uses `GOOS`/`GOARCH` when set, the host platform otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        let goos = std::env::var("GOOS")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| host_goos().to_string());
        let goarch = std::env::var("GOARCH")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| host_goarch().to_string());
        Self { goos, goarch }
    }

    /// Returns true if a file with this name may be part of the build.
    #[must_use]
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let Some(stem) = file_name.strip_suffix(".go") else {
            return false;
        };
        if stem.ends_with("_test") || file_name.starts_with('.') || file_name.starts_with('_') {
            return false;
        }

        let parts: Vec<&str> = stem.split('_').collect();
        let n = parts.len();
        if n >= 3 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_tag(parts[n - 2]) && parts[n - 1] == self.goarch;
        }
        if n >= 2 {
            let last = parts[n - 1];
            if KNOWN_OS.contains(&last) {
                return self.matches_tag(last);
            }
            if KNOWN_ARCH.contains(&last) {
                return last == self.goarch;
            }
        }
        true
    }

    /// Returns true if a single build tag is satisfied.
    #[must_use]
    pub fn matches_tag(&self, tag: &str) -> bool {
        if tag == self.goos || tag == self.goarch || tag == "gc" {
            return true;
        }
        match tag {
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            // android implies linux, ios implies darwin, illumos implies solaris
            "linux" => self.goos == "android",
            "darwin" => self.goos == "ios",
            "solaris" => self.goos == "illumos",
            _ => tag
                .strip_prefix("go1.")
                .and_then(|minor| minor.parse::<u32>().ok())
                .is_some_and(|minor| minor <= MAX_GO_MINOR),
        }
    }

    /// Evaluates a `//go:build` expression.
    ///
    /// # Errors
    /// Returns a description of the syntax problem for malformed expressions.
    pub fn eval_go_build(&self, expr: &str) -> Result<bool, String> {
        let tokens = tokenize(expr)?;
        let mut parser = ExprParser {
            tokens: &tokens,
            pos: 0,
            ctx: self,
        };
        let value = parser.or()?;
        if parser.pos != tokens.len() {
            return Err(format!("unexpected token in build expression '{expr}'"));
        }
        Ok(value)
    }

    /// Evaluates one legacy `// +build` line: space-separated alternatives of
    /// comma-separated conjunctions.
    #[must_use]
    pub fn eval_plus_build(&self, line: &str) -> bool {
        line.split_whitespace().any(|alternative| {
            alternative.split(',').all(|term| match term.strip_prefix('!') {
                Some(tag) => !self.matches_tag(tag),
                None => self.matches_tag(term),
            })
        })
    }
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Tag(String),
    Not,
    And,
    Or,
    Open,
    Close,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '&' | '|' => {
                chars.next();
                if chars.next() != Some(c) {
                    return Err(format!("expected '{c}{c}' in build expression '{expr}'"));
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut tag = String::new();
                while let Some(&t) = chars.peek() {
                    if t.is_alphanumeric() || t == '_' || t == '.' {
                        tag.push(t);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Tag(tag));
            }
            other => return Err(format!("unexpected '{other}' in build expression '{expr}'")),
        }
    }
    Ok(tokens)
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    ctx: &'a BuildContext,
}

impl ExprParser<'_> {
    fn or(&mut self) -> Result<bool, String> {
        let mut value = self.and()?;
        while self.tokens.get(self.pos) == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and()?;
            value = value || rhs;
        }
        Ok(value)
    }

    fn and(&mut self) -> Result<bool, String> {
        let mut value = self.not()?;
        while self.tokens.get(self.pos) == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.not()?;
            value = value && rhs;
        }
        Ok(value)
    }

    fn not(&mut self) -> Result<bool, String> {
        match self.tokens.get(self.pos) {
            Some(Token::Not) => {
                self.pos += 1;
                Ok(!self.not()?)
            }
            Some(Token::Open) => {
                self.pos += 1;
                let value = self.or()?;
                if self.tokens.get(self.pos) != Some(&Token::Close) {
                    return Err("missing ')' in build expression".to_string());
                }
                self.pos += 1;
                Ok(value)
            }
            Some(Token::Tag(tag)) => {
                self.pos += 1;
                Ok(self.ctx.matches_tag(tag))
            }
            _ => Err("unexpected end of build expression".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> BuildContext {
        BuildContext::new("linux", "amd64")
    }

    #[test]
    fn test_file_name_suffixes() {
        let ctx = linux();
        assert!(ctx.matches_file_name("store.go"));
        assert!(ctx.matches_file_name("store_linux.go"));
        assert!(ctx.matches_file_name("store_linux_amd64.go"));
        assert!(ctx.matches_file_name("store_amd64.go"));
        assert!(ctx.matches_file_name("user_service.go"));
        assert!(!ctx.matches_file_name("store_windows.go"));
        assert!(!ctx.matches_file_name("store_linux_arm64.go"));
        assert!(!ctx.matches_file_name("store_test.go"));
        assert!(!ctx.matches_file_name("_hidden.go"));
        assert!(!ctx.matches_file_name("notes.txt"));
    }

    #[test]
    fn test_go_build_expressions() {
        let ctx = linux();
        assert_eq!(ctx.eval_go_build("linux && amd64"), Ok(true));
        assert_eq!(ctx.eval_go_build("ignore"), Ok(false));
        assert_eq!(ctx.eval_go_build("!windows"), Ok(true));
        assert_eq!(ctx.eval_go_build("(darwin || linux) && !386"), Ok(true));
        assert_eq!(ctx.eval_go_build("unix && go1.18"), Ok(true));
        assert_eq!(ctx.eval_go_build("windows || plan9"), Ok(false));
        assert!(ctx.eval_go_build("linux &").is_err());
        assert!(ctx.eval_go_build("(linux").is_err());
    }

    #[test]
    fn test_plus_build_lines() {
        let ctx = linux();
        assert!(ctx.eval_plus_build("linux darwin"));
        assert!(ctx.eval_plus_build("linux,amd64"));
        assert!(!ctx.eval_plus_build("ignore"));
        assert!(!ctx.eval_plus_build("linux,!amd64"));
    }
}
