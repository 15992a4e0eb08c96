//! Go source printing for types.
//!
//! Output follows gofmt spacing so that generated files need no further
//! formatting: struct fields are column-aligned, parameter lists are comma
//! and space separated, and nested blocks are tab indented.

use crate::contents::Func;
use crate::pkgmap::PackageMap;
use crate::types::{Constraint, Field, InterfaceType, Parameter, Signature, StructType, Type, TypeParam};

impl Type {
    /// Renders the type as Go source.
    ///
    /// `my_pkg_path` is the import path of the file being generated; named
    /// types from that package are printed without a qualifier. Other
    /// packages are qualified with their alias from `pm`.
    #[must_use]
    pub fn render(&self, my_pkg_path: &str, pm: &PackageMap) -> String {
        match self {
            Self::Basic(name) => name.clone(),
            Self::Array { len, elem } => {
                let elem = elem.render(my_pkg_path, pm);
                match len {
                    Some(len) => format!("[{len}]{elem}"),
                    None => format!("[]{elem}"),
                }
            }
            Self::Chan { dir, elem } => {
                format!("{}{}", dir.prefix(), elem.render(my_pkg_path, pm))
            }
            Self::Interface(iface) => render_interface_literal(iface, my_pkg_path, pm),
            Self::Map { key, value } => format!(
                "map[{}]{}",
                key.render(my_pkg_path, pm),
                value.render(my_pkg_path, pm)
            ),
            Self::Named(named) => {
                let mut output = match &named.pkg {
                    None => named.name.clone(),
                    Some(pkg) => {
                        let info = pm.get(&pkg.path).unwrap_or(pkg);
                        format!("{}{}", info.prefix(my_pkg_path), named.name)
                    }
                };
                if !named.type_args.is_empty() {
                    output.push('[');
                    output.push_str(&render_type_list(&named.type_args, my_pkg_path, pm));
                    output.push(']');
                }
                output
            }
            Self::Pointer(elem) => format!("*{}", elem.render(my_pkg_path, pm)),
            Self::Signature(sig) => format!(
                "func{}{}",
                render_params(sig, my_pkg_path, pm),
                render_results(sig, my_pkg_path, pm)
            ),
            Self::Struct(st) => render_struct_literal(st, my_pkg_path, pm),
            Self::TypeParam(param) => param.name.clone(),
            Self::Constraint(constraint) => render_constraint(constraint, my_pkg_path, pm),
        }
    }
}

impl Parameter {
    /// Renders `name type`, or only the type when unnamed.
    #[must_use]
    pub fn render(&self, my_pkg_path: &str, pm: &PackageMap) -> String {
        let ty = self.ty.render(my_pkg_path, pm);
        if self.name.is_empty() {
            ty
        } else {
            format!("{} {}", self.name, ty)
        }
    }
}

fn render_type_list(types: &[Type], my_pkg_path: &str, pm: &PackageMap) -> String {
    types
        .iter()
        .map(|t| t.render(my_pkg_path, pm))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_constraint(constraint: &Constraint, my_pkg_path: &str, pm: &PackageMap) -> String {
    match constraint {
        Constraint::Any => "any".to_string(),
        Constraint::Comparable => "comparable".to_string(),
        Constraint::Union(terms) => terms
            .iter()
            .map(|term| {
                let ty = term.ty.render(my_pkg_path, pm);
                if term.tilde { format!("~{ty}") } else { ty }
            })
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

/// Renders a parameter list: `(a int, b ...string)`.
pub(crate) fn render_params(sig: &Signature, my_pkg_path: &str, pm: &PackageMap) -> String {
    let mut parts: Vec<String> = sig
        .params
        .iter()
        .map(|p| p.render(my_pkg_path, pm))
        .collect();
    if let Some(variadic) = &sig.variadic {
        let elem = variadic.ty.render(my_pkg_path, pm);
        if variadic.name.is_empty() {
            parts.push(format!("...{elem}"));
        } else {
            parts.push(format!("{} ...{}", variadic.name, elem));
        }
    }
    format!("({})", parts.join(", "))
}

/// Renders results with a leading space: ` int`, ` (int, error)` or nothing.
pub(crate) fn render_results(sig: &Signature, my_pkg_path: &str, pm: &PackageMap) -> String {
    match sig.results.as_slice() {
        [] => String::new(),
        [single] if single.name.is_empty() => format!(" {}", single.ty.render(my_pkg_path, pm)),
        results => {
            let parts: Vec<String> = results.iter().map(|r| r.render(my_pkg_path, pm)).collect();
            format!(" ({})", parts.join(", "))
        }
    }
}

/// Renders a type parameter declaration list with constraints: `[K comparable, V any]`.
pub(crate) fn render_type_params_decl(
    params: &[TypeParam],
    my_pkg_path: &str,
    pm: &PackageMap,
) -> String {
    if params.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = params
        .iter()
        .map(|p| match &p.constraint {
            Some(c) => format!("{} {}", p.name, c.render(my_pkg_path, pm)),
            None => format!("{} any", p.name),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Renders the `Name(args) results` form used inside interfaces.
pub(crate) fn render_method_spec(func: &Func, my_pkg_path: &str, pm: &PackageMap) -> String {
    format!(
        "{}{}{}",
        func.name,
        render_params(&func.signature, my_pkg_path, pm),
        render_results(&func.signature, my_pkg_path, pm)
    )
}

fn render_interface_literal(iface: &InterfaceType, my_pkg_path: &str, pm: &PackageMap) -> String {
    let params = render_type_params_decl(&iface.type_params, my_pkg_path, pm);
    let mut items: Vec<String> = iface
        .embeddeds
        .iter()
        .map(|e| e.render(my_pkg_path, pm))
        .collect();
    items.extend(
        iface
            .methods
            .iter()
            .map(|m| render_method_spec(m, my_pkg_path, pm)),
    );
    if items.is_empty() {
        format!("interface{params}{{}}")
    } else {
        format!("interface{params}{{ {} }}", items.join("; "))
    }
}

fn render_struct_literal(st: &StructType, my_pkg_path: &str, pm: &PackageMap) -> String {
    if st.fields.is_empty() {
        return "struct{}".to_string();
    }
    format!(
        "struct {{\n{}\n}}",
        render_fields_block(&st.fields, my_pkg_path, pm)
    )
}

/// Renders struct fields one per line, tab indented and column aligned.
pub(crate) fn render_fields_block(fields: &[Field], my_pkg_path: &str, pm: &PackageMap) -> String {
    let rows: Vec<Vec<String>> = fields
        .iter()
        .map(|f| {
            let mut row = Vec::with_capacity(3);
            if !f.is_embedded() {
                row.push(f.name.clone());
            }
            row.push(f.ty.render(my_pkg_path, pm));
            if let Some(tag) = &f.tag {
                row.push(quote_tag(tag));
            }
            row
        })
        .collect();
    align_rows(&rows, "\t")
}

/// Quotes a struct tag, preferring a raw string literal.
#[must_use]
pub fn quote_tag(tag: &str) -> String {
    if tag.contains('`') {
        let escaped = tag.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        format!("`{tag}`")
    }
}

/// Lays out rows of cells gofmt-style.
///
/// Every row is printed on its own line behind `indent`. A cell that is
/// followed by another cell is padded to the widest cell of the same column
/// among the neighbouring rows that also continue past that column. Rows
/// with a multi-line cell are printed unaligned and end the current run.
#[must_use]
pub fn align_rows(rows: &[Vec<String>], indent: &str) -> String {
    let multiline: Vec<bool> = rows
        .iter()
        .map(|row| row.iter().any(|c| c.contains('\n')))
        .collect();
    let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);

    // widths[r][c]: padded width of cell c in row r, when it is aligned
    let mut widths = vec![vec![0usize; max_cols]; rows.len()];
    for col in 0..max_cols {
        let mut start = 0;
        while start < rows.len() {
            let aligned = |r: usize| !multiline[r] && rows[r].len() > col + 1;
            if !aligned(start) {
                start += 1;
                continue;
            }
            let mut end = start;
            while end < rows.len() && aligned(end) {
                end += 1;
            }
            let width = (start..end)
                .map(|r| rows[r][col].chars().count())
                .max()
                .unwrap_or(0);
            for row_widths in &mut widths[start..end] {
                row_widths[col] = width;
            }
            start = end;
        }
    }

    rows.iter()
        .enumerate()
        .map(|(r, row)| {
            let mut line = String::from(indent);
            for (c, cell) in row.iter().enumerate() {
                line.push_str(&cell.replace('\n', &format!("\n{indent}")));
                if c + 1 < row.len() {
                    let pad = widths[r][c].saturating_sub(cell.chars().count());
                    line.push_str(&" ".repeat(pad + 1));
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indents every non-empty line of `body` with one tab.
#[must_use]
pub fn indent_block(body: &str) -> String {
    body.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("\t{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkgmap::PkgInfo;
    use crate::types::{ChanDir, NamedRef, UnionTerm};

    const MY: &str = "example.com/sample";

    fn pm() -> PackageMap {
        let mut pm = PackageMap::new("sample", MY);
        pm.add("io", PkgInfo::new("io", "io", ""));
        pm.add("math/rand", PkgInfo::new("rand", "math/rand", "mrand"));
        pm
    }

    fn named(path: &str, pkg: &str, name: &str) -> Type {
        Type::Named(NamedRef::new(Some(PkgInfo::new(pkg, path, "")), name))
    }

    #[test]
    fn test_render_composites() {
        let pm = pm();
        assert_eq!(Type::slice(Type::basic("int")).render(MY, &pm), "[]int");
        assert_eq!(Type::array(4, Type::basic("byte")).render(MY, &pm), "[4]byte");
        assert_eq!(
            Type::map(Type::basic("string"), Type::pointer(Type::basic("int"))).render(MY, &pm),
            "map[string]*int"
        );
        assert_eq!(
            Type::chan(ChanDir::RecvOnly, Type::basic("error")).render(MY, &pm),
            "<-chan error"
        );
        assert_eq!(
            Type::chan(ChanDir::SendOnly, Type::basic("int")).render(MY, &pm),
            "chan<- int"
        );
        assert_eq!(
            Type::chan(ChanDir::SendRecv, Type::Struct(StructType::default())).render(MY, &pm),
            "chan struct{}"
        );
    }

    #[test]
    fn test_render_named_qualifiers() {
        let pm = pm();
        assert_eq!(named("io", "io", "Reader").render(MY, &pm), "io.Reader");
        assert_eq!(named(MY, "sample", "User").render(MY, &pm), "User");
        assert_eq!(named("math/rand", "rand", "Rand").render(MY, &pm), "mrand.Rand");
        assert_eq!(
            Type::Named(NamedRef::new(None, "error")).render(MY, &pm),
            "error"
        );
        // packages missing from the map fall back to their own info
        assert_eq!(named("net/http", "http", "Client").render(MY, &pm), "http.Client");
    }

    #[test]
    fn test_render_generic_named_omits_constraints() {
        let pm = pm();
        let t = TypeParam::new("T", Some(Type::Constraint(Constraint::Any)), 0);
        let ty = Type::Named(
            NamedRef::new(Some(PkgInfo::new("sample", MY, "")), "List")
                .with_type_args(vec![t.as_type_arg(), Type::basic("string")]),
        );
        assert_eq!(ty.render(MY, &pm), "List[T, string]");
    }

    #[test]
    fn test_render_signature() {
        let pm = pm();
        let sig = Signature::new(
            vec![Parameter::new("prefix", Type::basic("string"))],
            Some(Parameter::new("items", Type::basic("int"))),
            vec![
                Parameter::unnamed(Type::basic("int")),
                Parameter::unnamed(Type::basic("error")),
            ],
        );
        assert_eq!(
            Type::signature(sig.clone()).render(MY, &pm),
            "func(prefix string, items ...int) (int, error)"
        );
        assert_eq!(
            Type::signature(sig.without_names()).render(MY, &pm),
            "func(string, ...int) (int, error)"
        );

        let single = Signature::new(vec![], None, vec![Parameter::new("n", Type::basic("int"))]);
        assert_eq!(Type::signature(single).render(MY, &pm), "func() (n int)");

        let only_variadic = Signature::new(vec![], Some(Parameter::unnamed(Type::basic("any"))), vec![]);
        assert_eq!(Type::signature(only_variadic).render(MY, &pm), "func(...any)");
    }

    #[test]
    fn test_render_struct_aligned() {
        let pm = pm();
        let st = StructType::new(vec![
            Field::new("ID", Type::basic("int")).with_tag("json:\"id\""),
            Field::new("Name", Type::basic("string")).with_tag("json:\"name\""),
            Field::embedded(named("io", "io", "Reader")),
            Field::new("X", Type::basic("float64")),
        ]);
        let expected = "struct {\n\
                        \tID   int    `json:\"id\"`\n\
                        \tName string `json:\"name\"`\n\
                        \tio.Reader\n\
                        \tX float64\n\
                        }";
        assert_eq!(Type::Struct(st).render(MY, &pm), expected);
    }

    #[test]
    fn test_render_nested_struct_indents() {
        let pm = pm();
        let inner = StructType::new(vec![Field::new("A", Type::basic("int"))]);
        let outer = StructType::new(vec![Field::new("In", Type::Struct(inner))]);
        assert_eq!(
            Type::Struct(outer).render(MY, &pm),
            "struct {\n\tIn struct {\n\t\tA int\n\t}\n}"
        );
    }

    #[test]
    fn test_render_interface_literal() {
        let pm = pm();
        assert_eq!(Type::empty_interface().render(MY, &pm), "interface{}");

        let close = Func::new(
            "Close",
            Signature::new(vec![], None, vec![Parameter::unnamed(Type::basic("error"))]),
            "",
        );
        let iface = InterfaceType::new(vec![named("io", "io", "Reader")], vec![close]);
        assert_eq!(
            Type::Interface(iface.clone()).render(MY, &pm),
            "interface{ io.Reader; Close() error }"
        );

        let generic = InterfaceType::generic(
            iface.embeddeds,
            iface.methods,
            vec![TypeParam::new("T", Some(Type::Constraint(Constraint::Comparable)), 0)],
        );
        assert_eq!(
            Type::Interface(generic).render(MY, &pm),
            "interface[T comparable]{ io.Reader; Close() error }"
        );
    }

    #[test]
    fn test_render_union_constraint() {
        let pm = pm();
        let union = Constraint::Union(vec![
            UnionTerm {
                tilde: true,
                ty: Type::basic("int"),
            },
            UnionTerm {
                tilde: false,
                ty: Type::basic("float64"),
            },
        ]);
        assert_eq!(union.into_type().render(MY, &pm), "~int | float64");
    }

    #[test]
    fn test_quote_tag_with_backtick() {
        assert_eq!(quote_tag("a:\"b\""), "`a:\"b\"`");
        assert_eq!(quote_tag("x`y"), "\"x`y\"");
    }

    #[test]
    fn test_indent_block() {
        assert_eq!(indent_block("a\n\nb"), "\ta\n\n\tb");
    }
}
