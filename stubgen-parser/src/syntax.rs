//! Owned syntax model of Go source files.
//!
//! Files are parsed with tree-sitter and converted into plain data
//! structures holding only what type resolution needs: the package clause,
//! imports, type and constant declarations, and method declarations.
//! Function bodies and statements are skipped.

use crate::error::LoadError;
use std::fmt;
use tree_sitter::{Node, Parser};

/// Channel direction as written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDirExpr {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// Type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Identifier, optionally qualified and instantiated: `T`, `pkg.T`, `T[A, B]`.
    Name {
        /// Package qualifier.
        pkg: Option<String>,
        /// Identifier.
        name: String,
        /// Type arguments.
        args: Vec<TypeExpr>,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T`
    Array {
        /// Length expression.
        len: ConstExpr,
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        /// Key type.
        key: Box<TypeExpr>,
        /// Value type.
        value: Box<TypeExpr>,
    },
    /// Channel type.
    Chan {
        /// Direction.
        dir: ChanDirExpr,
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `func(...) ...`
    Func(Box<FuncExpr>),
    /// `struct { ... }`
    Struct(Vec<FieldDecl>),
    /// `interface { ... }`
    Interface(Vec<InterfaceElem>),
    /// Type set union, `~int | float64`.
    Union(Vec<UnionTermExpr>),
    /// Syntax the generator does not handle, with its source text.
    Unsupported(String),
}

impl TypeExpr {
    /// Creates an unqualified name without type arguments.
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Name {
            pkg: None,
            name: name.into(),
            args: Vec::new(),
        }
    }
}

/// One term of a union.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionTermExpr {
    /// `~` prefix present.
    pub tilde: bool,
    /// Term type.
    pub ty: TypeExpr,
}

/// Function signature as written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuncExpr {
    /// Parameters, excluding the variadic one.
    pub params: Vec<ParamDecl>,
    /// Variadic parameter; its type is the element type.
    pub variadic: Option<ParamDecl>,
    /// Results.
    pub results: Vec<ParamDecl>,
    /// A variadic parameter appeared before the last position.
    pub misplaced_variadic: bool,
}

/// Parameter or result.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    /// Name; empty when omitted.
    pub name: String,
    /// Type.
    pub ty: TypeExpr,
}

/// Struct field. An empty name marks an embedded field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Field type; embedded `*T` is a pointer.
    pub ty: TypeExpr,
    /// Unquoted tag.
    pub tag: Option<String>,
}

/// Element of an interface body.
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    /// Method specification.
    Method {
        /// Method name.
        name: String,
        /// Signature.
        signature: FuncExpr,
    },
    /// Embedded type or type-set term.
    Embed(TypeExpr),
}

/// Constant expression, limited to integer arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstExpr {
    /// Integer literal.
    Int(i128),
    /// `iota`
    Iota,
    /// Reference to a constant in package scope.
    Ident(String),
    /// Reference to a constant of an imported package.
    Qualified {
        /// Package qualifier.
        pkg: String,
        /// Constant name.
        name: String,
    },
    /// Unary operation.
    Unary {
        /// Operator token.
        op: String,
        /// Operand.
        operand: Box<ConstExpr>,
    },
    /// Binary operation.
    Binary {
        /// Operator token.
        op: String,
        /// Left operand.
        lhs: Box<ConstExpr>,
        /// Right operand.
        rhs: Box<ConstExpr>,
    },
    /// Anything else, with its source text.
    Unsupported(String),
}

impl fmt::Display for ConstExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Iota => f.write_str("iota"),
            Self::Ident(name) => f.write_str(name),
            Self::Qualified { pkg, name } => write!(f, "{pkg}.{name}"),
            Self::Unary { op, operand } => write!(f, "{op}{operand}"),
            Self::Binary { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Self::Unsupported(text) => f.write_str(text),
        }
    }
}

/// Import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name: an alias, `.` or `_`.
    pub alias: Option<String>,
    /// Import path.
    pub path: String,
}

/// Type parameter declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParamDecl {
    /// Parameter name.
    pub name: String,
    /// Constraint expression.
    pub constraint: TypeExpr,
}

/// `type Name[...] T` or `type Name = T`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Declared name.
    pub name: String,
    /// Type parameters.
    pub type_params: Vec<TypeParamDecl>,
    /// True for alias declarations.
    pub alias: bool,
    /// Defining type.
    pub ty: TypeExpr,
}

/// One constant name with its (possibly implicit) value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    /// Constant name.
    pub name: String,
    /// Value expression; repeated from the previous spec when omitted.
    pub value: Option<ConstExpr>,
    /// Value of `iota` for this spec.
    pub iota: i128,
}

/// Method receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverDecl {
    /// Base type name.
    pub type_name: String,
    /// Receiver is `*T`.
    pub pointer: bool,
    /// Receiver type parameter names, `T[K, V]`.
    pub type_params: Vec<String>,
}

/// Method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Receiver.
    pub receiver: ReceiverDecl,
    /// Method name.
    pub name: String,
    /// Signature.
    pub signature: FuncExpr,
}

/// Declarations of one Go source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    /// File name, for diagnostics.
    pub file_name: String,
    /// Package name.
    pub package: String,
    /// `//go:build` expression, if any.
    pub go_build: Option<String>,
    /// `// +build` lines, if any.
    pub plus_build: Vec<String>,
    /// Imports.
    pub imports: Vec<ImportSpec>,
    /// Type declarations.
    pub types: Vec<TypeDecl>,
    /// Constants.
    pub consts: Vec<ConstDecl>,
    /// Methods.
    pub methods: Vec<MethodDecl>,
    /// Positions of syntax errors, `line:column`.
    pub errors: Vec<String>,
}

/// Creates a tree-sitter parser configured for Go.
///
/// # Errors
/// Returns `LoadError::Grammar` if the grammar version is incompatible.
pub fn go_parser() -> Result<Parser, LoadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| LoadError::Grammar {
            message: e.to_string(),
        })?;
    Ok(parser)
}

/// Parses one Go source file.
///
/// Syntax errors do not abort parsing; their positions are recorded in
/// [`SourceFile::errors`] and the remaining declarations are still extracted.
///
/// # Errors
/// Returns `LoadError::Grammar` if tree-sitter produces no tree.
pub fn parse_source(
    parser: &mut Parser,
    file_name: &str,
    source: &str,
) -> Result<SourceFile, LoadError> {
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| LoadError::Grammar {
            message: format!("no syntax tree produced for {file_name}"),
        })?;
    let src = source.as_bytes();
    let root = tree.root_node();

    let mut file = SourceFile {
        file_name: file_name.to_string(),
        ..SourceFile::default()
    };
    if root.has_error() {
        collect_errors(root, &mut file.errors);
    }

    let mut seen_package = false;
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        match node.kind() {
            "comment" if !seen_package => read_build_comment(text(node, src), &mut file),
            "package_clause" => {
                seen_package = true;
                if let Some(ident) = named(node).into_iter().next() {
                    file.package = text(ident, src).to_string();
                }
            }
            "import_declaration" => read_imports(node, src, &mut file.imports),
            "type_declaration" => read_type_declaration(node, src, &mut file.types),
            "const_declaration" => read_const_declaration(node, src, &mut file.consts),
            "method_declaration" => {
                if let Some(method) = read_method(node, src) {
                    file.methods.push(method);
                }
            }
            _ => {}
        }
    }
    Ok(file)
}

/// Reads only the package clause.
#[must_use]
pub fn package_name(parser: &mut Parser, source: &str) -> Option<String> {
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    let mut cursor = root.walk();
    let clause = root
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_clause")?;
    let ident = named(clause).into_iter().next()?;
    Some(text(ident, source.as_bytes()).to_string())
}

fn text<'s>(node: Node<'_>, src: &'s [u8]) -> &'s str {
    node.utf8_text(src).unwrap_or_default()
}

/// Named children, comments excluded.
fn named(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

fn fields_named<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor)
        .filter(|n| n.is_named())
        .collect()
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token)
}

fn collect_errors(node: Node<'_>, errors: &mut Vec<String>) {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        errors.push(format!("{}:{}", pos.row + 1, pos.column + 1));
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, errors);
    }
}

fn read_build_comment(comment: &str, file: &mut SourceFile) {
    if let Some(expr) = comment.strip_prefix("//go:build ") {
        file.go_build = Some(expr.trim().to_string());
    } else if let Some(line) = comment
        .strip_prefix("//")
        .map(str::trim_start)
        .and_then(|c| c.strip_prefix("+build "))
    {
        file.plus_build.push(line.trim().to_string());
    }
}

/// Removes the quotes of a Go string literal and resolves simple escapes.
#[must_use]
pub fn unquote(literal: &str) -> String {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        return raw.to_string();
    }
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut output = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some('r') => output.push('\r'),
            Some(other) => output.push(other),
            None => output.push('\\'),
        }
    }
    output
}

fn read_imports(node: Node<'_>, src: &[u8], imports: &mut Vec<ImportSpec>) {
    for child in named(node) {
        match child.kind() {
            "import_spec" => {
                let Some(path) = child.child_by_field_name("path") else {
                    continue;
                };
                imports.push(ImportSpec {
                    alias: child
                        .child_by_field_name("name")
                        .map(|n| text(n, src).to_string()),
                    path: unquote(text(path, src)),
                });
            }
            "import_spec_list" => read_imports(child, src, imports),
            _ => {}
        }
    }
}

fn read_type_declaration(node: Node<'_>, src: &[u8], types: &mut Vec<TypeDecl>) {
    for spec in named(node) {
        let alias = match spec.kind() {
            "type_spec" => false,
            "type_alias" => true,
            _ => continue,
        };
        let (Some(name), Some(ty)) = (
            spec.child_by_field_name("name"),
            spec.child_by_field_name("type"),
        ) else {
            continue;
        };
        types.push(TypeDecl {
            name: text(name, src).to_string(),
            type_params: spec
                .child_by_field_name("type_parameters")
                .map(|list| read_type_params(list, src))
                .unwrap_or_default(),
            alias,
            ty: type_expr(ty, src),
        });
    }
}

fn read_type_params(list: Node<'_>, src: &[u8]) -> Vec<TypeParamDecl> {
    let mut params = Vec::new();
    for decl in named(list) {
        if decl.kind() != "type_parameter_declaration" {
            continue;
        }
        let constraint = decl
            .child_by_field_name("type")
            .map_or_else(|| TypeExpr::ident("any"), |c| constraint_expr(c, src));
        for name in fields_named(decl, "name") {
            params.push(TypeParamDecl {
                name: text(name, src).to_string(),
                constraint: constraint.clone(),
            });
        }
    }
    params
}

fn read_const_declaration(node: Node<'_>, src: &[u8], consts: &mut Vec<ConstDecl>) {
    let mut previous: Vec<ConstExpr> = Vec::new();
    let mut iota = 0i128;
    for spec in named(node) {
        if spec.kind() != "const_spec" {
            continue;
        }
        if let Some(list) = spec.child_by_field_name("value") {
            previous = named(list).into_iter().map(|e| const_expr(e, src)).collect();
        }
        for (i, name) in fields_named(spec, "name").into_iter().enumerate() {
            consts.push(ConstDecl {
                name: text(name, src).to_string(),
                value: previous.get(i).cloned(),
                iota,
            });
        }
        iota += 1;
    }
}

fn read_method(node: Node<'_>, src: &[u8]) -> Option<MethodDecl> {
    let receiver_list = node.child_by_field_name("receiver")?;
    let receiver_decl = named(receiver_list)
        .into_iter()
        .find(|n| n.kind() == "parameter_declaration")?;
    let mut receiver_type = receiver_decl.child_by_field_name("type")?;

    let mut pointer = false;
    while matches!(receiver_type.kind(), "pointer_type" | "parenthesized_type") {
        pointer |= receiver_type.kind() == "pointer_type";
        receiver_type = named(receiver_type).into_iter().next()?;
    }

    let (type_name, type_params) = match receiver_type.kind() {
        "generic_type" => {
            let base = receiver_type.child_by_field_name("type")?;
            let params = receiver_type
                .child_by_field_name("type_arguments")
                .map(|args| {
                    named(args)
                        .into_iter()
                        .map(|a| text(a, src).trim().to_string())
                        .collect()
                })
                .unwrap_or_default();
            (text(base, src).to_string(), params)
        }
        _ => (text(receiver_type, src).to_string(), Vec::new()),
    };

    Some(MethodDecl {
        receiver: ReceiverDecl {
            type_name,
            pointer,
            type_params,
        },
        name: text(node.child_by_field_name("name")?, src).to_string(),
        signature: func_expr(node, src),
    })
}

/// Converts a type node.
fn type_expr(node: Node<'_>, src: &[u8]) -> TypeExpr {
    match node.kind() {
        "type_identifier" | "identifier" | "field_identifier" => TypeExpr::ident(text(node, src)),
        "qualified_type" => match (
            node.child_by_field_name("package"),
            node.child_by_field_name("name"),
        ) {
            (Some(pkg), Some(name)) => TypeExpr::Name {
                pkg: Some(text(pkg, src).to_string()),
                name: text(name, src).to_string(),
                args: Vec::new(),
            },
            _ => TypeExpr::Unsupported(text(node, src).to_string()),
        },
        "generic_type" => {
            let base = node
                .child_by_field_name("type")
                .map_or_else(|| TypeExpr::Unsupported(text(node, src).to_string()), |b| type_expr(b, src));
            let type_args: Vec<TypeExpr> = node
                .child_by_field_name("type_arguments")
                .map(|args| named(args).into_iter().map(|a| constraint_expr(a, src)).collect())
                .unwrap_or_default();
            match base {
                TypeExpr::Name { pkg, name, .. } => TypeExpr::Name {
                    pkg,
                    name,
                    args: type_args,
                },
                _ => TypeExpr::Unsupported(text(node, src).to_string()),
            }
        }
        "pointer_type" => first_type(node, src).map_or_else(
            || TypeExpr::Unsupported(text(node, src).to_string()),
            |elem| TypeExpr::Pointer(Box::new(elem)),
        ),
        "slice_type" => match node.child_by_field_name("element") {
            Some(elem) => TypeExpr::Slice(Box::new(type_expr(elem, src))),
            None => TypeExpr::Unsupported(text(node, src).to_string()),
        },
        "array_type" => match (
            node.child_by_field_name("length"),
            node.child_by_field_name("element"),
        ) {
            (Some(len), Some(elem)) => TypeExpr::Array {
                len: const_expr(len, src),
                elem: Box::new(type_expr(elem, src)),
            },
            _ => TypeExpr::Unsupported(text(node, src).to_string()),
        },
        "map_type" => match (
            node.child_by_field_name("key"),
            node.child_by_field_name("value"),
        ) {
            (Some(key), Some(value)) => TypeExpr::Map {
                key: Box::new(type_expr(key, src)),
                value: Box::new(type_expr(value, src)),
            },
            _ => TypeExpr::Unsupported(text(node, src).to_string()),
        },
        "channel_type" => {
            let Some(elem) = node.child_by_field_name("value") else {
                return TypeExpr::Unsupported(text(node, src).to_string());
            };
            let first_is_arrow = node.child(0).is_some_and(|c| c.kind() == "<-");
            let dir = if first_is_arrow {
                ChanDirExpr::Recv
            } else if has_token(node, "<-") {
                ChanDirExpr::Send
            } else {
                ChanDirExpr::Both
            };
            TypeExpr::Chan {
                dir,
                elem: Box::new(type_expr(elem, src)),
            }
        }
        "function_type" => TypeExpr::Func(Box::new(func_expr(node, src))),
        "struct_type" => TypeExpr::Struct(
            named(node)
                .into_iter()
                .find(|n| n.kind() == "field_declaration_list")
                .map(|list| read_fields(list, src))
                .unwrap_or_default(),
        ),
        "interface_type" => TypeExpr::Interface(read_interface_elems(node, src)),
        "parenthesized_type" | "interface_type_name" => first_type(node, src)
            .unwrap_or_else(|| TypeExpr::Unsupported(text(node, src).to_string())),
        "negated_type" | "type_elem" | "constraint_elem" | "constraint_term" | "type_constraint" => {
            constraint_expr(node, src)
        }
        _ => TypeExpr::Unsupported(text(node, src).to_string()),
    }
}

fn first_type(node: Node<'_>, src: &[u8]) -> Option<TypeExpr> {
    named(node).into_iter().next().map(|n| type_expr(n, src))
}

/// Converts a constraint or type-argument element, which may be a union.
fn constraint_expr(node: Node<'_>, src: &[u8]) -> TypeExpr {
    let terms_nodes = match node.kind() {
        "type_elem" | "constraint_elem" | "type_constraint" => named(node),
        _ => vec![node],
    };

    let mut terms = Vec::with_capacity(terms_nodes.len());
    for term in terms_nodes {
        match term.kind() {
            "negated_type" => terms.push(UnionTermExpr {
                tilde: true,
                ty: first_type(term, src)
                    .unwrap_or_else(|| TypeExpr::Unsupported(text(term, src).to_string())),
            }),
            "constraint_term" => terms.push(UnionTermExpr {
                tilde: has_token(term, "~"),
                ty: first_type(term, src)
                    .unwrap_or_else(|| TypeExpr::Unsupported(text(term, src).to_string())),
            }),
            _ => terms.push(UnionTermExpr {
                tilde: false,
                ty: type_expr(term, src),
            }),
        }
    }

    match terms.as_slice() {
        [single] if !single.tilde => single.ty.clone(),
        [] => TypeExpr::Unsupported(text(node, src).to_string()),
        _ => TypeExpr::Union(terms),
    }
}

/// Reads `parameters` and `result` fields of a function-like node.
fn func_expr(node: Node<'_>, src: &[u8]) -> FuncExpr {
    let mut func = FuncExpr::default();
    if let Some(params) = node.child_by_field_name("parameters") {
        let decls = named(params);
        let count = decls.len();
        for (i, decl) in decls.into_iter().enumerate() {
            match decl.kind() {
                "variadic_parameter_declaration" => {
                    if i + 1 != count {
                        func.misplaced_variadic = true;
                    }
                    let ty = decl.child_by_field_name("type").map_or_else(
                        || TypeExpr::Unsupported(text(decl, src).to_string()),
                        |t| type_expr(t, src),
                    );
                    func.variadic = Some(ParamDecl {
                        name: decl
                            .child_by_field_name("name")
                            .map(|n| text(n, src).to_string())
                            .unwrap_or_default(),
                        ty,
                    });
                }
                "parameter_declaration" => read_param_decl(decl, src, &mut func.params),
                _ => {}
            }
        }
    }
    if let Some(result) = node.child_by_field_name("result") {
        if result.kind() == "parameter_list" {
            for decl in named(result) {
                if decl.kind() == "parameter_declaration" {
                    read_param_decl(decl, src, &mut func.results);
                }
            }
        } else {
            func.results.push(ParamDecl {
                name: String::new(),
                ty: type_expr(result, src),
            });
        }
    }
    func
}

fn read_param_decl(decl: Node<'_>, src: &[u8], out: &mut Vec<ParamDecl>) {
    let ty = decl.child_by_field_name("type").map_or_else(
        || TypeExpr::Unsupported(text(decl, src).to_string()),
        |t| type_expr(t, src),
    );
    let names = fields_named(decl, "name");
    if names.is_empty() {
        out.push(ParamDecl {
            name: String::new(),
            ty,
        });
        return;
    }
    for name in names {
        out.push(ParamDecl {
            name: text(name, src).to_string(),
            ty: ty.clone(),
        });
    }
}

fn read_fields(list: Node<'_>, src: &[u8]) -> Vec<FieldDecl> {
    let mut fields = Vec::new();
    for decl in named(list) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(type_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let tag = decl
            .child_by_field_name("tag")
            .map(|t| unquote(text(t, src)))
            .filter(|t| !t.is_empty());
        let names = fields_named(decl, "name");
        if names.is_empty() {
            let mut ty = type_expr(type_node, src);
            if has_token(decl, "*") {
                ty = TypeExpr::Pointer(Box::new(ty));
            }
            fields.push(FieldDecl {
                name: String::new(),
                ty,
                tag,
            });
            continue;
        }
        let ty = type_expr(type_node, src);
        for name in names {
            fields.push(FieldDecl {
                name: text(name, src).to_string(),
                ty: ty.clone(),
                tag: tag.clone(),
            });
        }
    }
    fields
}

fn read_interface_elems(node: Node<'_>, src: &[u8]) -> Vec<InterfaceElem> {
    named(node)
        .into_iter()
        .filter_map(|elem| match elem.kind() {
            "method_elem" | "method_spec" => {
                let name = elem.child_by_field_name("name")?;
                Some(InterfaceElem::Method {
                    name: text(name, src).to_string(),
                    signature: func_expr(elem, src),
                })
            }
            "type_elem" | "constraint_elem" => Some(InterfaceElem::Embed(constraint_expr(elem, src))),
            _ => Some(InterfaceElem::Embed(type_expr(elem, src))),
        })
        .collect()
}

/// Converts an expression node used as a constant.
fn const_expr(node: Node<'_>, src: &[u8]) -> ConstExpr {
    match node.kind() {
        "int_literal" => parse_int_literal(text(node, src))
            .map_or_else(|| ConstExpr::Unsupported(text(node, src).to_string()), ConstExpr::Int),
        "iota" => ConstExpr::Iota,
        "identifier" => match text(node, src) {
            "iota" => ConstExpr::Iota,
            name => ConstExpr::Ident(name.to_string()),
        },
        "selector_expression" => match (
            node.child_by_field_name("operand"),
            node.child_by_field_name("field"),
        ) {
            (Some(pkg), Some(name)) if pkg.kind() == "identifier" => ConstExpr::Qualified {
                pkg: text(pkg, src).to_string(),
                name: text(name, src).to_string(),
            },
            _ => ConstExpr::Unsupported(text(node, src).to_string()),
        },
        "parenthesized_expression" => named(node)
            .into_iter()
            .next()
            .map_or_else(|| ConstExpr::Unsupported(text(node, src).to_string()), |e| const_expr(e, src)),
        "unary_expression" => match (
            node.child_by_field_name("operator"),
            node.child_by_field_name("operand"),
        ) {
            (Some(op), Some(operand)) => ConstExpr::Unary {
                op: text(op, src).to_string(),
                operand: Box::new(const_expr(operand, src)),
            },
            _ => ConstExpr::Unsupported(text(node, src).to_string()),
        },
        "binary_expression" => match (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) {
            (Some(lhs), Some(op), Some(rhs)) => ConstExpr::Binary {
                op: text(op, src).to_string(),
                lhs: Box::new(const_expr(lhs, src)),
                rhs: Box::new(const_expr(rhs, src)),
            },
            _ => ConstExpr::Unsupported(text(node, src).to_string()),
        },
        _ => ConstExpr::Unsupported(text(node, src).to_string()),
    }
}

/// Parses a Go integer literal: decimal, `0x`, `0o`, `0b`, legacy octal, `_` separators.
#[must_use]
pub fn parse_int_literal(literal: &str) -> Option<i128> {
    let digits: String = literal.chars().filter(|c| *c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i128::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i128::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i128::from_str_radix(bin, 2).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        i128::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}
