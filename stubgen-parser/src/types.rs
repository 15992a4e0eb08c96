//! Type-graph construction.
//!
//! [`TypeParser`] turns syntax type expressions into model [`Type`]s. Named
//! types are stored once per `(package path, name)` in a [`TypeArena`], which
//! lets self-referencing declarations terminate: a name that is already being
//! expanded further up the stack resolves to its placeholder id.

use crate::error::ParseError;
use crate::loader::{GoPackage, Loader};
use crate::syntax::{
    ChanDirExpr, ConstExpr, FieldDecl, FuncExpr, InterfaceElem, ParamDecl, TypeDecl, TypeExpr,
    TypeParamDecl, UnionTermExpr,
};
use std::collections::HashMap;
use std::rc::Rc;
use stubgen_model::{
    ChanDir, Constraint, Field, Func, InterfaceType, NamedRef, NamedTypeId, Parameter, PkgInfo, Signature,
    StructType, Type, TypeArena, TypeParam, UnionTerm, binding,
};
use tracing::debug;

/// Predeclared basic type names.
pub const BASIC_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

type TypeKey = (String, String);

/// Progress of a named type. A key absent from the state map is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Placeholder allocated.
    Marked(NamedTypeId),
    /// Underlying type being expanded further up the stack.
    Parsing(NamedTypeId),
    /// Underlying type filled in.
    Parsed(NamedTypeId),
}

/// Name resolution context: a package, one of its files and the type
/// parameters in scope.
#[derive(Debug, Clone)]
pub struct Scope {
    pkg: Rc<GoPackage>,
    file: usize,
    type_params: Vec<TypeParam>,
}

impl Scope {
    /// Creates a scope for a file of a package.
    #[must_use]
    pub fn new(pkg: Rc<GoPackage>, file: usize) -> Self {
        Self {
            pkg,
            file,
            type_params: Vec::new(),
        }
    }

    /// Returns a scope with `params` added; later parameters shadow earlier ones.
    #[must_use]
    pub fn with_type_params(&self, params: &[TypeParam]) -> Self {
        let mut scope = self.clone();
        scope.type_params.extend_from_slice(params);
        scope
    }

    /// Returns the package.
    #[must_use]
    pub fn pkg(&self) -> &Rc<GoPackage> {
        &self.pkg
    }

    fn type_param(&self, name: &str) -> Option<&TypeParam> {
        self.type_params.iter().rev().find(|p| p.name == name)
    }
}

/// Converts syntax into model types, sharing one arena for a whole run.
pub struct TypeParser<'l> {
    loader: &'l mut Loader,
    arena: TypeArena,
    states: HashMap<TypeKey, ParseState>,
    alias_stack: Vec<TypeKey>,
    const_stack: Vec<TypeKey>,
    // Defined types whose right-hand named type was still being parsed.
    deferred: Vec<(NamedTypeId, NamedRef)>,
}

impl<'l> TypeParser<'l> {
    /// Creates a parser resolving imports through `loader`.
    pub fn new(loader: &'l mut Loader) -> Self {
        Self {
            loader,
            arena: TypeArena::new(),
            states: HashMap::new(),
            alias_stack: Vec::new(),
            const_stack: Vec::new(),
            deferred: Vec::new(),
        }
    }

    /// Returns the arena built so far.
    #[must_use]
    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    /// Consumes the parser, returning its arena.
    #[must_use]
    pub fn into_arena(self) -> TypeArena {
        self.arena
    }

    /// Returns the package of an import path, `None` when it is opaque.
    pub fn package(&mut self, import_path: &str) -> Option<Rc<GoPackage>> {
        self.loader.import(import_path)
    }

    /// Parses the named type `name` declared in `pkg` and returns its id.
    ///
    /// A type that is currently being expanded returns its placeholder.
    ///
    /// # Errors
    /// Returns `ParseError` if the declaration is missing or its type cannot
    /// be represented.
    pub fn named_type(&mut self, pkg: &Rc<GoPackage>, name: &str) -> Result<NamedTypeId, ParseError> {
        let key = (pkg.path.clone(), name.to_string());
        let id = match self.states.get(&key).copied() {
            Some(ParseState::Parsing(id) | ParseState::Parsed(id)) => return Ok(id),
            Some(ParseState::Marked(id)) => id,
            None => {
                let id = self.arena.alloc(Some(pkg.info()), name);
                self.states.insert(key.clone(), ParseState::Marked(id));
                id
            }
        };

        let Some((file, decl)) = pkg.type_decl(name) else {
            return Err(ParseError::Undefined {
                name: format!("{}.{}", pkg.name, name),
            });
        };
        self.states.insert(key.clone(), ParseState::Parsing(id));
        debug!("parsing type {}.{}", pkg.path, name);

        let scope = Scope::new(Rc::clone(pkg), file);
        let params = self.type_params(&decl.type_params, &scope)?;
        let scope = scope.with_type_params(&params);
        let ty = self.parse_type(&decl.ty, &scope)?;
        let underlying = match ty {
            Type::Named(named) => {
                let underlying = self.arena.instantiated_underlying(&named);
                if underlying.is_none() && named.id.is_some() {
                    self.deferred.push((id, named));
                }
                underlying
            }
            other => Some(other),
        };

        self.arena.fill(id, params, underlying)?;
        self.states.insert(key, ParseState::Parsed(id));
        self.backfill();
        Ok(id)
    }

    /// Copies underlying types into defined types that referenced a type
    /// still being parsed, now that it is filled. Chains resolve in turn.
    fn backfill(&mut self) {
        while let Some(pos) = self
            .deferred
            .iter()
            .position(|(_, target)| self.arena.instantiated_underlying(target).is_some())
        {
            let (id, target) = self.deferred.swap_remove(pos);
            let underlying = self.arena.instantiated_underlying(&target);
            if let Some(def) = self.arena.get_mut(id) {
                debug!("backfilled underlying type of {} from {}", def.name, target.name);
                def.underlying = underlying;
            }
        }
    }

    /// Resolves a declared type name, following aliases, to a type.
    ///
    /// # Errors
    /// Returns `ParseError` if the name is not declared in `pkg` or cannot
    /// be parsed.
    pub fn resolve_decl(
        &mut self,
        pkg: &Rc<GoPackage>,
        name: &str,
        type_args: Vec<Type>,
    ) -> Result<Type, ParseError> {
        let Some((file, decl)) = pkg.type_decl(name) else {
            return Err(ParseError::Undefined {
                name: name.to_string(),
            });
        };
        if decl.alias {
            return self.resolve_alias(pkg, file, decl, &type_args);
        }
        let id = self.named_type(pkg, name)?;
        Ok(self.arena.reference(id, type_args))
    }

    fn resolve_alias(
        &mut self,
        pkg: &Rc<GoPackage>,
        file: usize,
        decl: &TypeDecl,
        type_args: &[Type],
    ) -> Result<Type, ParseError> {
        let key = (pkg.path.clone(), decl.name.clone());
        if self.alias_stack.contains(&key) {
            return Err(ParseError::AliasCycle {
                name: decl.name.clone(),
            });
        }
        self.alias_stack.push(key);
        let result = self.alias_target(pkg, file, decl, type_args);
        self.alias_stack.pop();
        result
    }

    fn alias_target(
        &mut self,
        pkg: &Rc<GoPackage>,
        file: usize,
        decl: &TypeDecl,
        type_args: &[Type],
    ) -> Result<Type, ParseError> {
        let scope = Scope::new(Rc::clone(pkg), file);
        let params = self.type_params(&decl.type_params, &scope)?;
        let scope = scope.with_type_params(&params);
        let ty = self.parse_type(&decl.ty, &scope)?;
        if params.is_empty() {
            return Ok(ty);
        }
        Ok(ty.substitute(&binding(&params, type_args)))
    }

    /// Parses a type parameter list. All names are in scope while the
    /// constraints are parsed, so constraints may refer to any parameter.
    ///
    /// # Errors
    /// Returns `ParseError` if a constraint cannot be parsed.
    pub fn type_params(
        &mut self,
        decls: &[TypeParamDecl],
        scope: &Scope,
    ) -> Result<Vec<TypeParam>, ParseError> {
        let mut params: Vec<TypeParam> = decls
            .iter()
            .enumerate()
            .map(|(i, d)| TypeParam::new(&d.name, None, i))
            .collect();
        let inner = scope.with_type_params(&params);
        for (param, decl) in params.iter_mut().zip(decls) {
            param.constraint = Some(Box::new(self.parse_constraint(&decl.constraint, &inner)?));
        }
        Ok(params)
    }

    /// Parses a type expression.
    ///
    /// # Errors
    /// Returns `ParseError` for undefined names, unsupported syntax and
    /// invalid array lengths.
    pub fn parse_type(&mut self, expr: &TypeExpr, scope: &Scope) -> Result<Type, ParseError> {
        match expr {
            TypeExpr::Name { pkg: None, name, args } => self.parse_ident(name, args, scope),
            TypeExpr::Name {
                pkg: Some(qualifier),
                name,
                args,
            } => self.parse_qualified(qualifier, name, args, scope),
            TypeExpr::Pointer(elem) => Ok(Type::pointer(self.parse_type(elem, scope)?)),
            TypeExpr::Slice(elem) => Ok(Type::slice(self.parse_type(elem, scope)?)),
            TypeExpr::Array { len, elem } => {
                let value = self.eval_const(len, scope, 0)?;
                let len = u64::try_from(value)
                    .map_err(|_| ParseError::array_length(len.to_string(), "negative length"))?;
                Ok(Type::array(len, self.parse_type(elem, scope)?))
            }
            TypeExpr::Map { key, value } => Ok(Type::map(
                self.parse_type(key, scope)?,
                self.parse_type(value, scope)?,
            )),
            TypeExpr::Chan { dir, elem } => {
                let dir = match dir {
                    ChanDirExpr::Both => ChanDir::SendRecv,
                    ChanDirExpr::Send => ChanDir::SendOnly,
                    ChanDirExpr::Recv => ChanDir::RecvOnly,
                };
                Ok(Type::chan(dir, self.parse_type(elem, scope)?))
            }
            TypeExpr::Func(func) => Ok(Type::signature(self.parse_signature(func, scope)?)),
            TypeExpr::Struct(fields) => Ok(Type::Struct(self.parse_fields(fields, scope)?)),
            TypeExpr::Interface(elems) => Ok(Type::Interface(self.parse_interface(elems, scope)?)),
            TypeExpr::Union(terms) => Ok(Constraint::Union(self.parse_union(terms, scope)?).into_type()),
            TypeExpr::Unsupported(text) => Err(ParseError::unsupported_type(text)),
        }
    }

    /// Parses a type used as a constraint, where `any`, `comparable` and
    /// single-term interfaces have their constraint forms.
    ///
    /// # Errors
    /// Returns `ParseError` if the constraint cannot be parsed.
    pub fn parse_constraint(&mut self, expr: &TypeExpr, scope: &Scope) -> Result<Type, ParseError> {
        match expr {
            TypeExpr::Name { pkg: None, name, args }
                if args.is_empty()
                    && scope.type_param(name).is_none()
                    && scope.pkg.type_decl(name).is_none() =>
            {
                match name.as_str() {
                    "any" => Ok(Constraint::Any.into_type()),
                    "comparable" => Ok(Constraint::Comparable.into_type()),
                    _ => self.parse_type(expr, scope),
                }
            }
            TypeExpr::Interface(elems) if elems.is_empty() => Ok(Constraint::Any.into_type()),
            TypeExpr::Interface(elems) => match elems.as_slice() {
                [InterfaceElem::Embed(inner @ TypeExpr::Union(_))] => self.parse_type(inner, scope),
                _ => self.parse_type(expr, scope),
            },
            _ => self.parse_type(expr, scope),
        }
    }

    /// Parses a function signature.
    ///
    /// # Errors
    /// Returns `ParseError::Internal` if `...` appears before the last
    /// parameter, or any error from the parameter types.
    pub fn parse_signature(&mut self, func: &FuncExpr, scope: &Scope) -> Result<Signature, ParseError> {
        if func.misplaced_variadic {
            return Err(ParseError::internal(
                "can only use ... with final parameter in list",
            ));
        }
        let params = self.parse_params(&func.params, scope)?;
        let variadic = func
            .variadic
            .as_ref()
            .map(|p| Ok::<_, ParseError>(Parameter::new(&p.name, self.parse_type(&p.ty, scope)?)))
            .transpose()?;
        let results = self.parse_params(&func.results, scope)?;
        Ok(Signature::new(params, variadic, results))
    }

    fn parse_params(&mut self, params: &[ParamDecl], scope: &Scope) -> Result<Vec<Parameter>, ParseError> {
        params
            .iter()
            .map(|p| Ok(Parameter::new(&p.name, self.parse_type(&p.ty, scope)?)))
            .collect()
    }

    fn parse_fields(&mut self, fields: &[FieldDecl], scope: &Scope) -> Result<StructType, ParseError> {
        let mut st = StructType::default();
        for decl in fields {
            let ty = self.parse_type(&decl.ty, scope)?;
            let field = if decl.name.is_empty() {
                Field::embedded(ty)
            } else {
                Field::new(&decl.name, ty)
            };
            st.add_field(match &decl.tag {
                Some(tag) => field.with_tag(tag),
                None => field,
            });
        }
        Ok(st)
    }

    fn parse_interface(
        &mut self,
        elems: &[InterfaceElem],
        scope: &Scope,
    ) -> Result<InterfaceType, ParseError> {
        let mut embeddeds = Vec::new();
        let mut methods = Vec::new();
        for elem in elems {
            match elem {
                InterfaceElem::Method { name, signature } => {
                    let sig = self.parse_signature(signature, scope)?;
                    methods.push(Func::new(name, sig, ""));
                }
                InterfaceElem::Embed(ty) => embeddeds.push(self.parse_constraint(ty, scope)?),
            }
        }
        Ok(InterfaceType::new(embeddeds, methods))
    }

    fn parse_union(
        &mut self,
        terms: &[UnionTermExpr],
        scope: &Scope,
    ) -> Result<Vec<UnionTerm>, ParseError> {
        terms
            .iter()
            .map(|t| {
                Ok(UnionTerm {
                    tilde: t.tilde,
                    ty: self.parse_type(&t.ty, scope)?,
                })
            })
            .collect()
    }

    fn parse_args(&mut self, args: &[TypeExpr], scope: &Scope) -> Result<Vec<Type>, ParseError> {
        args.iter().map(|a| self.parse_type(a, scope)).collect()
    }

    fn parse_ident(&mut self, name: &str, args: &[TypeExpr], scope: &Scope) -> Result<Type, ParseError> {
        if args.is_empty() {
            if let Some(param) = scope.type_param(name) {
                return Ok(param.as_type_arg());
            }
        }
        let type_args = self.parse_args(args, scope)?;

        if scope.pkg.type_decl(name).is_some() {
            let pkg = Rc::clone(&scope.pkg);
            return self.resolve_decl(&pkg, name, type_args);
        }
        for path in self.dot_imports(scope) {
            if let Some(pkg) = self.loader.import(&path) {
                if pkg.type_decl(name).is_some() {
                    return self.resolve_decl(&pkg, name, type_args);
                }
            }
        }
        self.predeclared(name)
            .ok_or_else(|| ParseError::Undefined {
                name: name.to_string(),
            })
    }

    fn parse_qualified(
        &mut self,
        qualifier: &str,
        name: &str,
        args: &[TypeExpr],
        scope: &Scope,
    ) -> Result<Type, ParseError> {
        let Some(path) = self.import_path_for(qualifier, scope) else {
            return Err(ParseError::Undefined {
                name: format!("{qualifier}.{name}"),
            });
        };
        let type_args = self.parse_args(args, scope)?;
        match self.loader.import(&path) {
            Some(pkg) if pkg.type_decl(name).is_some() => self.resolve_decl(&pkg, name, type_args),
            Some(_) => Err(ParseError::Undefined {
                name: format!("{qualifier}.{name}"),
            }),
            None => Ok(self.opaque(&path, name, type_args)),
        }
    }

    /// References a type of a package whose source is unavailable.
    fn opaque(&mut self, path: &str, name: &str, type_args: Vec<Type>) -> Type {
        let key = (path.to_string(), name.to_string());
        let id = match self.states.get(&key) {
            Some(
                ParseState::Marked(id) | ParseState::Parsing(id) | ParseState::Parsed(id),
            ) => *id,
            None => {
                let info = PkgInfo::new(self.loader.package_name(path), path, "");
                let id = self.arena.alloc(Some(info), name);
                self.states.insert(key, ParseState::Parsed(id));
                id
            }
        };
        self.arena.reference(id, type_args)
    }

    fn import_path_for(&mut self, qualifier: &str, scope: &Scope) -> Option<String> {
        let imports = &scope.pkg.files.get(scope.file)?.imports;
        for import in imports {
            match import.alias.as_deref() {
                Some("." | "_") => {}
                Some(alias) if alias == qualifier => return Some(import.path.clone()),
                Some(_) => {}
                None if self.loader.package_name(&import.path) == qualifier => {
                    return Some(import.path.clone());
                }
                None => {}
            }
        }
        None
    }

    fn dot_imports(&self, scope: &Scope) -> Vec<String> {
        scope
            .pkg
            .files
            .get(scope.file)
            .map(|f| {
                f.imports
                    .iter()
                    .filter(|i| i.alias.as_deref() == Some("."))
                    .map(|i| i.path.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn predeclared(&mut self, name: &str) -> Option<Type> {
        match name {
            "error" => Some(self.error_type()),
            "any" => Some(Type::empty_interface()),
            "comparable" => Some(Constraint::Comparable.into_type()),
            _ if BASIC_TYPES.contains(&name) => Some(Type::basic(name)),
            _ => None,
        }
    }

    /// Returns the predeclared `error` interface.
    pub fn error_type(&mut self) -> Type {
        let key = (String::new(), "error".to_string());
        let id = match self.states.get(&key) {
            Some(ParseState::Marked(id) | ParseState::Parsing(id) | ParseState::Parsed(id)) => *id,
            None => {
                let id = self.arena.alloc(None, "error");
                let method = Func::new(
                    "Error",
                    Signature::new(vec![], None, vec![Parameter::unnamed(Type::basic("string"))]),
                    "",
                );
                if let Some(def) = self.arena.get_mut(id) {
                    def.underlying = Some(Type::Interface(InterfaceType::new(vec![], vec![method])));
                }
                self.states.insert(key, ParseState::Parsed(id));
                id
            }
        };
        self.arena.reference(id, Vec::new())
    }

    /// Evaluates an integer constant expression.
    fn eval_const(&mut self, expr: &ConstExpr, scope: &Scope, iota: i128) -> Result<i128, ParseError> {
        let invalid = |reason: &str| ParseError::array_length(expr.to_string(), reason);
        match expr {
            ConstExpr::Int(v) => Ok(*v),
            ConstExpr::Iota => Ok(iota),
            ConstExpr::Ident(name) => {
                let pkg = Rc::clone(&scope.pkg);
                self.eval_named_const(&pkg, name)
                    .ok_or_else(|| invalid("undefined constant"))?
            }
            ConstExpr::Qualified { pkg, name } => {
                let path = self
                    .import_path_for(pkg, scope)
                    .ok_or_else(|| invalid("undefined package"))?;
                let imported = self
                    .loader
                    .import(&path)
                    .ok_or_else(|| invalid("package source unavailable"))?;
                self.eval_named_const(&imported, name)
                    .ok_or_else(|| invalid("undefined constant"))?
            }
            ConstExpr::Unary { op, operand } => {
                let v = self.eval_const(operand, scope, iota)?;
                match op.as_str() {
                    "-" => v.checked_neg().ok_or_else(|| invalid("overflow")),
                    "+" => Ok(v),
                    "^" => Ok(!v),
                    _ => Err(invalid("unsupported operator")),
                }
            }
            ConstExpr::Binary { op, lhs, rhs } => {
                let a = self.eval_const(lhs, scope, iota)?;
                let b = self.eval_const(rhs, scope, iota)?;
                let shift = || u32::try_from(b).ok().filter(|s| *s < 127);
                let value = match op.as_str() {
                    "+" => a.checked_add(b),
                    "-" => a.checked_sub(b),
                    "*" => a.checked_mul(b),
                    "/" => a.checked_div(b),
                    "%" => a.checked_rem(b),
                    "<<" => shift().and_then(|s| a.checked_shl(s)),
                    ">>" => shift().and_then(|s| a.checked_shr(s)),
                    "&" => Some(a & b),
                    "|" => Some(a | b),
                    "^" => Some(a ^ b),
                    "&^" => Some(a & !b),
                    _ => return Err(invalid("unsupported operator")),
                };
                value.ok_or_else(|| invalid("overflow or division by zero"))
            }
            ConstExpr::Unsupported(_) => Err(invalid("not an integer constant")),
        }
    }

    fn eval_named_const(&mut self, pkg: &Rc<GoPackage>, name: &str) -> Option<Result<i128, ParseError>> {
        let (file, decl) = pkg.const_decl(name)?;
        let key = (pkg.path.clone(), name.to_string());
        if self.const_stack.contains(&key) {
            return Some(Err(ParseError::array_length(name, "constant definition loop")));
        }
        let Some(value) = &decl.value else {
            return Some(Err(ParseError::array_length(name, "constant has no value")));
        };
        self.const_stack.push(key);
        let scope = Scope::new(Rc::clone(pkg), file);
        let result = self.eval_const(value, &scope, decl.iota);
        self.const_stack.pop();
        Some(result)
    }
}
