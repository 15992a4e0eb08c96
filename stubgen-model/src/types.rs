//! Go type definitions.
//!
//! This module contains the data structures representing every Go type shape
//! the generator understands: basic types, arrays and slices, maps, channels,
//! pointers, named types, structs, interfaces, function signatures and
//! generic type parameters.

use crate::arena::NamedTypeId;
use crate::contents::Func;
use crate::pkgmap::PkgInfo;
use std::collections::HashMap;

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChanDir {
    /// Bidirectional channel (`chan T`).
    #[default]
    SendRecv,
    /// Send-only channel (`chan<- T`).
    SendOnly,
    /// Receive-only channel (`<-chan T`).
    RecvOnly,
}

impl ChanDir {
    /// Returns the keyword prefix used when printing a channel type.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::SendRecv => "chan ",
            Self::SendOnly => "chan<- ",
            Self::RecvOnly => "<-chan ",
        }
    }
}

/// A Go type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Predeclared non-composite type such as `int`, `string` or `bool`.
    Basic(String),
    /// Array (`Some(len)`) or slice (`None`).
    Array {
        /// Array length; `None` for slices.
        len: Option<u64>,
        /// Element type.
        elem: Box<Type>,
    },
    /// Channel type.
    Chan {
        /// Channel direction.
        dir: ChanDir,
        /// Element type.
        elem: Box<Type>,
    },
    /// Interface literal.
    Interface(InterfaceType),
    /// Map type.
    Map {
        /// Key type.
        key: Box<Type>,
        /// Value type.
        value: Box<Type>,
    },
    /// Reference to a named type.
    Named(NamedRef),
    /// Pointer type.
    Pointer(Box<Type>),
    /// Function signature.
    Signature(Box<Signature>),
    /// Struct literal.
    Struct(StructType),
    /// Use of a generic type parameter.
    TypeParam(TypeParam),
    /// Constraint-only type: `any`, `comparable` or a union.
    Constraint(Constraint),
}

impl Type {
    /// Creates a basic type.
    #[must_use]
    pub fn basic(name: impl Into<String>) -> Self {
        Self::Basic(name.into())
    }

    /// Creates a slice type.
    #[must_use]
    pub fn slice(elem: Type) -> Self {
        Self::Array {
            len: None,
            elem: Box::new(elem),
        }
    }

    /// Creates a fixed-length array type.
    #[must_use]
    pub fn array(len: u64, elem: Type) -> Self {
        Self::Array {
            len: Some(len),
            elem: Box::new(elem),
        }
    }

    /// Creates a map type.
    #[must_use]
    pub fn map(key: Type, value: Type) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Creates a channel type.
    #[must_use]
    pub fn chan(dir: ChanDir, elem: Type) -> Self {
        Self::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    /// Creates a pointer type.
    #[must_use]
    pub fn pointer(elem: Type) -> Self {
        Self::Pointer(Box::new(elem))
    }

    /// Creates a function type.
    #[must_use]
    pub fn signature(sig: Signature) -> Self {
        Self::Signature(Box::new(sig))
    }

    /// Creates the empty interface `interface{}`.
    #[must_use]
    pub fn empty_interface() -> Self {
        Self::Interface(InterfaceType::default())
    }

    /// Returns the named reference if this is a named type.
    #[must_use]
    pub const fn as_named(&self) -> Option<&NamedRef> {
        match self {
            Self::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Returns true if this is a slice (array without length).
    #[must_use]
    pub const fn is_slice(&self) -> bool {
        matches!(self, Self::Array { len: None, .. })
    }

    /// Replaces type parameters by name with the given types.
    ///
    /// Used to instantiate the methods of an embedded generic interface or
    /// struct with the type arguments of the embedding site.
    #[must_use]
    pub fn substitute(&self, args: &HashMap<String, Type>) -> Type {
        if args.is_empty() {
            return self.clone();
        }
        match self {
            Self::Basic(_) | Self::Constraint(Constraint::Any | Constraint::Comparable) => {
                self.clone()
            }
            Self::Array { len, elem } => Self::Array {
                len: *len,
                elem: Box::new(elem.substitute(args)),
            },
            Self::Chan { dir, elem } => Self::Chan {
                dir: *dir,
                elem: Box::new(elem.substitute(args)),
            },
            Self::Interface(iface) => Self::Interface(InterfaceType {
                embeddeds: iface.embeddeds.iter().map(|e| e.substitute(args)).collect(),
                methods: iface.methods.iter().map(|m| m.substitute(args)).collect(),
                type_params: iface.type_params.clone(),
            }),
            Self::Map { key, value } => Self::Map {
                key: Box::new(key.substitute(args)),
                value: Box::new(value.substitute(args)),
            },
            Self::Named(named) => Self::Named(NamedRef {
                type_args: named.type_args.iter().map(|a| a.substitute(args)).collect(),
                ..named.clone()
            }),
            Self::Pointer(elem) => Self::Pointer(Box::new(elem.substitute(args))),
            Self::Signature(sig) => Self::signature(sig.substitute(args)),
            Self::Struct(st) => Self::Struct(StructType {
                fields: st
                    .fields
                    .iter()
                    .map(|f| Field {
                        ty: f.ty.substitute(args),
                        ..f.clone()
                    })
                    .collect(),
            }),
            Self::TypeParam(param) => args
                .get(&param.name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Self::Constraint(Constraint::Union(terms)) => Self::Constraint(Constraint::Union(
                terms
                    .iter()
                    .map(|t| UnionTerm {
                        tilde: t.tilde,
                        ty: t.ty.substitute(args),
                    })
                    .collect(),
            )),
        }
    }
}

/// Reference to a named type at one use site.
///
/// The identity of the type is `(package path, name)`; types found by the
/// parser also carry their arena id so their underlying type can be looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRef {
    /// Arena id for parsed types; `None` for synthesized declarations.
    pub id: Option<NamedTypeId>,
    /// Declaring package; `None` for predeclared types such as `error`.
    pub pkg: Option<PkgInfo>,
    /// Type name.
    pub name: String,
    /// Type arguments of this use (empty for non-generic types).
    pub type_args: Vec<Type>,
}

impl NamedRef {
    /// Creates a reference without an arena id.
    #[must_use]
    pub fn new(pkg: Option<PkgInfo>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            pkg,
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    /// Sets the type arguments.
    #[must_use]
    pub fn with_type_args(mut self, type_args: Vec<Type>) -> Self {
        self.type_args = type_args;
        self
    }

    /// Returns the import path of the declaring package, empty for predeclared types.
    #[must_use]
    pub fn pkg_path(&self) -> &str {
        self.pkg.as_ref().map_or("", |p| p.path.as_str())
    }
}

/// Generic type parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    /// Parameter name.
    pub name: String,
    /// Constraint; present in declarations, stripped in type arguments.
    pub constraint: Option<Box<Type>>,
    /// Position in the declaring parameter list.
    pub index: usize,
}

impl TypeParam {
    /// Creates a type parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, constraint: Option<Type>, index: usize) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.map(Box::new),
            index,
        }
    }

    /// Returns this parameter as a type argument (constraint erased).
    #[must_use]
    pub fn as_type_arg(&self) -> Type {
        Type::TypeParam(Self {
            name: self.name.clone(),
            constraint: None,
            index: self.index,
        })
    }
}

/// Returns the type parameters as type arguments, constraints erased.
#[must_use]
pub fn type_args_of(params: &[TypeParam]) -> Vec<Type> {
    params.iter().map(TypeParam::as_type_arg).collect()
}

/// Type parameter constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// The `any` constraint.
    Any,
    /// The `comparable` constraint.
    Comparable,
    /// A union of terms such as `~int | float64`.
    Union(Vec<UnionTerm>),
}

impl Constraint {
    /// Returns the constraint as a type.
    #[must_use]
    pub fn into_type(self) -> Type {
        Type::Constraint(self)
    }
}

/// One term of a union constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionTerm {
    /// True for `~T` (underlying type term).
    pub tilde: bool,
    /// Term type.
    pub ty: Type,
}

/// Function signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    /// Positional parameters, excluding the variadic one.
    pub params: Vec<Parameter>,
    /// Trailing variadic parameter; its type is the element type.
    pub variadic: Option<Parameter>,
    /// Results.
    pub results: Vec<Parameter>,
}

impl Signature {
    /// Creates a signature.
    #[must_use]
    pub fn new(params: Vec<Parameter>, variadic: Option<Parameter>, results: Vec<Parameter>) -> Self {
        Self {
            params,
            variadic,
            results,
        }
    }

    /// Returns the number of arguments a call passes, counting the variadic one.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len() + usize::from(self.variadic.is_some())
    }

    /// Returns a copy with every parameter and result name cleared.
    #[must_use]
    pub fn without_names(&self) -> Self {
        let strip = |p: &Parameter| Parameter::unnamed(p.ty.clone());
        Self {
            params: self.params.iter().map(strip).collect(),
            variadic: self.variadic.as_ref().map(strip),
            results: self.results.iter().map(strip).collect(),
        }
    }

    /// Substitutes type parameters in every parameter and result.
    #[must_use]
    pub fn substitute(&self, args: &HashMap<String, Type>) -> Self {
        let sub = |p: &Parameter| Parameter::new(p.name.clone(), p.ty.substitute(args));
        Self {
            params: self.params.iter().map(sub).collect(),
            variadic: self.variadic.as_ref().map(sub),
            results: self.results.iter().map(sub).collect(),
        }
    }
}

/// Struct literal type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructType {
    /// Ordered fields.
    pub fields: Vec<Field>,
}

impl StructType {
    /// Creates a struct type.
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Appends a field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }
}

/// Interface literal type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterfaceType {
    /// Embedded types (named interfaces or type-set unions).
    pub embeddeds: Vec<Type>,
    /// Methods declared directly in the literal.
    pub methods: Vec<Func>,
    /// Type parameters when the literal is generic.
    pub type_params: Vec<TypeParam>,
}

impl InterfaceType {
    /// Creates an interface type.
    #[must_use]
    pub fn new(embeddeds: Vec<Type>, methods: Vec<Func>) -> Self {
        Self {
            embeddeds,
            methods,
            type_params: Vec::new(),
        }
    }

    /// Creates a generic interface type.
    #[must_use]
    pub fn generic(embeddeds: Vec<Type>, methods: Vec<Func>, type_params: Vec<TypeParam>) -> Self {
        Self {
            embeddeds,
            methods,
            type_params,
        }
    }

    /// Returns true if the interface declares type parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Returns true for `interface{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.embeddeds.is_empty() && self.methods.is_empty()
    }
}

/// Function argument or result.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name; may be empty.
    pub name: String,
    /// Type.
    pub ty: Type,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Creates an unnamed parameter.
    #[must_use]
    pub fn unnamed(ty: Type) -> Self {
        Self {
            name: String::new(),
            ty,
        }
    }
}

/// Struct field. An empty name marks an embedded field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name; empty for embedded fields.
    pub name: String,
    /// Field type.
    pub ty: Type,
    /// Raw tag value without quotes.
    pub tag: Option<String>,
}

impl Field {
    /// Creates a named field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: None,
        }
    }

    /// Creates an embedded field.
    #[must_use]
    pub fn embedded(ty: Type) -> Self {
        Self {
            name: String::new(),
            ty,
            tag: None,
        }
    }

    /// Sets the tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.tag = (!tag.is_empty()).then_some(tag);
        self
    }

    /// Returns true for embedded fields.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chan_dir_prefix() {
        assert_eq!(ChanDir::SendRecv.prefix(), "chan ");
        assert_eq!(ChanDir::SendOnly.prefix(), "chan<- ");
        assert_eq!(ChanDir::RecvOnly.prefix(), "<-chan ");
    }

    #[test]
    fn test_type_param_as_type_arg_drops_constraint() {
        let param = TypeParam::new("T", Some(Constraint::Comparable.into_type()), 1);
        match param.as_type_arg() {
            Type::TypeParam(arg) => {
                assert_eq!(arg.name, "T");
                assert_eq!(arg.index, 1);
                assert!(arg.constraint.is_none());
            }
            other => panic!("unexpected type: {other:?}"),
        }
    }

    #[test]
    fn test_signature_without_names() {
        let sig = Signature::new(
            vec![Parameter::new("id", Type::basic("string"))],
            Some(Parameter::new("opts", Type::basic("int"))),
            vec![Parameter::new("err", Type::basic("error"))],
        );
        let stripped = sig.without_names();
        assert!(stripped.params.iter().all(|p| p.name.is_empty()));
        assert_eq!(stripped.variadic.as_ref().map(|p| p.name.as_str()), Some(""));
        assert_eq!(stripped.results[0].name, "");
        assert_eq!(stripped.arity(), 2);
    }

    #[test]
    fn test_substitute_replaces_params_deeply() {
        let t = TypeParam::new("T", None, 0);
        let ty = Type::map(
            Type::basic("string"),
            Type::slice(Type::pointer(Type::TypeParam(t))),
        );
        let mut args = HashMap::new();
        args.insert("T".to_string(), Type::basic("int"));

        let expected = Type::map(
            Type::basic("string"),
            Type::slice(Type::pointer(Type::basic("int"))),
        );
        assert_eq!(ty.substitute(&args), expected);
    }

    #[test]
    fn test_field_with_empty_tag_is_none() {
        let field = Field::new("Name", Type::basic("string")).with_tag("");
        assert!(field.tag.is_none());
        assert!(!field.is_embedded());
        assert!(Field::embedded(Type::basic("int")).is_embedded());
    }
}
