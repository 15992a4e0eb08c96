//! Top-level declarations of a generated file.
//!
//! A file is a sequence of [`Contents`]: interface declarations, struct
//! declarations together with their methods, and plain functions.

use crate::pkgmap::{PackageMap, PkgInfo};
use crate::print::{
    indent_block, render_fields_block, render_method_spec, render_type_params_decl,
};
use crate::types::{Field, NamedRef, Parameter, Signature, Type, TypeParam, type_args_of};
use std::collections::HashMap;

/// Function with a name, signature and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    /// Function name.
    pub name: String,
    /// Function signature.
    pub signature: Signature,
    /// Body statements, one per line, without indentation.
    pub body: String,
}

impl Func {
    /// Creates a function.
    #[must_use]
    pub fn new(name: impl Into<String>, signature: Signature, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature,
            body: body.into(),
        }
    }

    /// Renders the `Name(params) results` form used in interface bodies.
    #[must_use]
    pub fn render_def(&self, my_pkg_path: &str, pm: &PackageMap) -> String {
        render_method_spec(self, my_pkg_path, pm)
    }

    /// Renders the function declaration with its body.
    #[must_use]
    pub fn render(&self, my_pkg_path: &str, pm: &PackageMap) -> String {
        format!("func {}{}", self.render_def(my_pkg_path, pm), self.render_body())
    }

    /// Returns a copy with type parameters substituted in the signature.
    #[must_use]
    pub fn substitute(&self, args: &HashMap<String, Type>) -> Self {
        Self {
            name: self.name.clone(),
            signature: self.signature.substitute(args),
            body: self.body.clone(),
        }
    }

    fn render_body(&self) -> String {
        if self.body.is_empty() {
            " {\n}".to_string()
        } else {
            format!(" {{\n{}\n}}", indent_block(&self.body))
        }
    }
}

/// Method: a function with a receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Receiver parameter.
    pub receiver: Parameter,
    /// Name, signature and body.
    pub func: Func,
}

impl Method {
    /// Creates a method.
    #[must_use]
    pub fn new(receiver: Parameter, func: Func) -> Self {
        Self { receiver, func }
    }

    /// Renders `func (recv T) Name(params) results { body }`.
    #[must_use]
    pub fn render(&self, my_pkg_path: &str, pm: &PackageMap) -> String {
        format!(
            "func ({}) {}{}",
            self.receiver.render(my_pkg_path, pm),
            self.func.render_def(my_pkg_path, pm),
            self.func.render_body()
        )
    }
}

/// Named interface declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    /// Declaring package.
    pub pkg: PkgInfo,
    /// Interface name.
    pub name: String,
    /// Type parameters with constraints.
    pub type_params: Vec<TypeParam>,
    /// Embedded interfaces.
    pub embeddeds: Vec<Type>,
    /// Explicit methods, in declaration order.
    pub methods: Vec<Func>,
}

impl Interface {
    /// Creates a non-generic interface.
    #[must_use]
    pub fn new(pkg: PkgInfo, name: impl Into<String>, methods: Vec<Func>) -> Self {
        Self {
            pkg,
            name: name.into(),
            type_params: Vec::new(),
            embeddeds: Vec::new(),
            methods,
        }
    }

    /// Sets the type parameters.
    #[must_use]
    pub fn with_type_params(mut self, type_params: Vec<TypeParam>) -> Self {
        self.type_params = type_params;
        self
    }

    /// Returns true if the interface declares type parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Returns a use of this interface parameterised by its own type parameters.
    #[must_use]
    pub fn named_ref(&self) -> Type {
        Type::Named(
            NamedRef::new(Some(self.pkg.clone()), &self.name)
                .with_type_args(type_args_of(&self.type_params)),
        )
    }

    /// Renders `type Name[T any] interface { ... }`.
    #[must_use]
    pub fn render(&self, my_pkg_path: &str, pm: &PackageMap) -> String {
        let mut output = format!(
            "type {}{} interface",
            self.name,
            render_type_params_decl(&self.type_params, my_pkg_path, pm)
        );
        if self.embeddeds.is_empty() && self.methods.is_empty() {
            output.push_str("{}");
            return output;
        }

        output.push_str(" {\n");
        for embedded in &self.embeddeds {
            output.push('\t');
            output.push_str(&embedded.render(my_pkg_path, pm));
            output.push('\n');
        }
        for method in &self.methods {
            output.push('\t');
            output.push_str(&method.render_def(my_pkg_path, pm));
            output.push('\n');
        }
        output.push('}');
        output
    }
}

/// Named struct declaration together with its methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    /// Declaring package.
    pub pkg: PkgInfo,
    /// Struct name.
    pub name: String,
    /// Type parameters with constraints.
    pub type_params: Vec<TypeParam>,
    /// Ordered fields.
    pub fields: Vec<Field>,
    /// Methods, printed after the declaration in insertion order.
    pub methods: Vec<Method>,
}

impl Struct {
    /// Creates an empty struct.
    #[must_use]
    pub fn new(pkg: PkgInfo, name: impl Into<String>) -> Self {
        Self {
            pkg,
            name: name.into(),
            type_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Sets the type parameters.
    #[must_use]
    pub fn with_type_params(mut self, type_params: Vec<TypeParam>) -> Self {
        self.type_params = type_params;
        self
    }

    /// Appends a field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Appends a method.
    pub fn add_method(&mut self, method: Method) {
        self.methods.push(method);
    }

    /// Returns true if the struct declares type parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Returns a use of this struct parameterised by its own type parameters.
    #[must_use]
    pub fn named_ref(&self) -> Type {
        Type::Named(
            NamedRef::new(Some(self.pkg.clone()), &self.name)
                .with_type_args(type_args_of(&self.type_params)),
        )
    }

    /// Renders the type declaration followed by every method.
    #[must_use]
    pub fn render(&self, my_pkg_path: &str, pm: &PackageMap) -> String {
        let mut output = format!(
            "type {}{} struct",
            self.name,
            render_type_params_decl(&self.type_params, my_pkg_path, pm)
        );
        if self.fields.is_empty() {
            output.push_str("{}");
        } else {
            output.push_str(" {\n");
            output.push_str(&render_fields_block(&self.fields, my_pkg_path, pm));
            output.push_str("\n}");
        }

        for method in &self.methods {
            output.push_str("\n\n");
            output.push_str(&method.render(my_pkg_path, pm));
        }
        output
    }
}

/// A top-level declaration of a generated file.
#[derive(Debug, Clone, PartialEq)]
pub enum Contents {
    /// Interface declaration.
    Interface(Interface),
    /// Struct declaration with methods.
    Struct(Struct),
    /// Plain function.
    Func(Func),
}

impl Contents {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Interface(i) => &i.name,
            Self::Struct(s) => &s.name,
            Self::Func(f) => &f.name,
        }
    }

    /// Renders the declaration as Go source.
    #[must_use]
    pub fn render(&self, my_pkg_path: &str, pm: &PackageMap) -> String {
        match self {
            Self::Interface(i) => i.render(my_pkg_path, pm),
            Self::Struct(s) => s.render(my_pkg_path, pm),
            Self::Func(f) => f.render(my_pkg_path, pm),
        }
    }
}
