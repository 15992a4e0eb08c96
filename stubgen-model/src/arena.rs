//! Arena of named type definitions.
//!
//! Named types may refer to themselves, directly or through other types.
//! They are stored once per `(package path, name)` in a [`TypeArena`] and
//! referenced by [`NamedTypeId`]. A definition is allocated as a placeholder
//! first and its underlying type is filled in once it has been parsed.

use crate::contents::Func;
use crate::error::ModelError;
use crate::pkgmap::PkgInfo;
use crate::types::{InterfaceType, NamedRef, Type, TypeParam};
use std::collections::{HashMap, HashSet};

/// Handle to a named type in a [`TypeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedTypeId(u32);

impl NamedTypeId {
    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Definition of a named type.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    /// Declaring package; `None` for predeclared types.
    pub pkg: Option<PkgInfo>,
    /// Type name.
    pub name: String,
    /// Declared type parameters, with constraints.
    pub type_params: Vec<TypeParam>,
    /// Underlying type; `None` while parsing or when the package is opaque.
    pub underlying: Option<Type>,
}

impl NamedType {
    /// Returns true if the type declares type parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Returns the import path of the declaring package, empty when predeclared.
    #[must_use]
    pub fn pkg_path(&self) -> &str {
        self.pkg.as_ref().map_or("", |p| p.path.as_str())
    }
}

/// Storage for named type definitions.
#[derive(Debug, Clone, Default)]
pub struct TypeArena {
    named: Vec<NamedType>,
}

impl TypeArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a placeholder with no underlying type.
    pub fn alloc(&mut self, pkg: Option<PkgInfo>, name: impl Into<String>) -> NamedTypeId {
        let id = NamedTypeId(u32::try_from(self.named.len()).unwrap_or(u32::MAX));
        self.named.push(NamedType {
            pkg,
            name: name.into(),
            type_params: Vec::new(),
            underlying: None,
        });
        id
    }

    /// Returns a definition.
    #[must_use]
    pub fn get(&self, id: NamedTypeId) -> Option<&NamedType> {
        self.named.get(id.0 as usize)
    }

    /// Returns a mutable definition.
    pub fn get_mut(&mut self, id: NamedTypeId) -> Option<&mut NamedType> {
        self.named.get_mut(id.0 as usize)
    }

    /// Fills a placeholder in place.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownId` if `id` is not from this arena.
    pub fn fill(
        &mut self,
        id: NamedTypeId,
        type_params: Vec<TypeParam>,
        underlying: Option<Type>,
    ) -> Result<(), ModelError> {
        let node = self
            .named
            .get_mut(id.0 as usize)
            .ok_or(ModelError::UnknownId { id: id.0 })?;
        node.type_params = type_params;
        node.underlying = underlying;
        Ok(())
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.named.len()
    }

    /// Returns true if the arena holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }

    /// Iterates over all definitions with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NamedTypeId, &NamedType)> {
        self.named
            .iter()
            .enumerate()
            .map(|(i, n)| (NamedTypeId(i as u32), n))
    }

    /// Finds a definition by package path and name.
    #[must_use]
    pub fn find(&self, pkg_path: &str, name: &str) -> Option<NamedTypeId> {
        self.iter()
            .find(|(_, n)| n.pkg_path() == pkg_path && n.name == name)
            .map(|(id, _)| id)
    }

    /// Builds a reference to a definition.
    #[must_use]
    pub fn reference(&self, id: NamedTypeId, type_args: Vec<Type>) -> Type {
        let (pkg, name) = self
            .get(id)
            .map(|n| (n.pkg.clone(), n.name.clone()))
            .unwrap_or_default();
        Type::Named(NamedRef {
            id: Some(id),
            pkg,
            name,
            type_args,
        })
    }

    /// Returns the underlying type of a reference with its type arguments applied.
    #[must_use]
    pub fn instantiated_underlying(&self, named: &NamedRef) -> Option<Type> {
        let def = self.get(named.id?)?;
        let underlying = def.underlying.as_ref()?;
        Some(underlying.substitute(&binding(&def.type_params, &named.type_args)))
    }

    /// Returns the full method set of an interface, embedded methods first.
    ///
    /// Methods are de-duplicated by name; the first occurrence wins.
    ///
    /// # Errors
    /// Returns `ModelError` if an embedded type is opaque, is not an
    /// interface, or embeds itself.
    pub fn interface_methods(&self, iface: &InterfaceType) -> Result<Vec<Func>, ModelError> {
        let mut methods = Vec::new();
        let mut seen = HashSet::new();
        let mut visiting = HashSet::new();
        self.collect_interface_methods(iface, &mut methods, &mut seen, &mut visiting)?;
        Ok(methods)
    }

    fn collect_interface_methods(
        &self,
        iface: &InterfaceType,
        methods: &mut Vec<Func>,
        seen: &mut HashSet<String>,
        visiting: &mut HashSet<NamedTypeId>,
    ) -> Result<(), ModelError> {
        for embedded in &iface.embeddeds {
            match embedded {
                Type::Named(named) => {
                    let Some(id) = named.id else {
                        return Err(ModelError::OpaqueEmbedded {
                            name: named.name.clone(),
                        });
                    };
                    if !visiting.insert(id) {
                        return Err(ModelError::EmbeddingCycle {
                            name: named.name.clone(),
                        });
                    }
                    match self.instantiated_underlying(named) {
                        Some(Type::Interface(inner)) => {
                            self.collect_interface_methods(&inner, methods, seen, visiting)?;
                        }
                        Some(_) => {
                            return Err(ModelError::NotAnInterface {
                                name: named.name.clone(),
                            });
                        }
                        None => {
                            return Err(ModelError::OpaqueEmbedded {
                                name: named.name.clone(),
                            });
                        }
                    }
                    visiting.remove(&id);
                }
                Type::Interface(inner) => {
                    self.collect_interface_methods(inner, methods, seen, visiting)?;
                }
                // type-set terms carry no methods
                _ => {}
            }
        }
        for method in &iface.methods {
            if seen.insert(method.name.clone()) {
                methods.push(method.clone());
            }
        }
        Ok(())
    }
}

/// Maps type parameter names to type arguments, position by position.
#[must_use]
pub fn binding(params: &[TypeParam], args: &[Type]) -> HashMap<String, Type> {
    params
        .iter()
        .zip(args)
        .map(|(p, a)| (p.name.clone(), a.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Parameter, Signature};

    fn method(name: &str, result: Type) -> Func {
        Func::new(
            name,
            Signature::new(vec![], None, vec![Parameter::unnamed(result)]),
            "",
        )
    }

    #[test]
    fn test_alloc_and_fill() {
        let mut arena = TypeArena::new();
        let pkg = PkgInfo::new("sample", "example.com/sample", "");
        let id = arena.alloc(Some(pkg), "Node");
        assert!(arena.get(id).is_some_and(|n| n.underlying.is_none()));

        arena
            .fill(id, vec![], Some(Type::basic("int")))
            .expect("fill failed");
        assert_eq!(
            arena.get(id).and_then(|n| n.underlying.clone()),
            Some(Type::basic("int"))
        );
        assert_eq!(arena.find("example.com/sample", "Node"), Some(id));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_interface_methods_flattens_embedded() {
        let mut arena = TypeArena::new();
        let pkg = PkgInfo::new("io", "io", "");
        let reader = arena.alloc(Some(pkg.clone()), "Reader");
        arena
            .fill(
                reader,
                vec![],
                Some(Type::Interface(InterfaceType::new(
                    vec![],
                    vec![method("Read", Type::basic("int"))],
                ))),
            )
            .expect("fill failed");

        let iface = InterfaceType::new(
            vec![arena.reference(reader, vec![])],
            vec![
                method("Close", Type::basic("error")),
                method("Read", Type::basic("int")),
            ],
        );
        let names: Vec<String> = arena
            .interface_methods(&iface)
            .expect("flatten failed")
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Read", "Close"]);
    }

    #[test]
    fn test_interface_methods_substitutes_type_args() {
        let mut arena = TypeArena::new();
        let getter = arena.alloc(None, "Getter");
        let t = TypeParam::new("T", Some(Type::Constraint(crate::Constraint::Any)), 0);
        arena
            .fill(
                getter,
                vec![t.clone()],
                Some(Type::Interface(InterfaceType::new(
                    vec![],
                    vec![method("Get", t.as_type_arg())],
                ))),
            )
            .expect("fill failed");

        let iface = InterfaceType::new(
            vec![arena.reference(getter, vec![Type::basic("string")])],
            vec![],
        );
        let methods = arena.interface_methods(&iface).expect("flatten failed");
        assert_eq!(methods[0].signature.results[0].ty, Type::basic("string"));
    }

    #[test]
    fn test_interface_methods_opaque_embedded() {
        let mut arena = TypeArena::new();
        let opaque = arena.alloc(Some(PkgInfo::new("x", "example.com/x", "")), "Thing");
        let iface = InterfaceType::new(vec![arena.reference(opaque, vec![])], vec![]);
        assert_eq!(
            arena.interface_methods(&iface),
            Err(ModelError::OpaqueEmbedded {
                name: "Thing".to_string()
            })
        );
    }
}
