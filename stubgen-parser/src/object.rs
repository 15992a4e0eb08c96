//! Target objects.
//!
//! Builds the [`Interface`] a generator works from: the flattened method set
//! of an interface type, or an interface synthesized from the method set of a
//! struct, promoted methods included.

use crate::error::ParseError;
use crate::types::{Scope, TypeParser};
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use stubgen_model::{
    Field, Func, Interface, NamedRef, NamedType, NamedTypeId, PkgInfo, Type, TypeParam, binding,
    type_args_of,
};

/// Suffix of interfaces synthesized from structs.
pub const STRUCT_INTERFACE_SUFFIX: &str = "Interface";

/// Returns true for exported Go identifiers.
#[must_use]
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Describes the kind of a type for error messages.
#[must_use]
pub fn kind_name(ty: &Type) -> &'static str {
    match ty {
        Type::Basic(_) => "basic type",
        Type::Array { len: Some(_), .. } => "array type",
        Type::Array { len: None, .. } => "slice type",
        Type::Chan { .. } => "channel type",
        Type::Interface(_) => "interface type",
        Type::Map { .. } => "map type",
        Type::Named(_) => "named type",
        Type::Pointer(_) => "pointer type",
        Type::Signature(_) => "func type",
        Type::Struct(_) => "struct type",
        Type::TypeParam(_) => "type parameter",
        Type::Constraint(_) => "constraint",
    }
}

/// A definition together with the type arguments it is used with.
struct Instance {
    id: NamedTypeId,
    def: NamedType,
    args: Vec<Type>,
    type_params: Vec<TypeParam>,
}

fn instance(tp: &TypeParser<'_>, named: &NamedRef) -> Result<Instance, ParseError> {
    let id = named
        .id
        .ok_or_else(|| ParseError::internal(format!("{} has no definition", named.name)))?;
    let def = tp
        .arena()
        .get(id)
        .cloned()
        .ok_or_else(|| ParseError::internal(format!("unknown type id {}", id.index())))?;
    // an uninstantiated generic type keeps its own parameters
    let (args, type_params) = if named.type_args.is_empty() && def.is_generic() {
        (type_args_of(&def.type_params), def.type_params.clone())
    } else {
        (named.type_args.clone(), Vec::new())
    };
    Ok(Instance {
        id,
        def,
        args,
        type_params,
    })
}

/// Builds the interface `name` of `pkg` from a reference to an interface type.
///
/// Methods are flattened through embedded interfaces, de-duplicated and
/// sorted by name.
///
/// # Errors
/// Returns `ParseError::Unsupported` if the type is not an interface, or
/// `ParseError::Model` if an embedded interface cannot be expanded.
pub fn interface_target(
    tp: &TypeParser<'_>,
    pkg: PkgInfo,
    name: &str,
    named: &NamedRef,
) -> Result<Interface, ParseError> {
    let inst = instance(tp, named)?;
    let bound = binding(&inst.def.type_params, &inst.args);
    let Some(Type::Interface(iface)) = inst.def.underlying.as_ref().map(|u| u.substitute(&bound))
    else {
        return Err(ParseError::Unsupported {
            name: name.to_string(),
            kind: inst.def.underlying.as_ref().map_or("opaque type", kind_name).to_string(),
        });
    };

    let mut methods = tp.arena().interface_methods(&iface)?;
    methods.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Interface::new(pkg, name, methods).with_type_params(inst.type_params))
}

/// Synthesizes `<name>Interface` from the exported methods of a struct.
///
/// Both value and pointer receivers count. Methods promoted through embedded
/// fields are included: a shallower method or field hides deeper ones, and a
/// name found twice at the same depth is dropped.
///
/// # Errors
/// Returns `ParseError::Unsupported` if the type is not a struct, or any
/// error from parsing method signatures.
pub fn struct_interface(
    tp: &mut TypeParser<'_>,
    pkg: PkgInfo,
    name: &str,
    named: &NamedRef,
) -> Result<Interface, ParseError> {
    let inst = instance(tp, named)?;
    let bound = binding(&inst.def.type_params, &inst.args);
    let Some(Type::Struct(st)) = inst.def.underlying.as_ref().map(|u| u.substitute(&bound)) else {
        return Err(ParseError::Unsupported {
            name: name.to_string(),
            kind: inst.def.underlying.as_ref().map_or("opaque type", kind_name).to_string(),
        });
    };

    let target = NamedRef {
        type_args: inst.args.clone(),
        ..named.clone()
    };
    let mut chosen: BTreeMap<String, Func> = BTreeMap::new();
    let mut blocked: HashSet<String> = HashSet::new();
    for func in declared_methods(tp, &target)? {
        blocked.insert(func.name.clone());
        chosen.insert(func.name.clone(), func);
    }

    let mut visited = HashSet::from([inst.id]);
    let mut level = Vec::new();
    for field in &st.fields {
        blocked.insert(field_name(field));
        if field.is_embedded() {
            level.push(field.ty.clone());
        }
    }

    while !level.is_empty() {
        let mut methods_here: BTreeMap<String, Vec<Func>> = BTreeMap::new();
        let mut fields_here: HashSet<String> = HashSet::new();
        let mut next = Vec::new();

        for ty in level {
            let base = match ty {
                Type::Pointer(inner) => *inner,
                other => other,
            };
            let Type::Named(embedded) = base else {
                continue;
            };
            let Some(id) = embedded.id else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }

            let found = match tp.arena().instantiated_underlying(&embedded) {
                Some(Type::Interface(iface)) => tp.arena().interface_methods(&iface)?,
                Some(Type::Struct(inner)) => {
                    for field in &inner.fields {
                        fields_here.insert(field_name(field));
                        if field.is_embedded() {
                            next.push(field.ty.clone());
                        }
                    }
                    declared_methods(tp, &embedded)?
                }
                _ => declared_methods(tp, &embedded)?,
            };
            for func in found {
                methods_here.entry(func.name.clone()).or_default().push(func);
            }
        }

        for (method, mut funcs) in methods_here {
            if blocked.contains(&method) {
                continue;
            }
            if funcs.len() == 1 && !fields_here.contains(&method) {
                if let Some(func) = funcs.pop() {
                    chosen.insert(method.clone(), func);
                }
            }
            blocked.insert(method);
        }
        blocked.extend(fields_here);
        level = next;
    }

    let methods: Vec<Func> = chosen.into_values().filter(|f| is_exported(&f.name)).collect();
    Ok(Interface::new(pkg, format!("{name}{STRUCT_INTERFACE_SUFFIX}"), methods)
        .with_type_params(inst.type_params))
}

/// Methods declared on a named type, value and pointer receivers alike, with
/// receiver type parameters bound to the reference's type arguments.
fn declared_methods(tp: &mut TypeParser<'_>, named: &NamedRef) -> Result<Vec<Func>, ParseError> {
    let Some(pkg) = tp.package(named.pkg_path()) else {
        return Ok(Vec::new());
    };
    let mut funcs = Vec::new();
    for (file, method) in pkg.methods_of(&named.name) {
        let params: Vec<TypeParam> = method
            .receiver
            .type_params
            .iter()
            .enumerate()
            .map(|(i, n)| TypeParam::new(n, None, i))
            .collect();
        let scope = Scope::new(Rc::clone(&pkg), file).with_type_params(&params);
        let sig = tp.parse_signature(&method.signature, &scope)?;
        let sig = sig.substitute(&binding(&params, &named.type_args));
        funcs.push(Func::new(&method.name, sig, ""));
    }
    Ok(funcs)
}

/// Selector name of a field: its name, or the type name when embedded.
fn field_name(field: &Field) -> String {
    if !field.is_embedded() {
        return field.name.clone();
    }
    match &field.ty {
        Type::Pointer(inner) => inner.as_named(),
        other => other.as_named(),
    }
    .map(|n| n.name.clone())
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildContext;
    use crate::loader::{GoPackage, Loader, LoaderConfig};
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(path, contents).expect("Failed to write file");
    }

    fn setup(source: &str) -> (tempfile::TempDir, Loader, Rc<GoPackage>) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        write(dir.path(), "go.mod", "module example.com/app\n\ngo 1.22\n");
        write(dir.path(), "p/p.go", source);
        let mut loader = Loader::new(LoaderConfig {
            stop_on_load_error: false,
            goroot: None,
            mod_cache: None,
            build: BuildContext::new("linux", "amd64"),
            builtin_stdlib: true,
        })
        .expect("Failed to create loader");
        let target = dir.path().join("p");
        let pkg = loader
            .load_target(target.to_str().expect("utf8 path"))
            .expect("Failed to load");
        (dir, loader, pkg)
    }

    fn names(iface: &Interface) -> Vec<&str> {
        iface.methods.iter().map(|m| m.name.as_str()).collect()
    }

    fn reference(tp: &mut TypeParser<'_>, pkg: &Rc<GoPackage>, name: &str) -> NamedRef {
        tp.resolve_decl(pkg, name, vec![])
            .expect("Failed to resolve")
            .as_named()
            .cloned()
            .expect("named")
    }

    #[test]
    fn test_interface_methods_flattened_and_sorted() {
        let (_dir, mut loader, pkg) = setup(
            "package p\n\nimport \"io\"\n\ntype Store interface {\n\tio.Closer\n\tPut(key string, v []byte) error\n\tGet(key string) ([]byte, error)\n}\n",
        );
        let mut tp = TypeParser::new(&mut loader);
        let named = reference(&mut tp, &pkg, "Store");
        let iface = interface_target(&tp, pkg.info(), "Store", &named).expect("Failed to build");
        assert_eq!(names(&iface), vec!["Close", "Get", "Put"]);
        assert!(!iface.is_generic());
    }

    #[test]
    fn test_generic_interface_keeps_type_params() {
        let (_dir, mut loader, pkg) = setup(
            "package p\n\ntype Repository[T any] interface {\n\tGet(id string) (T, error)\n\tSave(item T) error\n}\n\ntype Users = Repository[int]\n",
        );
        let mut tp = TypeParser::new(&mut loader);
        let named = reference(&mut tp, &pkg, "Repository");
        let iface = interface_target(&tp, pkg.info(), "Repository", &named).expect("Failed to build");
        assert_eq!(iface.type_params.len(), 1);
        assert_eq!(iface.type_params[0].name, "T");

        let named = reference(&mut tp, &pkg, "Users");
        let users = interface_target(&tp, pkg.info(), "Users", &named).expect("Failed to build");
        assert!(users.type_params.is_empty());
        assert_eq!(users.methods[1].signature.params[0].ty, Type::basic("int"));
    }

    #[test]
    fn test_struct_method_set_with_promotion() {
        let (_dir, mut loader, pkg) = setup(
            "package p\n\nimport \"io\"\n\ntype Base struct{}\n\nfunc (b *Base) ID() string { return \"\" }\nfunc (b Base) Name() string { return \"\" }\nfunc (b Base) Shared() int { return 0 }\n\ntype Other struct{}\n\nfunc (o Other) Shared() int { return 0 }\n\ntype Service struct {\n\t*Base\n\tOther\n\tio.Reader\n\tName string\n}\n\nfunc (s *Service) Run(n int) error { return nil }\nfunc (s Service) stop() {}\n",
        );
        let mut tp = TypeParser::new(&mut loader);
        let named = reference(&mut tp, &pkg, "Service");
        let iface = struct_interface(&mut tp, pkg.info(), "Service", &named).expect("Failed to build");
        assert_eq!(iface.name, "ServiceInterface");
        // Name is hidden by the field, Shared is ambiguous
        assert_eq!(names(&iface), vec!["ID", "Read", "Run"]);
    }

    #[test]
    fn test_generic_struct_maps_receiver_params() {
        let (_dir, mut loader, pkg) = setup(
            "package p\n\ntype Cache[K comparable, V any] struct {\n\titems map[K]V\n}\n\nfunc (c *Cache[K2, V2]) Get(key K2) (V2, bool) { var v V2; return v, false }\n",
        );
        let mut tp = TypeParser::new(&mut loader);
        let named = reference(&mut tp, &pkg, "Cache");
        let iface = struct_interface(&mut tp, pkg.info(), "Cache", &named).expect("Failed to build");
        assert_eq!(iface.type_params.len(), 2);
        let get = &iface.methods[0];
        assert_eq!(get.signature.params[0].ty, TypeParam::new("K", None, 0).as_type_arg());
        assert_eq!(get.signature.results[0].ty, TypeParam::new("V", None, 1).as_type_arg());
    }

    #[test]
    fn test_unsupported_kinds() {
        let (_dir, mut loader, pkg) = setup("package p\n\ntype Count int\n\ntype S struct{}\n");
        let mut tp = TypeParser::new(&mut loader);
        let named = reference(&mut tp, &pkg, "Count");
        assert!(matches!(
            interface_target(&tp, pkg.info(), "Count", &named),
            Err(ParseError::Unsupported { kind, .. }) if kind == "basic type"
        ));
        let named = reference(&mut tp, &pkg, "S");
        assert!(matches!(
            interface_target(&tp, pkg.info(), "S", &named),
            Err(ParseError::Unsupported { .. })
        ));
        assert!(is_exported("Run"));
        assert!(!is_exported("run"));
    }
}
