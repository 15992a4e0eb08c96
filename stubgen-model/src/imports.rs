//! Import discovery.
//!
//! Walks types and declarations and marks every package they reference as
//! required in a [`PackageMap`].

use crate::contents::{Contents, Func, Interface, Struct};
use crate::pkgmap::PackageMap;
use crate::types::{Constraint, Signature, Type, TypeParam};

impl Type {
    /// Marks every package referenced by this type as required.
    pub fn collect_imports(&self, pm: &mut PackageMap) {
        match self {
            Self::Basic(_) | Self::Constraint(Constraint::Any | Constraint::Comparable) => {}
            Self::Array { elem, .. } | Self::Chan { elem, .. } | Self::Pointer(elem) => {
                elem.collect_imports(pm);
            }
            Self::Interface(iface) => {
                collect_type_params(&iface.type_params, pm);
                for embedded in &iface.embeddeds {
                    embedded.collect_imports(pm);
                }
                for method in &iface.methods {
                    method.collect_imports(pm);
                }
            }
            Self::Map { key, value } => {
                key.collect_imports(pm);
                value.collect_imports(pm);
            }
            Self::Named(named) => {
                if let Some(pkg) = &named.pkg {
                    pm.add_if_absent(&pkg.path, pkg.clone());
                    pm.set_required(&pkg.path, true);
                }
                for arg in &named.type_args {
                    arg.collect_imports(pm);
                }
            }
            Self::Signature(sig) => sig.collect_imports(pm),
            Self::Struct(st) => {
                for field in &st.fields {
                    field.ty.collect_imports(pm);
                }
            }
            Self::TypeParam(param) => {
                if let Some(constraint) = &param.constraint {
                    constraint.collect_imports(pm);
                }
            }
            Self::Constraint(Constraint::Union(terms)) => {
                for term in terms {
                    term.ty.collect_imports(pm);
                }
            }
        }
    }
}

impl Signature {
    /// Marks every package referenced by parameters and results as required.
    pub fn collect_imports(&self, pm: &mut PackageMap) {
        for param in self.params.iter().chain(&self.variadic).chain(&self.results) {
            param.ty.collect_imports(pm);
        }
    }
}

impl Func {
    /// Marks every package referenced by the signature as required.
    pub fn collect_imports(&self, pm: &mut PackageMap) {
        self.signature.collect_imports(pm);
    }
}

fn collect_type_params(params: &[TypeParam], pm: &mut PackageMap) {
    for param in params {
        if let Some(constraint) = &param.constraint {
            constraint.collect_imports(pm);
        }
    }
}

impl Interface {
    fn collect_imports(&self, pm: &mut PackageMap) {
        collect_type_params(&self.type_params, pm);
        for embedded in &self.embeddeds {
            embedded.collect_imports(pm);
        }
        for method in &self.methods {
            method.collect_imports(pm);
        }
    }
}

impl Struct {
    fn collect_imports(&self, pm: &mut PackageMap) {
        collect_type_params(&self.type_params, pm);
        for field in &self.fields {
            field.ty.collect_imports(pm);
        }
        for method in &self.methods {
            method.receiver.ty.collect_imports(pm);
            method.func.collect_imports(pm);
        }
    }
}

impl Contents {
    /// Marks every package the declaration references as required.
    pub fn collect_imports(&self, pm: &mut PackageMap) {
        match self {
            Self::Interface(i) => i.collect_imports(pm),
            Self::Struct(s) => s.collect_imports(pm),
            Self::Func(f) => f.collect_imports(pm),
        }
    }
}
