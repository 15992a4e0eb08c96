//! Interface generation from a struct's method set.

use stubgen_model::{File, Interface, Package, PkgInfo};

/// Generator re-declaring an extracted interface in the output package.
pub struct InterfaceGenerator<'a> {
    target: &'a Package,
    iface: &'a Interface,
    out: PkgInfo,
    name: Option<String>,
}

impl<'a> InterfaceGenerator<'a> {
    /// Creates a new interface generator writing into the package `out`.
    #[must_use]
    pub fn new(target: &'a Package, iface: &'a Interface, out: PkgInfo) -> Self {
        Self {
            target,
            iface,
            out,
            name: None,
        }
    }

    /// Overrides the generated interface name.
    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|n| !n.is_empty());
        self
    }

    /// Returns the generated interface name.
    #[must_use]
    pub fn interface_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.iface.name)
    }

    /// Generates the interface declaration.
    #[must_use]
    pub fn generate_interface(&self) -> Interface {
        let mut iface = self.iface.clone();
        iface.pkg = self.out.clone();
        iface.name = self.interface_name().to_string();
        iface
    }

    /// Generates the file holding the interface.
    #[must_use]
    pub fn generate(&self, path: &str) -> File {
        let mut file = File::new(
            path,
            &self.out.name,
            &self.out.path,
            self.target.copy_dependencies(),
        );
        file.add_interface(self.generate_interface());
        file.tidy();
        file
    }
}
