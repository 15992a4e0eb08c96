//! Mock and stub generation.
//!
//! For an interface `Name` this produces:
//! - `MockName`: embeds the interface and holds one `FakeM` function field per
//!   method; each method delegates to its field.
//! - `StubName`: one `StubM` result holder per method, a `FakeM` method per
//!   method returning the held results, and `NewMock` building a `MockName`
//!   wired to those methods.
//! - `StubM`: result holders with fields `R0, R1, ...`.

use stubgen_model::{
    Field, File, Func, Interface, Method, Package, Parameter, PkgInfo, Signature, Struct, Type,
};

/// Receiver name of mock methods.
const MOCK_RECEIVER: &str = "m";
/// Receiver name of stub methods.
const STUB_RECEIVER: &str = "s";
/// Prefix of positional parameter names.
const ARG_PREFIX: &str = "a";

/// Returns the name of the function field backing a method.
#[must_use]
pub fn fake_name(method: &str) -> String {
    format!("Fake{method}")
}

/// Returns the name of the result holder of a method.
#[must_use]
pub fn stub_name(method: &str) -> String {
    format!("Stub{method}")
}

/// Generator for mocks and stubs of one interface.
pub struct MockGenerator<'a> {
    target: &'a Package,
    iface: &'a Interface,
    out: PkgInfo,
}

impl<'a> MockGenerator<'a> {
    /// Creates a new mock generator writing into the package `out`.
    #[must_use]
    pub fn new(target: &'a Package, iface: &'a Interface, out: PkgInfo) -> Self {
        Self { target, iface, out }
    }

    /// Returns the mock struct name.
    #[must_use]
    pub fn mock_name(&self) -> String {
        format!("Mock{}", self.iface.name)
    }

    /// Returns the stub root struct name.
    #[must_use]
    pub fn stub_root_name(&self) -> String {
        stub_name(&self.iface.name)
    }

    /// Generates the file holding the mock, the stub root and the result holders.
    #[must_use]
    pub fn generate(&self, path: &str) -> File {
        let mut file = File::new(
            path,
            &self.out.name,
            &self.out.path,
            self.target.copy_dependencies(),
        );
        self.generate_into(&mut file);
        file
    }

    /// Appends the mock, the stub root and the result holders to `file`.
    pub fn generate_into(&self, file: &mut File) {
        let mock = self.generate_mock();
        let (root, holders) = self.generate_stubs(&mock);
        file.add_struct(mock);
        file.add_struct(root);
        for holder in holders {
            file.add_struct(holder);
        }
        file.tidy();
    }

    /// Generates the mock struct and its delegating methods.
    #[must_use]
    pub fn generate_mock(&self) -> Struct {
        let mut mock = self.new_struct(self.mock_name());
        mock.add_field(Field::embedded(self.iface.named_ref()));

        let recv = self.unclaimed(MOCK_RECEIVER, |taken, name| taken == name);
        let prefix = self.arg_prefix();
        let receiver = Parameter::new(&recv, mock.named_ref());
        for method in &self.iface.methods {
            let fake = fake_name(&method.name);
            mock.add_field(Field::new(
                &fake,
                Type::signature(method.signature.without_names()),
            ));

            let signature = positional(&method.signature, &prefix);
            let call = format!("{recv}.{fake}({})", call_args(&signature));
            let body = if signature.results.is_empty() {
                call
            } else {
                format!("return {call}")
            };
            mock.add_method(Method::new(
                receiver.clone(),
                Func::new(&method.name, signature, body),
            ));
        }
        mock
    }

    /// Generates the stub root and one result holder per method.
    #[must_use]
    pub fn generate_stubs(&self, mock: &Struct) -> (Struct, Vec<Struct>) {
        let mut root = self.new_struct(self.stub_root_name());
        let recv = self.unclaimed(STUB_RECEIVER, |taken, name| taken == name);
        let prefix = self.arg_prefix();
        let receiver = Parameter::new(&recv, root.named_ref());

        let mut holders = Vec::with_capacity(self.iface.methods.len());
        let mut stub_methods = Vec::with_capacity(self.iface.methods.len());
        let mut bindings = Vec::with_capacity(self.iface.methods.len());

        for method in &self.iface.methods {
            let mut holder = self.new_struct(stub_name(&method.name));
            for (i, result) in method.signature.results.iter().enumerate() {
                holder.add_field(Field::new(format!("R{i}"), result.ty.clone()));
            }
            root.add_field(Field::new(&method.name, holder.named_ref()));

            let fake = fake_name(&method.name);
            let returned: Vec<String> = holder
                .fields
                .iter()
                .map(|f| format!("{recv}.{}.{}", method.name, f.name))
                .collect();
            let body = if returned.is_empty() {
                String::new()
            } else {
                format!("return {}", returned.join(", "))
            };
            stub_methods.push(Method::new(
                receiver.clone(),
                Func::new(&fake, positional(&method.signature, &prefix), body),
            ));
            bindings.push(format!("{fake}: {recv}.{fake}"));
            holders.push(holder);
        }
        bindings.sort();

        let literal = format!("{}{}", mock.name, type_arg_names(mock));
        let new_mock = Func::new(
            "NewMock",
            Signature::new(
                Vec::new(),
                None,
                vec![Parameter::unnamed(Type::pointer(mock.named_ref()))],
            ),
            format!("return &{literal}{{{}}}", bindings.join(", ")),
        );
        root.add_method(Method::new(receiver, new_mock));
        for method in stub_methods {
            root.add_method(method);
        }
        (root, holders)
    }

    fn new_struct(&self, name: String) -> Struct {
        Struct::new(self.out.clone(), name).with_type_params(self.iface.type_params.clone())
    }

    /// Returns `base`, suffixed with `_` until no type parameter name is
    /// `claims`-matched by it.
    fn unclaimed(&self, base: &str, claims: impl Fn(&str, &str) -> bool) -> String {
        let mut name = base.to_string();
        while self.iface.type_params.iter().any(|p| claims(&p.name, &name)) {
            name.push('_');
        }
        name
    }

    /// Prefix of positional parameter names that no type parameter shares.
    fn arg_prefix(&self) -> String {
        self.unclaimed(ARG_PREFIX, |taken, prefix| {
            taken
                .strip_prefix(prefix)
                .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        })
    }
}

/// Renames parameters to `<prefix>0, <prefix>1, ...` and drops result names.
fn positional(sig: &Signature, prefix: &str) -> Signature {
    let params: Vec<Parameter> = sig
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| Parameter::new(format!("{prefix}{i}"), p.ty.clone()))
        .collect();
    let variadic = sig
        .variadic
        .as_ref()
        .map(|p| Parameter::new(format!("{prefix}{}", params.len()), p.ty.clone()));
    let results = sig
        .results
        .iter()
        .map(|r| Parameter::unnamed(r.ty.clone()))
        .collect();
    Signature::new(params, variadic, results)
}

/// Call arguments for a signature, spreading the variadic parameter.
fn call_args(sig: &Signature) -> String {
    let mut args: Vec<String> = sig.params.iter().map(|p| p.name.clone()).collect();
    if let Some(variadic) = &sig.variadic {
        args.push(format!("{}...", variadic.name));
    }
    args.join(", ")
}

fn type_arg_names(st: &Struct) -> String {
    if st.type_params.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = st.type_params.iter().map(|p| p.name.as_str()).collect();
    format!("[{}]", names.join(", "))
}
