use std::fs;
use std::path::Path;
use stubgen::{CodegenError, InterfaceOptions, MockOptions, OutputTarget, run_interface, run_mock};

fn write(dir: &Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create dir");
    }
    fs::write(path, contents).expect("Failed to write file");
}

const SHAPES: &str = "package shapes

type Node struct {
\tParent   *Node
\tChildren []*Node
}

func (n *Node) Walk(fn func(*Node) bool) {}

func (n *Node) Root() *Node { return n }

type Base struct{}

func (b Base) ID() string { return \"\" }

type Tree struct {
\t*Node
\tBase
\tname string
}

func (t *Tree) Name() string { return t.name }

type Sizer interface {
\tSize() int
}

type Measurer interface {
\tSizer
\tMeasure(unit string, values ...float64) (float64, bool)
}
";

fn module() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write(dir.path(), "go.mod", "module example.com/app\n\ngo 1.22\n");
    write(dir.path(), "shapes/shapes.go", SHAPES);
    dir
}

fn pkg(dir: &tempfile::TempDir) -> String {
    dir.path().join("shapes").display().to_string()
}

#[test]
fn test_interface_with_promoted_methods() {
    let dir = module();
    let source = run_interface(&InterfaceOptions {
        pkg: pkg(&dir),
        type_name: "Tree".to_string(),
        name: None,
        output: OutputTarget::default(),
        stop_on_load_error: true,
    })
    .expect("Failed to generate interface");

    assert!(source.ends_with(
        "package shapes

type TreeInterface interface {
\tID() string
\tName() string
\tRoot() *Node
\tWalk(fn func(*Node) bool)
}
"
    ));
}

#[test]
fn test_mock_of_struct_declares_interface() {
    let dir = module();
    let source = run_mock(&MockOptions {
        pkg: pkg(&dir),
        type_name: "Tree".to_string(),
        output: OutputTarget::default(),
        stop_on_load_error: true,
    })
    .expect("Failed to generate mock");

    assert!(source.contains("// Mock for example.com/app/shapes.TreeInterface\n"));
    let iface = source.find("type TreeInterface interface").expect("interface missing");
    let mock = source.find("type MockTreeInterface struct").expect("mock missing");
    assert!(iface < mock);
    assert!(source.contains("func (m MockTreeInterface) Walk(a0 func(*Node) bool) {\n\tm.FakeWalk(a0)\n}"));
}

#[test]
fn test_mock_of_embedding_interface() {
    let dir = module();
    let source = run_mock(&MockOptions {
        pkg: pkg(&dir),
        type_name: "Measurer".to_string(),
        output: OutputTarget {
            outpkg: "fakes".to_string(),
            ..OutputTarget::default()
        },
        stop_on_load_error: false,
    })
    .expect("Failed to generate mock");

    assert!(source.contains("package fakes\n\nimport (\n\t\"example.com/app/shapes\"\n)\n"));
    assert!(source.contains(
        "type MockMeasurer struct {\n\tshapes.Measurer\n\tFakeMeasure func(string, ...float64) (float64, bool)\n\tFakeSize    func() int\n}"
    ));
    assert!(source.contains(
        "func (m MockMeasurer) Measure(a0 string, a1 ...float64) (float64, bool) {\n\treturn m.FakeMeasure(a0, a1...)\n}"
    ));
    assert!(source.contains("\treturn &MockMeasurer{FakeMeasure: s.FakeMeasure, FakeSize: s.FakeSize}\n"));
    assert!(source.contains("func (s StubMeasurer) FakeSize() int {\n\treturn s.Size.R0\n}"));
}

#[test]
fn test_output_is_deterministic() {
    let dir = module();
    let options = MockOptions {
        pkg: pkg(&dir),
        type_name: "Measurer".to_string(),
        output: OutputTarget::default(),
        stop_on_load_error: false,
    };
    let first = run_mock(&options).expect("Failed to generate mock");
    let second = run_mock(&options).expect("Failed to generate mock");
    assert_eq!(first, second);
}

#[test]
fn test_unsupported_target() {
    let dir = module();
    write(dir.path(), "shapes/kinds.go", "package shapes\n\ntype Kind int\n");
    let err = run_mock(&MockOptions {
        pkg: pkg(&dir),
        type_name: "Kind".to_string(),
        output: OutputTarget::default(),
        stop_on_load_error: false,
    })
    .expect_err("basic types cannot be mocked");
    assert!(matches!(err, CodegenError::Parse(_)));
    assert!(!err.is_usage());
}

#[test]
fn test_mock_of_interface_embedding_defined_interface() {
    let dir = module();
    write(
        dir.path(),
        "shapes/clone.go",
        "package shapes\n\ntype Cloner interface {\n\tClone() Copier\n}\n\ntype Copier Cloner\n\ntype Both interface {\n\tCloner\n\tCopier\n\tExtra()\n}\n",
    );
    let source = run_mock(&MockOptions {
        pkg: pkg(&dir),
        type_name: "Both".to_string(),
        output: OutputTarget::default(),
        stop_on_load_error: false,
    })
    .expect("Failed to generate mock");

    assert!(source.contains("\tFakeClone func() Copier\n"));
    assert!(source.contains("\tFakeExtra func()\n"));
}
