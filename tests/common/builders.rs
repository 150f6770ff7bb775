//! In-memory packages for emitter tests.

use nosy_package_extractor::ExtractedModel;
use nosy_types::{
    BasicKind, FunctionDescriptor, PackageDescriptor, PackageRef, TypeRef, TypeUniverse, Variable,
};

pub fn demo() -> PackageRef {
    PackageRef::new("example.com/demo", "demo")
}

/// `*demo.T`
pub fn t_ptr() -> TypeRef {
    TypeRef::pointer(TypeRef::named(&demo(), "T"))
}

pub fn param(name: &str, ty: TypeRef) -> Variable {
    Variable::new(name, ty)
}

pub fn int(name: &str) -> Variable {
    param(name, TypeRef::basic(BasicKind::Int))
}

pub fn string(name: &str) -> Variable {
    param(name, TypeRef::basic(BasicKind::String))
}

pub fn function(name: &str, params: Vec<Variable>) -> FunctionDescriptor {
    FunctionDescriptor::new(&demo(), name).with_params(params)
}

pub fn method(recv: Variable, name: &str, params: Vec<Variable>) -> FunctionDescriptor {
    FunctionDescriptor::new(&demo(), name)
        .with_receiver(recv)
        .with_params(params)
}

/// `T` and `CustomStruct` are empty structs in `demo`.
pub fn universe() -> TypeUniverse {
    let mut u = TypeUniverse::new();
    u.declare(&demo(), "T", TypeRef::empty_struct());
    u.declare(&demo(), "CustomStruct", TypeRef::empty_struct());
    u
}

/// A `demo` package; functions are classified on insertion.
pub fn package_of(functions: Vec<FunctionDescriptor>) -> PackageDescriptor {
    let mut pkg = PackageDescriptor::new(demo());
    for f in functions {
        let role = nosy_package_extractor::classify(&f);
        pkg.add(f.with_role(role));
    }
    pkg
}

pub fn model_of(packages: Vec<PackageDescriptor>) -> ExtractedModel {
    ExtractedModel {
        packages,
        universe: universe(),
    }
}
