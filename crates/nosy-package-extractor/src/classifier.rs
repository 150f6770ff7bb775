//! Function classifier: splits declarations into constructors and ordinary targets.
//!
//! A constructor has no receiver and returns a named type (or a pointer to
//! one), optionally followed by an `error`. This is narrower than `go doc`,
//! which accepts any number of extra builtin results.

use nosy_types::{FunctionDescriptor, FunctionRole, TypeRef};

/// What a constructor produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorResult<'a> {
    /// The named type of the first result, with one pointer level stripped.
    pub named: &'a TypeRef,
    /// The second result is `error` and must be checked after the call.
    pub second_result_is_err: bool,
}

/// The named type returned by `f` if its results have constructor shape.
///
/// Allows a single result, or two results where the second is `error`. The
/// first result must be a named type or a pointer to one, otherwise it can
/// never match a receiver. Receivers are not inspected here.
pub fn constructor_result(f: &FunctionDescriptor) -> Option<ConstructorResult<'_>> {
    let second_result_is_err = match f.results.len() {
        1 => false,
        2 if f.results[1].ty.is_error() => true,
        _ => return None,
    };

    let named = f.results[0].ty.named_type()?;
    Some(ConstructorResult {
        named,
        second_result_is_err,
    })
}

/// Classify a declaration.
pub fn classify(f: &FunctionDescriptor) -> FunctionRole {
    if f.receiver.is_none() && constructor_result(f).is_some() {
        FunctionRole::Constructor
    } else {
        FunctionRole::Ordinary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosy_types::{BasicKind, PackageRef, Variable};

    fn demo() -> PackageRef {
        PackageRef::new("example.com/demo", "demo")
    }

    fn t() -> TypeRef {
        TypeRef::named(&demo(), "T")
    }

    fn result(ty: TypeRef) -> Variable {
        Variable::new("", ty)
    }

    #[test]
    fn test_pointer_result_is_constructor() {
        let f = FunctionDescriptor::new(&demo(), "NewT")
            .with_results(vec![result(TypeRef::pointer(t()))]);
        assert_eq!(classify(&f), FunctionRole::Constructor);

        let ctor = constructor_result(&f).unwrap();
        assert_eq!(ctor.named, &t());
        assert!(!ctor.second_result_is_err);
    }

    #[test]
    fn test_value_and_error_result_is_constructor() {
        let f = FunctionDescriptor::new(&demo(), "Open")
            .with_params(vec![Variable::new(
                "path",
                TypeRef::basic(BasicKind::String),
            )])
            .with_results(vec![result(t()), result(TypeRef::error())]);
        assert_eq!(classify(&f), FunctionRole::Constructor);
        assert!(constructor_result(&f).unwrap().second_result_is_err);
    }

    #[test]
    fn test_second_result_must_be_error() {
        let f = FunctionDescriptor::new(&demo(), "Pair").with_results(vec![
            result(t()),
            result(TypeRef::basic(BasicKind::Bool)),
        ]);
        assert_eq!(classify(&f), FunctionRole::Ordinary);
    }

    #[test]
    fn test_unnamed_result_is_not_constructor() {
        let f = FunctionDescriptor::new(&demo(), "Count")
            .with_results(vec![result(TypeRef::basic(BasicKind::Int))]);
        assert_eq!(classify(&f), FunctionRole::Ordinary);

        let f = FunctionDescriptor::new(&demo(), "Deep").with_results(vec![result(
            TypeRef::pointer(TypeRef::pointer(t())),
        )]);
        assert_eq!(classify(&f), FunctionRole::Ordinary);
    }

    #[test]
    fn test_arity_bounds() {
        let none = FunctionDescriptor::new(&demo(), "Init");
        assert_eq!(classify(&none), FunctionRole::Ordinary);

        let three = FunctionDescriptor::new(&demo(), "Three").with_results(vec![
            result(t()),
            result(TypeRef::error()),
            result(TypeRef::error()),
        ]);
        assert_eq!(classify(&three), FunctionRole::Ordinary);
    }

    #[test]
    fn test_methods_are_never_constructors() {
        let m = FunctionDescriptor::new(&demo(), "Clone")
            .with_receiver(Variable::new("t", TypeRef::pointer(t())))
            .with_results(vec![result(TypeRef::pointer(t()))]);
        assert!(constructor_result(&m).is_some());
        assert_eq!(classify(&m), FunctionRole::Ordinary);
    }
}
