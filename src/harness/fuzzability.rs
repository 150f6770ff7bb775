//! Fuzzability analysis: how well can `go test -fuzz` supply each parameter.
//!
//! `testing.F` only accepts a handful of native argument types. Anything else
//! has to be decoded from a byte slice by a go-fuzz-utils type provider, and
//! funcs, chans and most interfaces cannot be produced at all.

use std::collections::BTreeSet;

use nosy_types::{BasicKind, TypeRef, TypeUniverse, Variable};
use serde::Serialize;

/// Interfaces a go-fuzz-utils type provider knows how to fill.
pub const DEFAULT_SUPPORTED_INTERFACES: &[&str] = &[
    "io.Reader",
    "io.Writer",
    "io.ReaderAt",
    "io.WriterTo",
    "io.Seeker",
    "io.ByteScanner",
    "io.RuneScanner",
    "io.ReadSeeker",
    "io.ByteReader",
    "io.RuneReader",
    "io.ByteWriter",
    "io.ReadWriter",
    "io.ReaderFrom",
    "io.StringWriter",
    "io.Closer",
    "io.ReadCloser",
    "context.Context",
];

/// Matches Go's `stripPointers` bound.
const MAX_POINTER_DEPTH: usize = 10;

/// Support tier, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSupport {
    /// At least one parameter cannot be produced.
    NoSupport,
    /// Parameters must be filled from `data []byte`.
    FillRequired,
    /// `f.Fuzz` can take every parameter directly.
    NativeSupport,
}

/// Tier for a parameter list plus the type that forced `NoSupport`, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportReport {
    pub tier: ParamSupport,
    pub offending_type: Option<String>,
}

impl SupportReport {
    fn supported(tier: ParamSupport) -> Self {
        Self {
            tier,
            offending_type: None,
        }
    }
}

pub struct FuzzabilityAnalyzer<'a> {
    universe: &'a TypeUniverse,
    supported_interfaces: BTreeSet<String>,
}

impl<'a> FuzzabilityAnalyzer<'a> {
    /// Analyzer with the default interface allow-list.
    pub fn new(universe: &'a TypeUniverse) -> Self {
        Self::with_supported_interfaces(
            universe,
            DEFAULT_SUPPORTED_INTERFACES.iter().map(|s| s.to_string()),
        )
    }

    pub fn with_supported_interfaces(
        universe: &'a TypeUniverse,
        interfaces: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            universe,
            supported_interfaces: interfaces.into_iter().collect(),
        }
    }

    /// Weakest tier across `params`. An empty list is natively supported.
    ///
    /// Stops at the first parameter that cannot be supported and reports its
    /// full type string.
    pub fn classify_params<'v, I>(&self, params: I) -> SupportReport
    where
        I: IntoIterator<Item = &'v Variable>,
    {
        let mut tier = ParamSupport::NativeSupport;
        for param in params {
            match self.classify_type(&param.ty) {
                Some(t) => tier = tier.min(t),
                None => {
                    return SupportReport {
                        tier: ParamSupport::NoSupport,
                        offending_type: Some(param.ty.to_string()),
                    }
                }
            }
        }
        SupportReport::supported(tier)
    }

    /// Tier of a single type; `None` when it can never be produced.
    pub fn classify_type(&self, ty: &TypeRef) -> Option<ParamSupport> {
        let mut tier = ParamSupport::NativeSupport;

        let (mut t, stripped) = self.strip_pointers(ty);
        if stripped {
            tier = tier.min(ParamSupport::FillRequired);
        }
        if t.is_named() {
            tier = tier.min(ParamSupport::FillRequired);
        }

        // Unresolved named types are opaque: no shape to dispatch on.
        match self.universe.underlying(t) {
            Some(TypeRef::Slice { elem }) => {
                let byte_elem = matches!(elem.as_ref(), TypeRef::Basic { basic } if basic.is_byte());
                if !byte_elem {
                    tier = tier.min(ParamSupport::FillRequired);
                }
                t = elem.as_ref();
            }
            Some(TypeRef::Array { elem, .. }) => {
                tier = tier.min(ParamSupport::FillRequired);
                t = elem.as_ref();
            }
            Some(TypeRef::Map { value, .. }) => {
                tier = tier.min(ParamSupport::FillRequired);
                t = value.as_ref();
            }
            Some(TypeRef::Struct { .. }) => {
                tier = tier.min(ParamSupport::FillRequired);
            }
            Some(TypeRef::Basic {
                basic:
                    BasicKind::Uintptr
                    | BasicKind::UnsafePointer
                    | BasicKind::Complex64
                    | BasicKind::Complex128,
            }) => {
                tier = tier.min(ParamSupport::FillRequired);
            }
            _ => {}
        }

        match self.universe.underlying(t) {
            Some(TypeRef::Interface { .. }) => {
                if !self.supported_interfaces.contains(&t.to_string()) {
                    return None;
                }
                tier = tier.min(ParamSupport::FillRequired);
            }
            Some(TypeRef::Signature { .. }) | Some(TypeRef::Chan { .. }) => return None,
            _ => {}
        }

        Some(tier)
    }

    /// Follow pointers through underlying types, reporting whether any were removed.
    fn strip_pointers<'t>(&'t self, ty: &'t TypeRef) -> (&'t TypeRef, bool) {
        let mut current = ty;
        let mut stripped = false;
        for _ in 0..=MAX_POINTER_DEPTH {
            match self.universe.underlying(current) {
                Some(TypeRef::Pointer { elem }) => {
                    current = elem.as_ref();
                    stripped = true;
                }
                _ => break,
            }
        }
        (current, stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosy_types::PackageRef;

    fn demo() -> PackageRef {
        PackageRef::new("example.com/demo", "demo")
    }

    fn io() -> PackageRef {
        PackageRef::new("io", "io")
    }

    fn universe() -> TypeUniverse {
        let mut u = TypeUniverse::new();
        u.declare(&demo(), "Config", TypeRef::empty_struct());
        u.declare(&demo(), "Celsius", TypeRef::basic(BasicKind::Float64));
        u.declare(&demo(), "Handler", TypeRef::func(vec![], vec![]));
        u.declare(&demo(), "Shape", TypeRef::empty_interface());
        u.declare(&io(), "Reader", TypeRef::empty_interface());
        u
    }

    fn var(ty: TypeRef) -> Variable {
        Variable::new("v", ty)
    }

    fn tier(u: &TypeUniverse, tys: Vec<TypeRef>) -> ParamSupport {
        let vars: Vec<Variable> = tys.into_iter().map(var).collect();
        FuzzabilityAnalyzer::new(u).classify_params(&vars).tier
    }

    #[test]
    fn test_empty_list_is_native() {
        let u = universe();
        assert_eq!(tier(&u, vec![]), ParamSupport::NativeSupport);
    }

    #[test]
    fn test_basics_and_byte_slices_are_native() {
        let u = universe();
        assert_eq!(
            tier(
                &u,
                vec![
                    TypeRef::basic(BasicKind::Int),
                    TypeRef::basic(BasicKind::String),
                    TypeRef::basic(BasicKind::Bool),
                    TypeRef::slice(TypeRef::basic(BasicKind::Byte)),
                    TypeRef::slice(TypeRef::basic(BasicKind::Uint8)),
                ]
            ),
            ParamSupport::NativeSupport
        );
    }

    #[test]
    fn test_composites_require_fill() {
        let u = universe();
        let cases = vec![
            TypeRef::pointer(TypeRef::basic(BasicKind::Int)),
            TypeRef::slice(TypeRef::basic(BasicKind::String)),
            TypeRef::array(4, TypeRef::basic(BasicKind::Byte)),
            TypeRef::map(
                TypeRef::basic(BasicKind::String),
                TypeRef::basic(BasicKind::Int),
            ),
            TypeRef::empty_struct(),
            TypeRef::named(&demo(), "Config"),
            TypeRef::named(&demo(), "Celsius"),
            TypeRef::basic(BasicKind::Complex128),
            TypeRef::basic(BasicKind::Uintptr),
        ];
        for ty in cases {
            assert_eq!(
                tier(&u, vec![ty.clone()]),
                ParamSupport::FillRequired,
                "{}",
                ty
            );
        }
    }

    #[test]
    fn test_named_byte_slice_element_is_not_native() {
        let mut u = universe();
        u.declare(&demo(), "Octet", TypeRef::basic(BasicKind::Byte));
        let ty = TypeRef::slice(TypeRef::named(&demo(), "Octet"));
        assert_eq!(tier(&u, vec![ty]), ParamSupport::FillRequired);
    }

    #[test]
    fn test_func_and_chan_short_circuit() {
        let u = universe();
        let vars = vec![
            var(TypeRef::basic(BasicKind::Int)),
            var(TypeRef::func(vec![], vec![])),
            var(TypeRef::empty_struct()),
        ];
        let report = FuzzabilityAnalyzer::new(&u).classify_params(&vars);
        assert_eq!(report.tier, ParamSupport::NoSupport);
        assert_eq!(report.offending_type.as_deref(), Some("func()"));

        assert_eq!(
            tier(&u, vec![TypeRef::chan(TypeRef::basic(BasicKind::Int))]),
            ParamSupport::NoSupport
        );
        assert_eq!(
            tier(&u, vec![TypeRef::named(&demo(), "Handler")]),
            ParamSupport::NoSupport
        );
    }

    #[test]
    fn test_interfaces_need_allow_list() {
        let u = universe();
        let reader = TypeRef::named(&io(), "Reader");
        assert_eq!(tier(&u, vec![reader.clone()]), ParamSupport::FillRequired);
        assert_eq!(
            tier(&u, vec![TypeRef::slice(reader)]),
            ParamSupport::FillRequired
        );
        assert_eq!(
            tier(&u, vec![TypeRef::named(&demo(), "Shape")]),
            ParamSupport::NoSupport
        );
        assert_eq!(tier(&u, vec![TypeRef::error()]), ParamSupport::NoSupport);
        assert_eq!(
            tier(
                &u,
                vec![TypeRef::map(
                    TypeRef::basic(BasicKind::String),
                    TypeRef::empty_interface()
                )]
            ),
            ParamSupport::NoSupport
        );
    }

    #[test]
    fn test_custom_allow_list() {
        let u = universe();
        let analyzer =
            FuzzabilityAnalyzer::with_supported_interfaces(&u, vec!["example.com/demo.Shape".to_string()]);
        let report = analyzer.classify_params(&[var(TypeRef::named(&demo(), "Shape"))]);
        assert_eq!(report.tier, ParamSupport::FillRequired);
        let report = analyzer.classify_params(&[var(TypeRef::named(&io(), "Reader"))]);
        assert_eq!(report.tier, ParamSupport::NoSupport);
    }

    #[test]
    fn test_unresolved_named_type_is_opaque() {
        let u = universe();
        let ty = TypeRef::pointer(TypeRef::named(&demo(), "Unknown"));
        assert_eq!(tier(&u, vec![ty]), ParamSupport::FillRequired);
    }

    #[test]
    fn test_weakest_tier_wins() {
        let u = universe();
        assert_eq!(
            tier(
                &u,
                vec![TypeRef::basic(BasicKind::Int), TypeRef::empty_struct()]
            ),
            ParamSupport::FillRequired
        );
    }
}
