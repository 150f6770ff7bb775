//! Go-syntax rendering of type references.
//!
//! Rendering is parameterized by a [`Qualifier`] that decides how a named
//! type's package is spelled: the full import path for diagnostics and sort
//! keys, the package name for generated code, or nothing for types local to
//! the file being generated.

use std::fmt;

use crate::type_ref::{BasicKind, ChanDir, Field, Method, PackageRef, TypeRef};

/// Decides the prefix written before a named type from `package`.
///
/// An empty prefix renders the type unqualified.
pub trait Qualifier {
    fn qualify(&mut self, package: &PackageRef) -> String;

    /// Called with the name of every named type rendered without a prefix.
    fn unqualified(&mut self, _name: &str) {}
}

/// Qualifies with the full import path (`github.com/org/pkg.Type`).
#[derive(Debug, Default, Clone, Copy)]
pub struct FullPath;

impl Qualifier for FullPath {
    fn qualify(&mut self, package: &PackageRef) -> String {
        package.path.clone()
    }
}

/// Qualifies with the package name (`pkg.Type`).
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageName;

impl Qualifier for PackageName {
    fn qualify(&mut self, package: &PackageRef) -> String {
        package.name.clone()
    }
}

impl TypeRef {
    /// Render this type as Go source.
    pub fn render<Q: Qualifier + ?Sized>(&self, q: &mut Q) -> String {
        match self {
            TypeRef::Basic {
                basic: BasicKind::UnsafePointer,
            } => {
                let prefix = q.qualify(&PackageRef::new("unsafe", "unsafe"));
                if prefix.is_empty() {
                    "Pointer".to_string()
                } else {
                    format!("{}.Pointer", prefix)
                }
            }
            TypeRef::Basic { basic } => basic.go_name().to_string(),
            TypeRef::Pointer { elem } => format!("*{}", elem.render(q)),
            TypeRef::Slice { elem } => format!("[]{}", elem.render(q)),
            TypeRef::Array { len, elem } => format!("[{}]{}", len, elem.render(q)),
            TypeRef::Map { key, value } => {
                format!("map[{}]{}", key.render(q), value.render(q))
            }
            TypeRef::Struct { fields } => render_struct(fields, q),
            TypeRef::Interface { methods, embeds } => render_interface(methods, embeds, q),
            TypeRef::Named {
                package,
                name,
                type_args,
            } => {
                let prefix = match package {
                    Some(pkg) => q.qualify(pkg),
                    None => String::new(),
                };
                let mut out = if prefix.is_empty() {
                    q.unqualified(name);
                    name.clone()
                } else {
                    format!("{}.{}", prefix, name)
                };
                if !type_args.is_empty() {
                    let args: Vec<String> = type_args.iter().map(|t| t.render(q)).collect();
                    out.push_str(&format!("[{}]", args.join(", ")));
                }
                out
            }
            TypeRef::Signature {
                params,
                results,
                variadic,
            } => format!("func{}", render_signature_tail(params, results, *variadic, q)),
            TypeRef::Chan { dir, elem } => match dir {
                ChanDir::Both => format!("chan {}", elem.render(q)),
                ChanDir::Send => format!("chan<- {}", elem.render(q)),
                ChanDir::Recv => format!("<-chan {}", elem.render(q)),
            },
        }
    }
}

/// Renders `(params) results`, the part of a signature after `func` or a method name.
pub fn render_signature_tail<Q: Qualifier + ?Sized>(
    params: &[TypeRef],
    results: &[TypeRef],
    variadic: bool,
    q: &mut Q,
) -> String {
    let last = params.len().saturating_sub(1);
    let params_str: Vec<String> = params
        .iter()
        .enumerate()
        .map(|(i, t)| match t {
            TypeRef::Slice { elem } if variadic && i == last => format!("...{}", elem.render(q)),
            _ => t.render(q),
        })
        .collect();

    let results_str = match results.len() {
        0 => String::new(),
        1 => format!(" {}", results[0].render(q)),
        _ => {
            let rs: Vec<String> = results.iter().map(|t| t.render(q)).collect();
            format!(" ({})", rs.join(", "))
        }
    };

    format!("({}){}", params_str.join(", "), results_str)
}

fn render_struct<Q: Qualifier + ?Sized>(fields: &[Field], q: &mut Q) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|f| {
            if f.embedded || f.name.is_empty() {
                f.ty.render(q)
            } else {
                format!("{} {}", f.name, f.ty.render(q))
            }
        })
        .collect();
    format!("struct{{{}}}", parts.join("; "))
}

fn render_interface<Q: Qualifier + ?Sized>(
    methods: &[Method],
    embeds: &[TypeRef],
    q: &mut Q,
) -> String {
    let mut parts: Vec<String> = methods
        .iter()
        .map(|m| {
            format!(
                "{}{}",
                m.name,
                render_signature_tail(&m.params, &m.results, m.variadic, q)
            )
        })
        .collect();
    parts.extend(embeds.iter().map(|t| t.render(q)));
    format!("interface{{{}}}", parts.join("; "))
}

/// Fully qualified form, matching Go's `types.TypeString(t, nil)`.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&mut FullPath))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_ref::BasicKind;

    fn io() -> PackageRef {
        PackageRef::new("io", "io")
    }

    fn store() -> PackageRef {
        PackageRef::new("github.com/acme/db/store", "store")
    }

    #[test]
    fn test_render_composites() {
        let ty = TypeRef::map(
            TypeRef::basic(BasicKind::String),
            TypeRef::slice(TypeRef::pointer(TypeRef::named(&store(), "Row"))),
        );
        assert_eq!(ty.to_string(), "map[string][]*github.com/acme/db/store.Row");
        assert_eq!(ty.render(&mut PackageName), "map[string][]*store.Row");
    }

    #[test]
    fn test_render_signature_and_chan() {
        let ty = TypeRef::Signature {
            params: vec![
                TypeRef::basic(BasicKind::Int),
                TypeRef::slice(TypeRef::basic(BasicKind::String)),
            ],
            results: vec![TypeRef::basic(BasicKind::Bool), TypeRef::error()],
            variadic: true,
        };
        assert_eq!(ty.to_string(), "func(int, ...string) (bool, error)");

        let ch = TypeRef::Chan {
            dir: ChanDir::Recv,
            elem: Box::new(TypeRef::basic(BasicKind::Byte)),
        };
        assert_eq!(ch.to_string(), "<-chan byte");
    }

    #[test]
    fn test_render_struct_and_interface() {
        let st = TypeRef::Struct {
            fields: vec![
                Field {
                    name: "n".to_string(),
                    ty: TypeRef::basic(BasicKind::Int),
                    embedded: false,
                },
                Field {
                    name: String::new(),
                    ty: TypeRef::named(&io(), "Reader"),
                    embedded: true,
                },
            ],
        };
        assert_eq!(st.render(&mut PackageName), "struct{n int; io.Reader}");
        assert_eq!(TypeRef::empty_interface().to_string(), "interface{}");
    }

    #[test]
    fn test_custom_qualifier_can_drop_prefix() {
        struct Local;
        impl Qualifier for Local {
            fn qualify(&mut self, package: &PackageRef) -> String {
                if package.path == "github.com/acme/db/store" {
                    String::new()
                } else {
                    package.name.clone()
                }
            }
        }
        let ty = TypeRef::map(
            TypeRef::named(&store(), "Key"),
            TypeRef::named(&io(), "Reader"),
        );
        assert_eq!(ty.render(&mut Local), "map[Key]io.Reader");
    }
}
