//! Package and function ignore rules.

use std::collections::BTreeSet;

use nosy_types::{FunctionDescriptor, PackageDescriptor, TypeRef, TypeUniverse, Variable};

use crate::config::HarnessConfig;

pub struct TargetFilter<'a> {
    config: &'a HarnessConfig,
    universe: &'a TypeUniverse,
    ignore_types: BTreeSet<&'a str>,
}

impl<'a> TargetFilter<'a> {
    pub fn new(config: &'a HarnessConfig, universe: &'a TypeUniverse) -> Self {
        Self {
            config,
            universe,
            ignore_types: config.ignore_types.iter().map(String::as_str).collect(),
        }
    }

    /// Import path contains an `ignore_packages` substring.
    pub fn package_is_ignored(&self, pkg: &PackageDescriptor) -> bool {
        self.config
            .ignore_packages
            .iter()
            .any(|ignored| pkg.import_path().contains(ignored.as_str()))
    }

    /// Not ignored, and at least one ordinary function is includable.
    pub fn package_is_includable(&self, pkg: &PackageDescriptor) -> bool {
        !self.package_is_ignored(pkg)
            && pkg.functions.iter().any(|f| self.function_is_includable(f))
    }

    pub fn function_is_includable(&self, f: &FunctionDescriptor) -> bool {
        if self.has_interface_receiver(f) {
            return false;
        }
        let key = format!("{}.{}", f.package.name, f.name);
        if self.config.ignore_functions.iter().any(|ignored| *ignored == key) {
            return false;
        }
        f.receiver
            .iter()
            .chain(f.params.iter())
            .all(|v| self.parameter_is_includable(v))
    }

    /// False when the type mentions a named type listed in `ignore_types`.
    pub fn parameter_is_includable(&self, v: &Variable) -> bool {
        if self.ignore_types.is_empty() {
            return true;
        }
        let mut excluded = false;
        v.ty.walk(&mut |t| {
            if excluded {
                return;
            }
            if let TypeRef::Named { name, .. } = t {
                let qualified = t.qualified_name().unwrap_or_default();
                excluded = self.ignore_types.contains(qualified.as_str())
                    || self.ignore_types.contains(name.as_str());
            }
        });
        !excluded
    }

    /// Methods declared on interface types dispatch dynamically; there is
    /// nothing concrete to construct.
    fn has_interface_receiver(&self, f: &FunctionDescriptor) -> bool {
        f.receiver
            .as_ref()
            .is_some_and(|r| self.universe.is_interface(&r.ty))
    }
}
