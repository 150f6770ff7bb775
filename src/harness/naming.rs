//! Collision-free identifiers for wrapper parameters.
//!
//! A wrapper's parameter list is the promoted constructor params (or the
//! receiver) followed by the target's params, and all of them share one
//! scope with the package name and the locals the wrapper body declares.

use std::collections::BTreeSet;

use nosy_types::Variable;

/// Names of `testing.T`, `testing.F` and the locals a wrapper body declares.
pub const DEFAULT_RESERVED_NAMES: &[&str] = &[
    "t",
    "f",
    "fz",
    "data",
    "target",
    "steps",
    "result1",
    "result2",
    "tmp1",
    "tmp2",
    "constraints",
    "tp",
    "fill_err",
    "err",
];

/// Identifiers a parameter may never keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNames {
    names: BTreeSet<String>,
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self {
            names: DEFAULT_RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReservedNames {
    /// The default set plus `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().extended(extra)
    }

    /// A copy of this set that also reserves `extra`.
    pub fn extended<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut reserved = self.clone();
        reserved.names.extend(extra.into_iter().map(Into::into));
        reserved
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

pub struct NameResolver<'a> {
    package_name: &'a str,
    reserved: &'a ReservedNames,
}

impl<'a> NameResolver<'a> {
    pub fn new(package_name: &'a str, reserved: &'a ReservedNames) -> Self {
        Self {
            package_name,
            reserved,
        }
    }

    /// Identifier for `var` at `index` in the wrapper's parameter list.
    ///
    /// Placeholders become `_x<index+1>`. A name that shadows the package, a
    /// reserved name, or another parameter in `all` becomes its first
    /// character followed by `index+1`. Anything else is kept.
    pub fn resolve(&self, var: &Variable, index: usize, all: &[&Variable]) -> String {
        if var.is_placeholder() {
            return format!("_x{}", index + 1);
        }
        if self.collides(var, all) {
            return collision_name(&var.name, index);
        }
        var.name.clone()
    }

    /// Identifiers for every parameter in `all`, pairwise distinct.
    ///
    /// Kept names are exactly those [`resolve`](Self::resolve) keeps. A
    /// generated name that is already taken gets a `_<n>` suffix with the
    /// smallest free `n`.
    pub fn resolve_all(&self, all: &[&Variable]) -> Vec<String> {
        let raw: Vec<(String, bool)> = all
            .iter()
            .enumerate()
            .map(|(i, var)| {
                let name = self.resolve(var, i, all);
                let kept = !var.is_placeholder() && name == var.name;
                (name, kept)
            })
            .collect();

        let mut used: BTreeSet<String> = raw
            .iter()
            .filter(|(_, kept)| *kept)
            .map(|(name, _)| name.clone())
            .collect();

        raw.into_iter()
            .map(|(name, kept)| {
                if kept {
                    return name;
                }
                let name = self.first_free(name, &used);
                used.insert(name.clone());
                name
            })
            .collect()
    }

    /// Identifier for a local that is not itself a parameter (the receiver
    /// built by a constructor call), distinct from every identifier in `taken`.
    pub fn resolve_local(
        &self,
        var: &Variable,
        index: usize,
        all: &[&Variable],
        taken: &[String],
    ) -> String {
        let name = self.resolve(var, index, all);
        let used: BTreeSet<String> = taken.iter().cloned().collect();
        self.first_free(name, &used)
    }

    fn collides(&self, var: &Variable, all: &[&Variable]) -> bool {
        var.name == self.package_name
            || self.reserved.contains(&var.name)
            || all.iter().any(|p| p.id != var.id && p.name == var.name)
    }

    fn is_free(&self, name: &str, used: &BTreeSet<String>) -> bool {
        !used.contains(name) && !self.reserved.contains(name) && name != self.package_name
    }

    fn first_free(&self, name: String, used: &BTreeSet<String>) -> String {
        if self.is_free(&name, used) {
            return name;
        }
        (1..)
            .map(|n| format!("{}_{}", name, n))
            .find(|candidate| self.is_free(candidate, used))
            .unwrap_or(name)
    }
}

fn collision_name(name: &str, index: usize) -> String {
    match name.chars().next() {
        Some(first) => format!("{}{}", first, index + 1),
        None => format!("_x{}", index + 1),
    }
}
