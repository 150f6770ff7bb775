//! Import collection for generated harness files.
//!
//! [`ImportSet`] is the [`Qualifier`] used while rendering wrapper types, so
//! every package a rendered type mentions is recorded as a side effect.

use std::collections::{BTreeMap, BTreeSet};

use nosy_types::{PackageRef, Qualifier};

use crate::utils::short_hash;

pub const TESTING_PATH: &str = "testing";
pub const GO_FUZZ_UTILS_PATH: &str = "github.com/trailofbits/go-fuzz-utils";
pub const GO_FUZZ_UTILS_ALIAS: &str = "go_fuzz_utils";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Import {
    path: String,
    /// Identifier the file uses for the package.
    ident: String,
    /// Written before the path when `ident` is not the package's own name.
    alias: Option<String>,
}

impl Import {
    fn import_line(&self) -> String {
        match &self.alias {
            Some(alias) => format!("\t{} \"{}\"", alias, self.path),
            None => format!("\t\"{}\"", self.path),
        }
    }
}

/// Imports of one generated file.
#[derive(Debug, Clone)]
pub struct ImportSet {
    /// Package the file is compiled into; its types are written unqualified.
    local: Option<String>,
    by_path: BTreeMap<String, Import>,
    /// ident -> path
    idents: BTreeMap<String, String>,
    /// Identifiers handed out or rendered unqualified since the last
    /// [`take_touched`](Self::take_touched).
    touched: BTreeSet<String>,
}

impl ImportSet {
    /// An import set for a file inside `local` (pass `None` for an external
    /// test package). Always imports `testing` and go-fuzz-utils.
    pub fn new(local: Option<&PackageRef>) -> Self {
        let mut set = Self {
            local: local.map(|p| p.path.clone()),
            by_path: BTreeMap::new(),
            idents: BTreeMap::new(),
            touched: BTreeSet::new(),
        };
        set.add(TESTING_PATH, "testing", None);
        set.add(
            GO_FUZZ_UTILS_PATH,
            GO_FUZZ_UTILS_ALIAS,
            Some(GO_FUZZ_UTILS_ALIAS.to_string()),
        );
        set
    }

    /// Identifier to use for `package`, importing it if needed.
    ///
    /// A package whose name is already bound to another path is imported as
    /// `<name>_<hash>`.
    pub fn import(&mut self, package: &PackageRef) -> String {
        if let Some(existing) = self.by_path.get(&package.path) {
            let ident = existing.ident.clone();
            self.touched.insert(ident.clone());
            return ident;
        }

        let (ident, alias) = if self.idents.contains_key(&package.name) {
            let alias = format!("{}_{}", package.name, short_hash(&package.path));
            (alias.clone(), Some(alias))
        } else {
            (package.name.clone(), None)
        };
        self.add(&package.path, &ident, alias);
        self.touched.insert(ident.clone());
        ident
    }

    /// Package and type identifiers used since the previous call.
    pub fn take_touched(&mut self) -> BTreeSet<String> {
        std::mem::take(&mut self.touched)
    }

    /// `import ( ... )` block, one import per line, sorted by path.
    pub fn import_block(&self) -> Vec<String> {
        let mut lines = vec!["import (".to_string()];
        lines.extend(self.by_path.values().map(Import::import_line));
        lines.push(")".to_string());
        lines
    }

    fn add(&mut self, path: &str, ident: &str, alias: Option<String>) {
        self.idents.insert(ident.to_string(), path.to_string());
        self.by_path.insert(
            path.to_string(),
            Import {
                path: path.to_string(),
                ident: ident.to_string(),
                alias,
            },
        );
    }
}

impl Qualifier for ImportSet {
    fn qualify(&mut self, package: &PackageRef) -> String {
        if self.local.as_deref() == Some(package.path.as_str()) {
            return String::new();
        }
        self.import(package)
    }

    /// Local and predeclared type names are identifiers the wrapper needs too.
    fn unqualified(&mut self, name: &str) {
        self.touched.insert(name.to_string());
    }
}
