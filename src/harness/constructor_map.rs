//! Constructor Map: finds functions that can build a method's receiver.
//!
//! When a method's receiver type has a constructor, the wrapper calls the
//! constructor and takes the constructor's parameters as fuzz inputs instead
//! of taking the receiver itself:
//!
//! ```text
//! f.Fuzz(func(t *testing.T, s string, b []byte) {
//!     r := strings.NewReader(s)
//!     r.Read(b)
//! })
//! ```

use std::collections::BTreeMap;

use nosy_package_extractor::constructor_result;
use nosy_types::{FunctionDescriptor, Variable};

/// A constructor selected for a receiver.
#[derive(Debug, Clone, Copy)]
pub struct ConstructorMatch<'a> {
    pub constructor: &'a FunctionDescriptor,
    /// The constructor returns `(T, error)`; the wrapper must check `err`.
    pub second_result_is_err: bool,
}

impl<'a> ConstructorMatch<'a> {
    /// Parameters promoted into the wrapper signature.
    pub fn params(&self) -> &'a [Variable] {
        &self.constructor.params
    }
}

/// Constructors keyed by the fully qualified named type they return.
///
/// Each key keeps its candidates in insertion order, so the first inserted
/// candidate for a type is the one that matches.
#[derive(Debug, Default)]
pub struct ConstructorMap<'a> {
    by_result: BTreeMap<String, Vec<ConstructorMatch<'a>>>,
}

impl<'a> ConstructorMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from candidates in the order they should be preferred.
    pub fn from_constructors<I>(constructors: I) -> Self
    where
        I: IntoIterator<Item = &'a FunctionDescriptor>,
    {
        let mut map = Self::new();
        for ctor in constructors {
            map.insert(ctor);
        }
        map
    }

    /// Add a candidate. Returns false if it does not return a named type.
    pub fn insert(&mut self, constructor: &'a FunctionDescriptor) -> bool {
        let Some(result) = constructor_result(constructor) else {
            return false;
        };
        self.by_result
            .entry(result.named.to_string())
            .or_default()
            .push(ConstructorMatch {
                constructor,
                second_result_is_err: result.second_result_is_err,
            });
        true
    }

    pub fn len(&self) -> usize {
        self.by_result.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_result.is_empty()
    }

    /// First constructor whose result type is the receiver's named type.
    pub fn lookup(&self, receiver: &Variable) -> Option<ConstructorMatch<'a>> {
        let named = receiver.ty.named_type()?;
        self.by_result
            .get(&named.to_string())
            .and_then(|candidates| candidates.first())
            .copied()
    }

    /// The matching constructor, if any, and the parameters the wrapper must
    /// take to stand in for the receiver: the constructor's params on a match,
    /// otherwise the receiver itself.
    pub fn match_receiver<'r>(
        &self,
        receiver: &'r Variable,
    ) -> (Option<ConstructorMatch<'a>>, Vec<&'r Variable>)
    where
        'a: 'r,
    {
        match self.lookup(receiver) {
            Some(found) => (Some(found), found.params().iter().collect()),
            None => (None, vec![receiver]),
        }
    }
}
