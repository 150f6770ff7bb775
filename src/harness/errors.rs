//! Per-target skip taxonomy.
//!
//! | Code | Reason |
//! |------|--------|
//! | S001 | No receiver, constructor params or params to fuzz |
//! | S002 | A parameter is a func, chan or unsupported interface |
//! | S003 | Method receiver is not a (pointer to a) named type |
//! | S004 | Wrapper name already emitted in this package |
//!
//! Skips are never fatal: the target is left out of the artifact and the
//! manifest, and the package carries on.

use serde::Serialize;
use thiserror::Error;

use super::fuzzability::ParamSupport;

/// Why a target produced no wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("S001: {function} has 0 input params")]
    ZeroUsableParameters { function: String },

    #[error("S002: {function} takes {type_string}")]
    UnsupportedParameterKind {
        function: String,
        type_string: String,
    },

    #[error("S003: {function} has receiver {type_string}, expected pointer or named type")]
    UnresolvedReceiver {
        function: String,
        type_string: String,
    },

    #[error("S004: {function} would redefine {wrapper}")]
    DuplicateWrapperName { function: String, wrapper: String },
}

impl SkipReason {
    /// Stable code, e.g. `S002`.
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::ZeroUsableParameters { .. } => "S001",
            SkipReason::UnsupportedParameterKind { .. } => "S002",
            SkipReason::UnresolvedReceiver { .. } => "S003",
            SkipReason::DuplicateWrapperName { .. } => "S004",
        }
    }

    /// Qualified name of the skipped target.
    pub fn function(&self) -> &str {
        match self {
            SkipReason::ZeroUsableParameters { function }
            | SkipReason::UnsupportedParameterKind { function, .. }
            | SkipReason::UnresolvedReceiver { function, .. }
            | SkipReason::DuplicateWrapperName { function, .. } => function,
        }
    }
}

/// Result of attempting one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TargetOutcome {
    Emitted {
        function: String,
        wrapper: String,
        support: ParamSupport,
    },
    Skipped {
        #[serde(flatten)]
        reason: SkipReason,
    },
}

impl TargetOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, TargetOutcome::Emitted { .. })
    }

    pub fn wrapper(&self) -> Option<&str> {
        match self {
            TargetOutcome::Emitted { wrapper, .. } => Some(wrapper),
            TargetOutcome::Skipped { .. } => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            TargetOutcome::Emitted { .. } => None,
            TargetOutcome::Skipped { reason } => Some(reason),
        }
    }
}
