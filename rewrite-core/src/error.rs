use crate::value::Scope;
use thiserror::Error;

/// Faults detected while assembling engine objects (getters, conditions,
/// actions). They surface at configuration time only; evaluation never fails.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown scope '{0}'")]
    UnknownScope(String),

    #[error("scope '{scope}' requires an index or name")]
    MissingIndex { scope: Scope },

    #[error("invalid index '{index}' for scope '{scope}'")]
    InvalidIndex { scope: Scope, index: String },

    #[error("{action} cannot write to read-only scope '{scope}'")]
    ReadOnlyScope { action: &'static str, scope: Scope },

    #[error("{action} does not support scope '{scope}'")]
    UnsupportedScope { action: &'static str, scope: Scope },

    #[error("unknown redirect type '{0}'")]
    UnknownRedirectType(String),

    #[error("unknown match kind '{0}'")]
    UnknownMatchKind(String),

    #[error("unknown number comparison '{0}'")]
    UnknownComparison(String),

    #[error("unknown combination logic '{0}'")]
    UnknownLogic(String),

    #[error("unknown separator policy '{0}'")]
    UnknownSeparatorPolicy(String),

    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid wildcard '{pattern}': {source}")]
    InvalidWildcard {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
