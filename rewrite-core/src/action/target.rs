use crate::error::BuildError;
use crate::value::Scope;
use std::fmt;

/// A writable location in the working request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url,
    Path,
    QueryString,
    /// Signed, non-zero path element index.
    PathElement(i32),
    Parameter(String),
    Header(String),
    ServerVariable(String),
}

impl Target {
    /// Validates `scope` as a write target for `action`.
    ///
    /// Path element targets with a missing, `"0"` or non-numeric index
    /// address the whole path. Named targets require a name, stored
    /// lower-cased.
    pub fn new(action: &'static str, scope: Scope, index: Option<&str>) -> Result<Self, BuildError> {
        if scope.is_original() {
            return Err(BuildError::ReadOnlyScope { action, scope });
        }

        let index = index.map(str::trim).filter(|i| !i.is_empty());
        let name = || {
            index
                .map(str::to_ascii_lowercase)
                .ok_or(BuildError::MissingIndex { scope })
        };

        let target = match scope {
            Scope::Url => Self::Url,
            Scope::Path => Self::Path,
            Scope::QueryString => Self::QueryString,
            Scope::PathElement => match index.and_then(|i| i.parse::<i32>().ok()) {
                Some(i) if i != 0 => Self::PathElement(i),
                _ => Self::Path,
            },
            Scope::Parameter => Self::Parameter(name()?),
            Scope::Header => Self::Header(name()?),
            Scope::ServerVariable => Self::ServerVariable(name()?),
            _ => return Err(BuildError::UnsupportedScope { action, scope }),
        };

        Ok(target)
    }

    pub fn scope(&self) -> Scope {
        match self {
            Self::Url => Scope::Url,
            Self::Path => Scope::Path,
            Self::QueryString => Scope::QueryString,
            Self::PathElement(_) => Scope::PathElement,
            Self::Parameter(_) => Scope::Parameter,
            Self::Header(_) => Scope::Header,
            Self::ServerVariable(_) => Scope::ServerVariable,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathElement(i) => write!(f, "{}[{i}]", self.scope()),
            Self::Parameter(name) | Self::Header(name) | Self::ServerVariable(name) => {
                write!(f, "{}[{name}]", self.scope())
            }
            other => other.scope().fmt(f),
        }
    }
}
