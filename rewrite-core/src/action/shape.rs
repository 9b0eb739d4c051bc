use crate::ctx::{RequestState, ensure_root, resolve_element_index};
use crate::error::BuildError;
use crate::value::Scope;
use std::fmt;
use std::str::FromStr;

//-----------------------------------------------------------------------------
// Keep
//-----------------------------------------------------------------------------

/// Allow-list of path elements, parameters or headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keep {
    PathElements(Vec<i32>),
    Parameters(Vec<String>),
    Headers(Vec<String>),
}

impl Keep {
    /// `list` is comma separated. Path scopes take signed indices, the
    /// query and header scopes take names.
    pub fn new(scope: Scope, list: Option<&str>) -> Result<Self, BuildError> {
        let items: Vec<&str> = list
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect();

        let names = || -> Vec<String> { items.iter().map(|name| name.to_ascii_lowercase()).collect() };

        match scope {
            Scope::Path | Scope::PathElement => items
                .iter()
                .map(|item| {
                    item.parse::<i32>().map_err(|_| BuildError::InvalidIndex {
                        scope,
                        index: (*item).to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::PathElements),
            Scope::Parameter | Scope::QueryString => Ok(Self::Parameters(names())),
            Scope::Header => Ok(Self::Headers(names())),
            s if s.is_original() => Err(BuildError::ReadOnlyScope {
                action: "keep",
                scope: s,
            }),
            s => Err(BuildError::UnsupportedScope {
                action: "keep",
                scope: s,
            }),
        }
    }

    pub fn perform(&self, state: &mut RequestState) {
        match self {
            Self::PathElements(indices) => {
                let keep = normalize_keep_indices(state.path(), indices);
                let mut kept: Vec<String> = keep
                    .into_iter()
                    .map(|position| state.path()[position].clone())
                    .collect();
                ensure_root(&mut kept);

                if kept.as_slice() != state.path() {
                    *state.new_path_mut() = kept;
                    state.path_changed();
                }
            }
            Self::Parameters(names) => {
                if state.query().keys().all(|key| names.contains(key)) {
                    return;
                }
                state.new_query_mut().retain(|key, _| names.contains(key));
                state.query_changed();
            }
            Self::Headers(names) => {
                if state.headers().iter().all(|(key, _)| names.iter().any(|n| n == key)) {
                    return;
                }
                state.retain_headers(|key| names.iter().any(|n| n == key));
            }
        }
    }
}

/// Resolves an allow-list of signed indices to sorted, unique positions
/// in `segments`. Position 0 (the root marker, or the first segment of a
/// relative path) is always kept; unresolvable indices are dropped.
pub fn normalize_keep_indices(segments: &[String], indices: &[i32]) -> Vec<usize> {
    let mut positions: Vec<usize> = indices
        .iter()
        .filter_map(|&index| resolve_element_index(segments, index))
        .collect();
    positions.push(0);
    positions.sort_unstable();
    positions.dedup();
    positions
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathElements(indices) => {
                let list = indices
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "keep pathElement[{list}]")
            }
            Self::Parameters(names) => write!(f, "keep parameter[{}]", names.join(",")),
            Self::Headers(names) => write!(f, "keep header[{}]", names.join(",")),
        }
    }
}

//-----------------------------------------------------------------------------
// Normalize
//-----------------------------------------------------------------------------

/// What to do with the separator at one end of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorPolicy {
    #[default]
    Leave,
    Add,
    Remove,
}

impl FromStr for SeparatorPolicy {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "leave" | "keep" => Ok(Self::Leave),
            "add" | "ensure" => Ok(Self::Add),
            "remove" | "strip" => Ok(Self::Remove),
            _ => Err(BuildError::UnknownSeparatorPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for SeparatorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Leave => "leave",
            Self::Add => "add",
            Self::Remove => "remove",
        })
    }
}

/// Adds or removes the leading and trailing path separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalize {
    pub leading: SeparatorPolicy,
    pub trailing: SeparatorPolicy,
}

impl Normalize {
    pub fn new(leading: SeparatorPolicy, trailing: SeparatorPolicy) -> Self {
        Self { leading, trailing }
    }

    pub fn perform(&self, state: &mut RequestState) {
        let mut segments = state.path().to_vec();
        self.apply(&mut segments);

        if segments.as_slice() != state.path() {
            *state.new_path_mut() = segments;
            state.path_changed();
        }
    }

    /// Leading end first, then trailing.
    pub fn apply(&self, segments: &mut Vec<String>) {
        match self.leading {
            SeparatorPolicy::Add => {
                if segments.len() < 2 || segments.first().is_some_and(|s| !s.is_empty()) {
                    segments.insert(0, String::new());
                }
            }
            SeparatorPolicy::Remove => {
                while segments.len() > 1 && segments.first().is_some_and(String::is_empty) {
                    segments.remove(0);
                }
            }
            SeparatorPolicy::Leave => {}
        }

        match self.trailing {
            SeparatorPolicy::Add => {
                if segments.len() < 2 || segments.last().is_some_and(|s| !s.is_empty()) {
                    segments.push(String::new());
                }
            }
            SeparatorPolicy::Remove => {
                while segments.len() > 1 && segments.last().is_some_and(String::is_empty) {
                    segments.pop();
                }
            }
            SeparatorPolicy::Leave => {}
        }
    }
}

impl fmt::Display for Normalize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "normalize leading={} trailing={}",
            self.leading, self.trailing
        )
    }
}

//-----------------------------------------------------------------------------
// Truncate
//-----------------------------------------------------------------------------

/// Caps the path depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncate {
    pub max_depth: usize,
}

impl Truncate {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Keeps the root marker plus `max_depth` segments.
    pub fn perform(&self, state: &mut RequestState) {
        let path = state.path();
        let rooted = path.first().is_some_and(String::is_empty);
        let keep = self.max_depth + usize::from(rooted);

        if path.len() <= keep {
            return;
        }

        let segments = state.new_path_mut();
        segments.truncate(keep);
        ensure_root(segments);
        state.path_changed();
    }
}

impl fmt::Display for Truncate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "truncate depth={}", self.max_depth)
    }
}
