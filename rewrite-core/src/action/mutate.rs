use crate::action::Target;
use crate::ctx::{
    RequestState, ensure_root, resolve_element_index, resolve_insert_index, root_path,
};
use crate::error::BuildError;
use crate::rule::RuleResult;
use crate::value::{Scope, Value};
use std::fmt;

//-----------------------------------------------------------------------------
// Replace
//-----------------------------------------------------------------------------

/// Overwrites the addressed location with a value.
#[derive(Debug, Clone)]
pub struct Replace {
    pub target: Target,
    pub value: Value,
}

impl Replace {
    pub fn new(scope: Scope, index: Option<&str>, value: Value) -> Result<Self, BuildError> {
        Ok(Self {
            target: Target::new("replace", scope, index)?,
            value,
        })
    }

    pub fn perform(&self, state: &mut RequestState, result: &RuleResult<'_>) {
        let value = self.value.get_string(state, result);

        match &self.target {
            Target::Url => state.set_new_url_string(&value),
            Target::Path => state.set_new_path_string(&value),
            Target::QueryString => state.set_new_query_string(&value),
            Target::PathElement(index) => {
                if let Some(position) = resolve_element_index(state.path(), *index) {
                    state.new_path_mut()[position] = value;
                    state.path_changed();
                }
            }
            Target::Parameter(name) => {
                state.new_query_mut().insert(name.clone(), vec![value]);
                state.query_changed();
            }
            Target::Header(name) => state.set_header(name, value),
            Target::ServerVariable(name) => state.set_server_variable(name, value),
        }
    }
}

impl fmt::Display for Replace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "replace {} = {}", self.target, self.value)
    }
}

//-----------------------------------------------------------------------------
// Append
//-----------------------------------------------------------------------------

/// Appends a value to the end of the addressed string, creating named
/// entries that do not exist yet.
#[derive(Debug, Clone)]
pub struct Append {
    pub target: Target,
    pub value: Value,
}

impl Append {
    pub fn new(scope: Scope, index: Option<&str>, value: Value) -> Result<Self, BuildError> {
        Ok(Self {
            target: Target::new("append", scope, index)?,
            value,
        })
    }

    pub fn perform(&self, state: &mut RequestState, result: &RuleResult<'_>) {
        let value = self.value.get_string(state, result);

        match &self.target {
            Target::Url => {
                let url = state.new_url_string() + &value;
                state.set_new_url_string(&url);
            }
            Target::Path => {
                let path = format!(
                    "{}/{}",
                    state.new_path_string().trim_end_matches('/'),
                    value.trim_start_matches('/')
                );
                state.set_new_path_string(&path);
            }
            Target::QueryString => {
                let addition = value.trim_start_matches('&');
                if addition.is_empty() {
                    return;
                }
                let current = state.new_query_string().trim_end_matches('&');
                let query = if current.is_empty() {
                    addition.to_owned()
                } else {
                    format!("{current}&{addition}")
                };
                state.set_new_query_string(&query);
            }
            Target::PathElement(index) => {
                if let Some(position) = resolve_element_index(state.path(), *index) {
                    state.new_path_mut()[position].push_str(&value);
                    state.path_changed();
                }
            }
            Target::Parameter(name) => {
                let values = state.new_query_mut().entry(name.clone()).or_default();
                match values.last_mut() {
                    Some(last) => last.push_str(&value),
                    None => values.push(value),
                }
                state.query_changed();
            }
            Target::Header(name) => state.append_header(name, &value),
            Target::ServerVariable(name) => state.append_server_variable(name, &value),
        }
    }
}

impl fmt::Display for Append {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "append {} += {}", self.target, self.value)
    }
}

//-----------------------------------------------------------------------------
// Insert
//-----------------------------------------------------------------------------

/// Inserts a new path segment before the element at `index`; index 0
/// inserts right after the root marker.
#[derive(Debug, Clone)]
pub struct Insert {
    pub index: i32,
    pub value: Value,
}

impl Insert {
    /// Only path scopes are accepted, and the index must be numeric.
    pub fn new(scope: Scope, index: Option<&str>, value: Value) -> Result<Self, BuildError> {
        if scope.is_original() {
            return Err(BuildError::ReadOnlyScope {
                action: "insert",
                scope,
            });
        }
        if !matches!(scope, Scope::Path | Scope::PathElement) {
            return Err(BuildError::UnsupportedScope {
                action: "insert",
                scope,
            });
        }

        let raw = index
            .map(str::trim)
            .ok_or(BuildError::MissingIndex { scope })?;
        let index = raw.parse::<i32>().map_err(|_| BuildError::InvalidIndex {
            scope,
            index: raw.to_owned(),
        })?;

        Ok(Self { index, value })
    }

    pub fn perform(&self, state: &mut RequestState, result: &RuleResult<'_>) {
        let Some(position) = resolve_insert_index(state.path(), self.index) else {
            return;
        };

        let value = self.value.get_string(state, result);
        state.new_path_mut().insert(position, value);
        state.path_changed();
    }
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insert pathElement[{}] = {}", self.index, self.value)
    }
}

//-----------------------------------------------------------------------------
// Delete
//-----------------------------------------------------------------------------

/// Removes the addressed location. Deleting the whole path or URL leaves
/// the root path behind.
#[derive(Debug, Clone)]
pub struct Delete {
    pub target: Target,
}

impl Delete {
    pub fn new(scope: Scope, index: Option<&str>) -> Result<Self, BuildError> {
        Ok(Self {
            target: Target::new("delete", scope, index)?,
        })
    }

    pub fn perform(&self, state: &mut RequestState) {
        match &self.target {
            Target::Url => state.set_new_url_string("/"),
            Target::Path => {
                *state.new_path_mut() = root_path();
                state.path_changed();
            }
            Target::QueryString => state.set_new_query_string(""),
            Target::PathElement(index) => {
                let Some(position) = resolve_element_index(state.path(), *index) else {
                    return;
                };
                let segments = state.new_path_mut();
                segments.remove(position);
                ensure_root(segments);
                state.path_changed();
            }
            Target::Parameter(name) => {
                if state.query().contains_key(name) {
                    state.new_query_mut().shift_remove(name);
                    state.query_changed();
                }
            }
            Target::Header(name) => {
                if state.headers().contains(name) {
                    state.remove_header(name);
                }
            }
            Target::ServerVariable(name) => {
                if state.server_variables().contains(name) {
                    state.remove_server_variable(name);
                }
            }
        }
    }
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delete {}", self.target)
    }
}
