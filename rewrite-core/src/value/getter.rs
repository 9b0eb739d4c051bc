use crate::ctx::{RequestState, resolve_element_index};
use crate::error::BuildError;
use crate::rule::{CaptureKey, RuleResult};
use crate::value::{Operation, Scope};
use std::fmt;

/// What a getter needs besides its scope.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Argument {
    None,
    Element(i32),
    Group(usize),
    Name(String),
    Text(String),
}

/// Reads one value out of a request.
///
/// Built once from configuration, stateless afterwards and shared across
/// requests.
#[derive(Debug, Clone)]
pub struct ValueGetter {
    scope: Scope,
    argument: Argument,
    operations: Vec<Operation>,
}

impl ValueGetter {
    /// Builds a getter for `scope`.
    ///
    /// Path element scopes with a missing, `"0"` or non-numeric index
    /// collapse to the whole-path scope. Named scopes require a name and
    /// capture group scopes require a non-negative numeric index.
    pub fn new(scope: Scope, index: Option<&str>) -> Result<Self, BuildError> {
        let index = index.map(str::trim);

        let (scope, argument) = match scope {
            s if s.is_path_element() => match index.and_then(|i| i.parse::<i32>().ok()) {
                Some(i) if i != 0 => (s, Argument::Element(i)),
                _ => (s.whole_path(), Argument::None),
            },

            s if s.is_capture_group() => {
                let raw = index.ok_or(BuildError::MissingIndex { scope: s })?;
                let group = raw.parse::<usize>().map_err(|_| BuildError::InvalidIndex {
                    scope: s,
                    index: raw.to_owned(),
                })?;
                (s, Argument::Group(group))
            }

            s if s.is_named() => match index {
                Some(name) if !name.is_empty() => (s, Argument::Name(name.to_owned())),
                _ => return Err(BuildError::MissingIndex { scope: s }),
            },

            Scope::Literal => (
                Scope::Literal,
                Argument::Text(index.unwrap_or_default().to_owned()),
            ),

            s => (s, Argument::None),
        };

        Ok(Self {
            scope,
            argument,
            operations: Vec::new(),
        })
    }

    /// A constant value. Unlike [`ValueGetter::new`] the text is not trimmed.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            scope: Scope::Literal,
            argument: Argument::Text(text.into()),
            operations: Vec::new(),
        }
    }

    pub fn header(name: &str) -> Self {
        Self {
            scope: Scope::Header,
            argument: Argument::Name(name.to_owned()),
            operations: Vec::new(),
        }
    }

    pub fn server_variable(name: &str) -> Self {
        Self {
            scope: Scope::ServerVariable,
            argument: Argument::Name(name.to_owned()),
            operations: Vec::new(),
        }
    }

    pub fn capture(key: CaptureKey, group: usize) -> Self {
        let scope = match key {
            CaptureKey::Match => Scope::MatchGroup,
            CaptureKey::Condition => Scope::ConditionGroup,
        };

        Self {
            scope,
            argument: Argument::Group(group),
            operations: Vec::new(),
        }
    }

    /// Appends an operation to the chain; operations run left to right.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The signed path element index, when the getter addresses one.
    pub fn element_index(&self) -> Option<i32> {
        match self.argument {
            Argument::Element(i) => Some(i),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.argument {
            Argument::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn get_string(&self, state: &RequestState, result: &RuleResult<'_>) -> String {
        let base = self.resolve(state, result);

        self.operations
            .iter()
            .fold(base, |value, operation| operation.apply(&value))
    }

    /// Parses the resolved value as a base-10 integer, or returns `default`.
    pub fn get_int(&self, state: &RequestState, result: &RuleResult<'_>, default: i64) -> i64 {
        self.get_string(state, result)
            .trim()
            .parse()
            .unwrap_or(default)
    }

    fn resolve(&self, state: &RequestState, result: &RuleResult<'_>) -> String {
        match (self.scope, &self.argument) {
            (Scope::OriginalUrl, _) => state.original_url_string(),
            (Scope::OriginalPath, _) => state.original_path_string(),
            (Scope::OriginalQueryString, _) => state.original_query_string().to_owned(),
            (Scope::OriginalPathElement, Argument::Element(i)) => {
                element(state.original_path(), *i)
            }
            (Scope::OriginalParameter, Argument::Name(name)) => {
                state.original_parameter(name).unwrap_or_default()
            }
            (Scope::OriginalHeader, Argument::Name(name)) => {
                owned(state.original_header(name))
            }
            (Scope::OriginalServerVariable, Argument::Name(name)) => {
                owned(state.original_server_variable(name))
            }

            (Scope::Url, _) => state.new_url_string(),
            (Scope::Path, _) => state.new_path_string().to_owned(),
            (Scope::QueryString, _) => state.new_query_string().to_owned(),
            (Scope::PathElement, Argument::Element(i)) => element(state.path(), *i),
            (Scope::Parameter, Argument::Name(name)) => state.parameter(name).unwrap_or_default(),
            (Scope::Header, Argument::Name(name)) => owned(state.header(name)),
            (Scope::ServerVariable, Argument::Name(name)) => owned(state.server_variable(name)),

            (Scope::Literal, Argument::Text(text)) => text.clone(),
            (Scope::MatchGroup, Argument::Group(i)) => {
                result.capture(CaptureKey::Match, *i).to_owned()
            }
            (Scope::ConditionGroup, Argument::Group(i)) => {
                result.capture(CaptureKey::Condition, *i).to_owned()
            }
            (Scope::MatchPath, _) => {
                let path = state.new_path_string();
                path.strip_prefix('/').unwrap_or(path).to_owned()
            }

            // Constructors never pair a scope with a foreign argument.
            _ => String::new(),
        }
    }
}

fn element(segments: &[String], index: i32) -> String {
    resolve_element_index(segments, index)
        .map(|i| segments[i].clone())
        .unwrap_or_default()
}

fn owned(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

impl fmt::Display for ValueGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = match &self.argument {
            Argument::None => self.scope.to_string(),
            Argument::Element(i) => format!("{}[{i}]", self.scope),
            Argument::Group(i) => format!("{}[{i}]", self.scope),
            Argument::Name(name) => format!("{}[{name}]", self.scope),
            Argument::Text(text) => format!("{text:?}"),
        };

        for operation in &self.operations {
            text = format!("{operation}({text})");
        }

        f.write_str(&text)
    }
}
