use crate::ctx::RequestState;
use crate::rule::RuleResult;
use crate::value::{Operation, ValueGetter};
use std::fmt;

/// A compiled value source: a single getter or several joined together.
#[derive(Debug, Clone)]
pub enum Value {
    Getter(ValueGetter),
    Concat(ValueConcatenator),
}

impl Value {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Getter(ValueGetter::literal(text))
    }

    pub fn get_string(&self, state: &RequestState, result: &RuleResult<'_>) -> String {
        match self {
            Self::Getter(getter) => getter.get_string(state, result),
            Self::Concat(concat) => concat.get_string(state, result),
        }
    }

    pub fn get_int(&self, state: &RequestState, result: &RuleResult<'_>, default: i64) -> i64 {
        self.get_string(state, result)
            .trim()
            .parse()
            .unwrap_or(default)
    }

    /// Applies `operation` to the whole value.
    pub fn with_operation(self, operation: Operation) -> Self {
        match self {
            Self::Getter(getter) => Self::Getter(getter.with_operation(operation)),
            Self::Concat(concat) if concat.operation.is_none() => Self::Concat(ValueConcatenator {
                operation: Some(operation),
                ..concat
            }),
            wrapped => Self::Concat(ValueConcatenator::new(vec![wrapped]).with_operation(operation)),
        }
    }

    pub fn as_getter(&self) -> Option<&ValueGetter> {
        match self {
            Self::Getter(getter) => Some(getter),
            Self::Concat(_) => None,
        }
    }
}

impl From<ValueGetter> for Value {
    fn from(getter: ValueGetter) -> Self {
        Self::Getter(getter)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Getter(getter) => getter.fmt(f),
            Self::Concat(concat) => concat.fmt(f),
        }
    }
}

/// Joins several values with an optional literal separator, then applies
/// one optional operation to the joined text.
#[derive(Debug, Clone)]
pub struct ValueConcatenator {
    parts: Vec<Value>,
    separator: Option<String>,
    operation: Option<Operation>,
}

impl ValueConcatenator {
    pub fn new(parts: Vec<Value>) -> Self {
        Self {
            parts,
            separator: None,
            operation: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn parts(&self) -> &[Value] {
        &self.parts
    }

    pub fn get_string(&self, state: &RequestState, result: &RuleResult<'_>) -> String {
        let joined = self
            .parts
            .iter()
            .map(|part| part.get_string(state, result))
            .collect::<Vec<_>>()
            .join(self.separator.as_deref().unwrap_or_default());

        match &self.operation {
            Some(operation) => operation.apply(&joined),
            None => joined,
        }
    }
}

impl fmt::Display for ValueConcatenator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = match &self.separator {
            Some(sep) => format!(" {sep:?} "),
            None => " + ".to_owned(),
        };
        let joined = self
            .parts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&separator);

        match &self.operation {
            Some(operation) => write!(f, "{operation}({joined})"),
            None => write!(f, "({joined})"),
        }
    }
}
