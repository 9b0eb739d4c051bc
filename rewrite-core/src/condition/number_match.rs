use crate::ctx::RequestState;
use crate::error::BuildError;
use crate::rule::RuleResult;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equals,
    LessThan,
    GreaterThan,
}

impl FromStr for Comparison {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "equals" | "eq" | "==" => Ok(Self::Equals),
            "less_than" | "lessthan" | "lt" | "<" => Ok(Self::LessThan),
            "greater_than" | "greaterthan" | "gt" | ">" => Ok(Self::GreaterThan),
            _ => Err(BuildError::UnknownComparison(s.to_owned())),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equals => "==",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
        })
    }
}

/// Compares a value parsed as an integer against a constant.
#[derive(Debug, Clone)]
pub struct NumberMatch {
    pub value: Value,
    pub compare: Comparison,
    pub operand: i64,
    /// Used when the value does not parse.
    pub default: i64,
    pub inverted: bool,
}

impl NumberMatch {
    pub fn new(value: Value, compare: Comparison, operand: i64) -> Self {
        Self {
            value,
            compare,
            operand,
            default: 0,
            inverted: false,
        }
    }

    pub fn with_default(mut self, default: i64) -> Self {
        self.default = default;
        self
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn test(&self, state: &RequestState, result: &RuleResult<'_>) -> bool {
        let number = self.value.get_int(state, result, self.default);

        let matched = match self.compare {
            Comparison::Equals => number == self.operand,
            Comparison::LessThan => number < self.operand,
            Comparison::GreaterThan => number > self.operand,
        };

        matched != self.inverted
    }
}

impl fmt::Display for NumberMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("not ")?;
        }
        write!(f, "{} {} {}", self.value, self.compare, self.operand)
    }
}
