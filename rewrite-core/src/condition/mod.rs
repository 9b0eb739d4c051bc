//! Predicates over a request and their boolean combinators.
//!
//! Conditions are compiled once and shared; the only state they touch
//! during evaluation is the [`RuleResult`] they store regex captures in.

mod list;
mod number_match;
mod static_path;
mod string_match;

pub use list::*;
pub use number_match::*;
pub use static_path::*;
pub use string_match::*;

use crate::ctx::RequestState;
use crate::env::EvalEnv;
use crate::registry::CustomCondition;
use crate::rule::RuleResult;
use crate::trace::TraceEvent;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Condition {
    StringMatch(StringMatch),
    NumberMatch(NumberMatch),
    StaticPath(StaticPathMatch),
    List(ConditionList),
    Custom {
        condition: Arc<dyn CustomCondition>,
        inverted: bool,
    },
}

impl Condition {
    pub fn test(&self, state: &RequestState, result: &mut RuleResult<'_>, env: &EvalEnv) -> bool {
        let outcome = match self {
            Self::List(list) => return list.test(state, result, env),
            Self::StringMatch(matcher) => matcher.test(state, result),
            Self::NumberMatch(matcher) => matcher.test(state, result),
            Self::StaticPath(matcher) => matcher.test(state, result, env),
            Self::Custom {
                condition,
                inverted,
            } => condition.test(state, result) != *inverted,
        };

        env.trace(|| TraceEvent::Condition {
            description: self.to_string(),
            result: outcome,
        });

        outcome
    }
}

impl From<StringMatch> for Condition {
    fn from(matcher: StringMatch) -> Self {
        Self::StringMatch(matcher)
    }
}

impl From<NumberMatch> for Condition {
    fn from(matcher: NumberMatch) -> Self {
        Self::NumberMatch(matcher)
    }
}

impl From<StaticPathMatch> for Condition {
    fn from(matcher: StaticPathMatch) -> Self {
        Self::StaticPath(matcher)
    }
}

impl From<ConditionList> for Condition {
    fn from(list: ConditionList) -> Self {
        Self::List(list)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StringMatch(matcher) => matcher.fmt(f),
            Self::NumberMatch(matcher) => matcher.fmt(f),
            Self::StaticPath(matcher) => matcher.fmt(f),
            Self::List(list) => list.fmt(f),
            Self::Custom {
                condition,
                inverted,
            } => {
                if *inverted {
                    f.write_str("not ")?;
                }
                write!(f, "{}()", condition.name())
            }
        }
    }
}
