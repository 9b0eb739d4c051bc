//! Mutations of the working request and the side effects a rule can
//! schedule.
//!
//! Every action reports an [`ActionOutcome`]. Path and query mutators
//! default to "continue"; redirects, custom responses and aborts default to
//! "stop and end the request".

mod list;
mod mutate;
mod shape;
mod target;
mod terminal;
#[cfg(test)]
mod tests;

pub use list::*;
pub use mutate::*;
pub use shape::*;
pub use target::*;
pub use terminal::*;

use crate::ctx::RequestState;
use crate::env::EvalEnv;
use crate::registry::CustomAction;
use crate::rule::{RuleList, RuleResult};
use crate::trace::TraceEvent;
use std::fmt;
use std::sync::Arc;

/// Flow control reported by an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Skip the remaining rules of the current list.
    pub stop_processing: bool,
    /// The host should answer the request now.
    pub end_request: bool,
}

impl ActionOutcome {
    pub const CONTINUE: Self = Self {
        stop_processing: false,
        end_request: false,
    };

    pub const TERMINATE: Self = Self {
        stop_processing: true,
        end_request: true,
    };

    pub fn new(stop_processing: bool, end_request: bool) -> Self {
        Self {
            stop_processing,
            end_request,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Replace(Replace),
    Append(Append),
    Insert(Insert),
    Delete(Delete),
    Keep(Keep),
    Normalize(Normalize),
    Truncate(Truncate),
    Redirect(Redirect),
    CustomResponse(CustomResponse),
    Abort,
    DoNothing(ActionOutcome),
    List(ActionList),
    Rules(RuleList),
    Custom(Arc<dyn CustomAction>),
}

impl Action {
    pub fn perform(
        &self,
        state: &mut RequestState,
        result: &mut RuleResult<'_>,
        env: &EvalEnv,
    ) -> ActionOutcome {
        let outcome = match self {
            Self::List(list) => return list.perform(state, result, env),
            Self::Rules(rules) => return rules.perform(state, result, env),

            Self::Replace(action) => {
                action.perform(state, result);
                ActionOutcome::CONTINUE
            }
            Self::Append(action) => {
                action.perform(state, result);
                ActionOutcome::CONTINUE
            }
            Self::Insert(action) => {
                action.perform(state, result);
                ActionOutcome::CONTINUE
            }
            Self::Delete(action) => {
                action.perform(state);
                ActionOutcome::CONTINUE
            }
            Self::Keep(action) => {
                action.perform(state);
                ActionOutcome::CONTINUE
            }
            Self::Normalize(action) => {
                action.perform(state);
                ActionOutcome::CONTINUE
            }
            Self::Truncate(action) => {
                action.perform(state);
                ActionOutcome::CONTINUE
            }
            Self::Redirect(action) => action.perform(state, result, env),
            Self::CustomResponse(action) => action.perform(state, result, env),
            Self::Abort => ActionOutcome::TERMINATE,
            Self::DoNothing(outcome) => *outcome,
            Self::Custom(action) => action.perform(state, result),
        };

        env.trace(|| TraceEvent::Action {
            description: self.to_string(),
            stop_processing: outcome.stop_processing,
            end_request: outcome.end_request,
        });

        outcome
    }

    /// Rules held by nested rule lists below this action.
    pub fn nested_rule_count(&self) -> usize {
        match self {
            Self::Rules(rules) => rules.total_rules(),
            Self::List(list) => list.actions().iter().map(Self::nested_rule_count).sum(),
            _ => 0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(action) => action.fmt(f),
            Self::Append(action) => action.fmt(f),
            Self::Insert(action) => action.fmt(f),
            Self::Delete(action) => action.fmt(f),
            Self::Keep(action) => action.fmt(f),
            Self::Normalize(action) => action.fmt(f),
            Self::Truncate(action) => action.fmt(f),
            Self::Redirect(action) => action.fmt(f),
            Self::CustomResponse(action) => action.fmt(f),
            Self::Abort => f.write_str("abort"),
            Self::DoNothing(outcome) => write!(
                f,
                "none stop={} end={}",
                outcome.stop_processing, outcome.end_request
            ),
            Self::List(list) => list.fmt(f),
            Self::Rules(rules) => rules.fmt(f),
            Self::Custom(action) => write!(f, "{}()", action.name()),
        }
    }
}
