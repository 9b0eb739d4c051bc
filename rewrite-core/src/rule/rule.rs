use crate::action::Action;
use crate::condition::Condition;
use crate::ctx::RequestState;
use crate::env::EvalEnv;
use crate::rule::{PropertyBag, RuleResult};
use crate::trace::TraceEvent;
use std::fmt;

/// A condition guarding an action.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub condition: Option<Condition>,
    pub action: Option<Action>,
    pub stop_processing: bool,
    pub is_dynamic: bool,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: None,
            action: None,
            stop_processing: false,
            is_dynamic: false,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_stop_processing(mut self, stop: bool) -> Self {
        self.stop_processing = stop;
        self
    }

    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.is_dynamic = dynamic;
        self
    }

    /// Tests the condition (absent means true) and, when it holds, performs
    /// the action. `parent` is the property bag of the enclosing rule when
    /// this rule sits in a nested list.
    pub fn evaluate<'p>(
        &self,
        state: &mut RequestState,
        env: &EvalEnv,
        parent: Option<&'p PropertyBag<'p>>,
    ) -> RuleResult<'p> {
        env.trace(|| TraceEvent::RuleBegin {
            name: self.name.clone(),
        });

        let mut result = match parent {
            Some(parent) => RuleResult::with_parent(parent),
            None => RuleResult::new(),
        };

        let matched = match &self.condition {
            Some(condition) => condition.test(state, &mut result, env),
            None => true,
        };

        if matched {
            result.matched = true;
            if let Some(action) = &self.action {
                let outcome = action.perform(state, &mut result, env);
                result.absorb(outcome);
            }
            result.stop_processing |= self.stop_processing;
            result.is_dynamic |= self.is_dynamic;
        }

        env.trace(|| TraceEvent::RuleEnd {
            name: self.name.clone(),
            matched: result.matched,
            stop_processing: result.stop_processing,
            end_request: result.end_request,
        });

        result
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule '{}'", self.name)?;
        if self.stop_processing {
            f.write_str(" [stop]")?;
        }
        if self.is_dynamic {
            f.write_str(" [dynamic]")?;
        }
        if let Some(condition) = &self.condition {
            write!(f, " if {condition}")?;
        }
        if let Some(action) = &self.action {
            write!(f, " then {action}")?;
        }
        Ok(())
    }
}
