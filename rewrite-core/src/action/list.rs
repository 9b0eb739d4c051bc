use crate::action::{Action, ActionOutcome};
use crate::ctx::RequestState;
use crate::env::EvalEnv;
use crate::rule::RuleResult;
use std::fmt;

/// Actions performed in order until one asks to stop.
#[derive(Debug, Clone, Default)]
pub struct ActionList {
    actions: Vec<Action>,
}

impl ActionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action; nested lists are flattened into this one.
    pub fn push(&mut self, action: Action) {
        match action {
            Action::List(child) => self.actions.extend(child.actions),
            other => self.actions.push(other),
        }
    }

    pub fn with(mut self, action: Action) -> Self {
        self.push(action);
        self
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Collapses to the only child when there is one.
    pub fn into_action(mut self) -> Action {
        if self.actions.len() == 1 {
            if let Some(only) = self.actions.pop() {
                return only;
            }
        }
        Action::List(self)
    }

    pub fn perform(
        &self,
        state: &mut RequestState,
        result: &mut RuleResult<'_>,
        env: &EvalEnv,
    ) -> ActionOutcome {
        let mut outcome = ActionOutcome::CONTINUE;

        for action in &self.actions {
            let child = action.perform(state, result, env);
            outcome.end_request |= child.end_request;
            if child.stop_processing {
                outcome.stop_processing = true;
                break;
            }
        }

        outcome
    }
}

impl fmt::Display for ActionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = self
            .actions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "[{children}]")
    }
}
