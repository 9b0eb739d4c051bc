//! Custom conditions, actions and operations resolved by name.
//!
//! Hosts register builders before compiling configuration; the compiler
//! consults the registry only for names it does not recognize natively.


use crate::action::ActionOutcome;
use crate::ctx::RequestState;
use crate::rule::RuleResult;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Free-form parameters passed from configuration to a custom builder.
pub type CustomParams = HashMap<String, String>;

/// A host-provided string transform usable from macros (`{name:...}`).
pub trait CustomOperation: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, input: &str) -> String;
}

/// A host-provided predicate over the request.
pub trait CustomCondition: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn test(&self, state: &RequestState, result: &mut RuleResult<'_>) -> bool;
}

/// A host-provided mutation of the request.
pub trait CustomAction: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn perform(&self, state: &mut RequestState, result: &mut RuleResult<'_>) -> ActionOutcome;
}

pub type OperationBuilder = fn(&CustomParams) -> Result<Arc<dyn CustomOperation>>;
pub type ConditionBuilder = fn(&CustomParams) -> Result<Arc<dyn CustomCondition>>;
pub type ActionBuilder = fn(&CustomParams) -> Result<Arc<dyn CustomAction>>;

/// Name → builder tables. Names are matched case-insensitively.
#[derive(Default, Clone)]
pub struct CustomRegistry {
    operations: HashMap<String, OperationBuilder>,
    conditions: HashMap<String, ConditionBuilder>,
    actions: HashMap<String, ActionBuilder>,
}

impl CustomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_operation(&mut self, name: &str, builder: OperationBuilder) -> &mut Self {
        self.operations.insert(name.to_ascii_lowercase(), builder);
        self
    }

    pub fn register_condition(&mut self, name: &str, builder: ConditionBuilder) -> &mut Self {
        self.conditions.insert(name.to_ascii_lowercase(), builder);
        self
    }

    pub fn register_action(&mut self, name: &str, builder: ActionBuilder) -> &mut Self {
        self.actions.insert(name.to_ascii_lowercase(), builder);
        self
    }

    pub fn operation(&self, name: &str) -> Option<OperationBuilder> {
        self.operations.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn condition(&self, name: &str) -> Option<ConditionBuilder> {
        self.conditions.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn action(&self, name: &str) -> Option<ActionBuilder> {
        self.actions.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.conditions.is_empty() && self.actions.is_empty()
    }
}
