use crate::action::ActionOutcome;
use crate::ctx::RequestState;
use crate::env::EvalEnv;
use crate::rule::{PropertyBag, Rule, RuleResult};
use crate::trace::TraceEvent;
use crate::value::RewriteMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Aggregate of one walk over a [`RuleList`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOutcome {
    /// At least one rule matched.
    pub matched: bool,
    /// A matched rule asked to stop the walk.
    pub stopped: bool,
    pub end_request: bool,
    pub is_dynamic: bool,
}

/// Ordered rules walked until one asks to stop.
#[derive(Debug, Clone, Default)]
pub struct RuleList {
    pub name: String,
    pub rules: Vec<Rule>,
    pub stop_processing: bool,
}

impl RuleList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            stop_processing: false,
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_stop_processing(mut self, stop: bool) -> Self {
        self.stop_processing = stop;
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules including those of nested lists.
    pub fn total_rules(&self) -> usize {
        self.rules
            .iter()
            .map(|rule| 1 + rule.action.as_ref().map_or(0, |a| a.nested_rule_count()))
            .sum()
    }

    /// Walks the rules in order. Unmatched rules have no effect; the walk
    /// ends after the first rule reporting `stop_processing`.
    pub fn evaluate(
        &self,
        state: &mut RequestState,
        env: &EvalEnv,
        parent: Option<&PropertyBag<'_>>,
    ) -> ListOutcome {
        env.trace(|| TraceEvent::RuleListBegin {
            name: self.name.clone(),
        });

        let mut outcome = ListOutcome::default();

        for rule in &self.rules {
            let result = rule.evaluate(state, env, parent);
            if !result.matched {
                continue;
            }

            outcome.matched = true;
            outcome.end_request |= result.end_request;
            outcome.is_dynamic |= result.is_dynamic;

            if result.stop_processing {
                outcome.stopped = true;
                break;
            }
        }

        env.trace(|| TraceEvent::RuleListEnd {
            name: self.name.clone(),
            matched: outcome.matched,
            end_request: outcome.end_request,
        });

        outcome
    }

    /// Runs the list as the action of an enclosing rule. A stop inside the
    /// list ends only this list; the enclosing walk sees the list's own
    /// `stop_processing` default.
    pub fn perform(
        &self,
        state: &mut RequestState,
        result: &mut RuleResult<'_>,
        env: &EvalEnv,
    ) -> ActionOutcome {
        let outcome = self.evaluate(state, env, Some(result.properties()));
        result.is_dynamic |= outcome.is_dynamic;

        ActionOutcome {
            stop_processing: self.stop_processing,
            end_request: outcome.end_request,
        }
    }
}

impl fmt::Display for RuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rules '{}' ({} rules)", self.name, self.rules.len())
    }
}

/// A compiled rules document: the root list plus its rewrite maps.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub root: RuleList,
    pub maps: HashMap<String, Arc<RewriteMap>>,
}

impl RuleSet {
    pub fn new(root: RuleList) -> Self {
        Self {
            root,
            maps: HashMap::new(),
        }
    }

    pub fn map(&self, name: &str) -> Option<&Arc<RewriteMap>> {
        self.maps.get(&name.to_ascii_lowercase())
    }

    pub fn rule_count(&self) -> usize {
        self.root.total_rules()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }
}
