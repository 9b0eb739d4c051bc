use crate::ctx::{DeferredAction, RequestState};
use crate::env::{EvalEnv, ExecutionMode};
use crate::rule::RuleSet;
use serde::Serialize;
use std::sync::Arc;

/// What a walk over the rules did to one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteOutcome {
    pub matched: bool,
    pub end_request: bool,
    pub is_dynamic: bool,
    pub modified: bool,
    pub new_url: String,
    /// Side effects for the host to run, in scheduling order.
    pub deferred: Vec<DeferredAction>,
}

/// Runs a compiled [`RuleSet`] against requests.
///
/// The rule set is shared read-only, so one engine serves any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct RewriteEngine {
    rules: Arc<RuleSet>,
    env: EvalEnv,
}

impl RewriteEngine {
    pub fn new(rules: Arc<RuleSet>, env: EvalEnv) -> Self {
        Self { rules, env }
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    pub fn env(&self) -> &EvalEnv {
        &self.env
    }

    /// Walks the rule tree, mutating `state`, and drains the deferred
    /// actions it scheduled.
    pub fn process(&self, state: &mut RequestState) -> RewriteOutcome {
        run(&self.rules, state, &self.env)
    }

    /// Evaluates a copy of `state` in trace-only mode. Nothing is
    /// scheduled; the computed URL is the one [`Self::process`] would
    /// produce.
    pub fn dry_run(&self, state: &RequestState) -> RewriteOutcome {
        let env = self.env.clone().with_mode(ExecutionMode::TraceOnly);
        let mut copy = state.clone();
        run(&self.rules, &mut copy, &env)
    }
}

fn run(rules: &RuleSet, state: &mut RequestState, env: &EvalEnv) -> RewriteOutcome {
    let outcome = rules.root.evaluate(state, env, None);

    let new_url = state.new_url_string();
    if state.is_modified() {
        tracing::debug!(
            original = %state.original_url_string(),
            rewritten = %new_url,
            end_request = outcome.end_request,
            "request rewritten"
        );
    }

    RewriteOutcome {
        matched: outcome.matched,
        end_request: outcome.end_request,
        is_dynamic: outcome.is_dynamic,
        modified: state.is_modified(),
        new_url,
        deferred: state.take_deferred(),
    }
}
