use crate::conf::load_rules;
use crate::engine::RewriteEngine;
use crate::env::EvalEnv;
use crate::registry::CustomRegistry;
use crate::rule::RuleSet;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;

/// Hot-swappable compiled rules.
///
/// Requests load a snapshot and keep evaluating against it while a reload
/// replaces the rules for subsequent requests.
#[derive(Debug)]
pub struct RulesHandle {
    rules: ArcSwap<RuleSet>,
}

impl RulesHandle {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules: ArcSwap::from_pointee(rules),
        }
    }

    pub fn load(&self) -> Arc<RuleSet> {
        self.rules.load_full()
    }

    /// An engine over the current snapshot.
    pub fn engine(&self, env: EvalEnv) -> RewriteEngine {
        RewriteEngine::new(self.load(), env)
    }

    /// Recompiles `path` and swaps the result in. On error the current
    /// rules stay in place.
    pub fn reload_from(&self, path: &Path, registry: &CustomRegistry) -> Result<()> {
        // Compile OFFLINE.
        let new_rules = load_rules(path, registry)?;

        // Log comparison against current rules.
        let old = self.rules.load();
        tracing::info!(
            old_rules = old.rule_count(),
            old_maps = old.map_count(),
            new_rules = new_rules.rule_count(),
            new_maps = new_rules.map_count(),
            "rules reloaded"
        );

        // Atomic swap (point of no return).
        self.rules.store(Arc::new(new_rules));

        Ok(())
    }
}
