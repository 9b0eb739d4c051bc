pub mod action;
pub mod cli;
pub mod condition;
pub mod conf;
pub mod ctx;
pub mod engine;
pub mod env;
pub mod error;
pub mod logging;
pub mod registry;
pub mod rule;
pub mod runtime;
pub mod trace;
pub mod value;

pub use conf::{ConfigError, compile_str, load_rules};
pub use ctx::{DeferredAction, RequestState};
pub use engine::{RewriteEngine, RewriteOutcome};
pub use env::{EvalEnv, ExecutionMode};
pub use registry::CustomRegistry;
pub use rule::RuleSet;
pub use runtime::RulesHandle;
