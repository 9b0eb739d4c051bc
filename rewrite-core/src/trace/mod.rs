//! Observational record of a rule-tree walk.
//!
//! Sinks never influence control flow; they only see events when the
//! execution mode traces.

mod recording;
#[cfg(test)]
mod tests;

pub use recording::*;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    RuleListBegin {
        name: String,
    },
    RuleListEnd {
        name: String,
        matched: bool,
        end_request: bool,
    },
    RuleBegin {
        name: String,
    },
    RuleEnd {
        name: String,
        matched: bool,
        stop_processing: bool,
        end_request: bool,
    },
    ConditionListBegin {
        logic: String,
    },
    ConditionListEnd {
        logic: String,
        result: bool,
    },
    Condition {
        description: String,
        result: bool,
    },
    Action {
        description: String,
        stop_processing: bool,
        end_request: bool,
    },
}

impl TraceEvent {
    /// Nesting delta used when rendering: begin events open a level, end
    /// events close one.
    pub fn depth_delta(&self) -> i32 {
        match self {
            Self::RuleListBegin { .. } | Self::RuleBegin { .. } | Self::ConditionListBegin { .. } => 1,
            Self::RuleListEnd { .. } | Self::RuleEnd { .. } | Self::ConditionListEnd { .. } => -1,
            Self::Condition { .. } | Self::Action { .. } => 0,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleListBegin { name } => write!(f, "rules '{name}'"),
            Self::RuleListEnd {
                name,
                matched,
                end_request,
            } => write!(f, "end rules '{name}' matched={matched} end={end_request}"),
            Self::RuleBegin { name } => write!(f, "rule '{name}'"),
            Self::RuleEnd {
                name,
                matched,
                stop_processing,
                end_request,
            } => write!(
                f,
                "end rule '{name}' matched={matched} stop={stop_processing} end={end_request}"
            ),
            Self::ConditionListBegin { logic } => write!(f, "conditions {logic}"),
            Self::ConditionListEnd { logic, result } => write!(f, "end conditions {logic} = {result}"),
            Self::Condition {
                description,
                result,
            } => write!(f, "condition {description} = {result}"),
            Self::Action {
                description,
                stop_processing,
                end_request,
            } => write!(
                f,
                "action {description} stop={stop_processing} end={end_request}"
            ),
        }
    }
}

/// Receives evaluation events.
pub trait TraceSink: Send + Sync {
    fn record(&self, event: TraceEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&self, _event: TraceEvent) {}
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, event: TraceEvent) {
        match &event {
            TraceEvent::RuleEnd {
                name,
                matched,
                stop_processing,
                end_request,
            } => tracing::debug!(
                rule = %name,
                matched,
                stop_processing,
                end_request,
                "rule evaluated"
            ),
            TraceEvent::Condition {
                description,
                result,
            } => tracing::debug!(condition = %description, result, "condition evaluated"),
            TraceEvent::Action {
                description,
                stop_processing,
                end_request,
            } => tracing::debug!(
                action = %description,
                stop_processing,
                end_request,
                "action performed"
            ),
            other => tracing::trace!(event = %other, "rewrite trace"),
        }
    }
}
