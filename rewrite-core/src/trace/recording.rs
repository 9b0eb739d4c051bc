use crate::trace::{TraceEvent, TraceSink};
use owo_colors::OwoColorize;
use std::sync::Mutex;

/// Buffers events in memory, for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn take(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl TraceSink for RecordingSink {
    fn record(&self, event: TraceEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Renders events as an indented tree, one line per event.
pub fn render_plain(events: &[TraceEvent]) -> String {
    render(events, |event| event.to_string())
}

/// Like [`render_plain`] with matches in green and misses dimmed.
pub fn render_pretty(events: &[TraceEvent]) -> String {
    render(events, |event| {
        let line = event.to_string();
        match event {
            TraceEvent::Condition { result: true, .. }
            | TraceEvent::ConditionListEnd { result: true, .. }
            | TraceEvent::RuleEnd { matched: true, .. } => line.green().to_string(),
            TraceEvent::Condition { result: false, .. }
            | TraceEvent::ConditionListEnd { result: false, .. }
            | TraceEvent::RuleEnd { matched: false, .. } => line.dimmed().to_string(),
            TraceEvent::Action { .. } => line.yellow().to_string(),
            _ => line.bold().to_string(),
        }
    })
}

fn render(events: &[TraceEvent], line: impl Fn(&TraceEvent) -> String) -> String {
    let mut out = String::new();
    let mut depth: i32 = 0;

    for event in events {
        let delta = event.depth_delta();
        if delta < 0 {
            depth = (depth + delta).max(0);
        }

        out.push_str(&"  ".repeat(depth as usize));
        out.push_str(&line(event));
        out.push('\n');

        if delta > 0 {
            depth += delta;
        }
    }

    out
}
