//! Collaborators and switches an evaluation runs with.

mod probe;

pub use probe::*;

use crate::trace::{NullSink, TraceEvent, TraceSink};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Gates real side effects and trace events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Queue redirects/responses; no trace events.
    #[default]
    ExecuteOnly,
    /// Emit trace events; queue nothing.
    TraceOnly,
    /// Queue side effects and emit trace events.
    ExecuteAndTrace,
}

impl ExecutionMode {
    pub fn executes(self) -> bool {
        matches!(self, Self::ExecuteOnly | Self::ExecuteAndTrace)
    }

    pub fn traces(self) -> bool {
        matches!(self, Self::TraceOnly | Self::ExecuteAndTrace)
    }
}

/// Per-engine collaborators shared by every request.
#[derive(Clone)]
pub struct EvalEnv {
    pub mode: ExecutionMode,
    pub document_root: PathBuf,
    pub trace: Arc<dyn TraceSink>,
    pub files: Arc<dyn FileProbe>,
}

impl Default for EvalEnv {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::ExecuteOnly,
            document_root: PathBuf::from("."),
            trace: Arc::new(NullSink),
            files: Arc::new(StdFileProbe),
        }
    }
}

impl fmt::Debug for EvalEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalEnv")
            .field("mode", &self.mode)
            .field("document_root", &self.document_root)
            .finish_non_exhaustive()
    }
}

impl EvalEnv {
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_document_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.document_root = root.into();
        self
    }

    pub fn with_trace(mut self, trace: Arc<dyn TraceSink>) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_files(mut self, files: Arc<dyn FileProbe>) -> Self {
        self.files = files;
        self
    }

    /// Records `event` when the mode traces. The closure keeps description
    /// formatting off the execute-only path.
    pub(crate) fn trace(&self, event: impl FnOnce() -> TraceEvent) {
        if self.mode.traces() {
            self.trace.record(event());
        }
    }
}
