use rewrite_core::env::{EvalEnv, ExecutionMode};
use rewrite_core::trace::{RecordingSink, TraceEvent};
use rewrite_core::{CustomRegistry, RequestState, RewriteEngine, RewriteOutcome, load_rules};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Compiled rules plus a recording trace sink, ready to rewrite URLs.
pub struct TestEngine {
    engine: RewriteEngine,
    sink: Arc<RecordingSink>,
    // Keeps inline rules files alive for the engine's lifetime.
    _dir: Option<TempDir>,
}

impl TestEngine {
    /// Loads `fixtures/rules/<name>.hcl`.
    ///
    /// File conditions resolve against `fixtures/public`.
    pub fn from_fixture(name: &str) -> Self {
        let path = fixture_path("rules").join(format!("{name}.hcl"));
        assert!(path.exists(), "fixture rules file does not exist: {path:?}");

        Self::load(&path, &CustomRegistry::new(), None)
    }

    /// Writes `text` to a temporary rules file and loads it the way a host
    /// would.
    pub fn from_text(text: &str) -> Self {
        Self::from_text_with(text, &CustomRegistry::new())
    }

    pub fn from_text_with(text: &str, registry: &CustomRegistry) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("rules.hcl");
        fs::write(&path, text).expect("failed to write rules file");

        Self::load(&path, registry, Some(dir))
    }

    fn load(path: &Path, registry: &CustomRegistry, dir: Option<TempDir>) -> Self {
        let rules = load_rules(path, registry).expect("failed to load rules");
        let sink = Arc::new(RecordingSink::new());

        let env = EvalEnv::default()
            .with_mode(ExecutionMode::ExecuteAndTrace)
            .with_document_root(fixture_path("public"))
            .with_trace(sink.clone());

        Self {
            engine: RewriteEngine::new(Arc::new(rules), env),
            sink,
            _dir: dir,
        }
    }

    /// Starts a request for `url`.
    pub fn get(&self, url: &str) -> TestRequest<'_> {
        TestRequest {
            engine: self,
            state: RequestState::new(url),
        }
    }

    /// Shorthand for a request without headers or variables.
    pub fn rewrite(&self, url: &str) -> RewriteOutcome {
        self.get(url).send()
    }

    pub fn engine(&self) -> &RewriteEngine {
        &self.engine
    }

    /// Trace events recorded since the last call.
    pub fn take_trace(&self) -> Vec<TraceEvent> {
        self.sink.take()
    }
}

/// A request being assembled against a [`TestEngine`].
pub struct TestRequest<'a> {
    engine: &'a TestEngine,
    state: RequestState,
}

impl TestRequest<'_> {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.state = self.state.with_header(name, value);
        self
    }

    pub fn var(mut self, name: &str, value: &str) -> Self {
        self.state = self.state.with_server_variable(name, value);
        self
    }

    pub fn send(self) -> RewriteOutcome {
        self.send_with_state().0
    }

    /// Like [`Self::send`], also returning the request after evaluation.
    pub fn send_with_state(mut self) -> (RewriteOutcome, RequestState) {
        let outcome = self.engine.engine.process(&mut self.state);
        (outcome, self.state)
    }

    /// Evaluates a copy in trace-only mode.
    pub fn dry_run(self) -> RewriteOutcome {
        self.engine.engine.dry_run(&self.state)
    }
}

/// `integration-tests/fixtures/<name>`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}
