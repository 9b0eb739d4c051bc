use crate::conf::load_rules;
use crate::ctx::RequestState;
use crate::engine::{RewriteEngine, RewriteOutcome};
use crate::env::{EvalEnv, ExecutionMode};
use crate::registry::CustomRegistry;
use crate::trace::{RecordingSink, TraceEvent, TraceSink, TracingSink, render_pretty};
use anyhow::{Context, anyhow};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Path to the rules file
    pub path: PathBuf,

    /// Request target, e.g. `/a/b?x=1`
    pub url: String,

    /// Request header as `name=value` (repeatable)
    #[arg(long = "header", value_parser = parse_key_value)]
    pub headers: Vec<(String, String)>,

    /// Server variable as `name=value` (repeatable)
    #[arg(long = "var", value_parser = parse_key_value)]
    pub variables: Vec<(String, String)>,

    /// Print the evaluation trace
    #[arg(long)]
    pub trace: bool,

    /// Print the outcome (and trace) as JSON
    #[arg(long)]
    pub json: bool,

    /// Root for file and directory conditions
    #[arg(long, default_value = ".")]
    pub document_root: PathBuf,

    /// Schedule redirects and responses as a live request would
    #[arg(long)]
    pub execute: bool,
}

#[derive(Serialize)]
struct EvalReport<'a> {
    original_url: String,
    #[serde(flatten)]
    outcome: &'a RewriteOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<TraceEvent>>,
}

pub fn eval(args: EvalArgs) -> anyhow::Result<()> {
    let rules = load_rules(&args.path, &CustomRegistry::new())
        .with_context(|| format!("failed to load rules from {}", args.path.display()))?;

    let mut state = RequestState::new(&args.url);
    for (name, value) in &args.headers {
        state = state.with_header(name, value);
    }
    for (name, value) in &args.variables {
        state = state.with_server_variable(name, value);
    }

    let mode = if args.execute {
        ExecutionMode::ExecuteAndTrace
    } else {
        ExecutionMode::TraceOnly
    };
    // Without --trace the walk goes to the debug log instead.
    let recorder = Arc::new(RecordingSink::new());
    let sink: Arc<dyn TraceSink> = if args.trace {
        recorder.clone()
    } else {
        Arc::new(TracingSink)
    };
    let env = EvalEnv::default()
        .with_mode(mode)
        .with_document_root(&args.document_root)
        .with_trace(sink);

    let engine = RewriteEngine::new(Arc::new(rules), env);
    let outcome = engine.process(&mut state);
    let events = recorder.take();

    if args.json {
        let report = EvalReport {
            original_url: state.original_url_string(),
            outcome: &outcome,
            trace: args.trace.then_some(events),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.trace {
        print!("{}", render_pretty(&events));
        println!();
    }

    print_outcome(&state, &outcome);
    Ok(())
}

fn print_outcome(state: &RequestState, outcome: &RewriteOutcome) {
    let flag = |set: bool| if set { "yes".green().to_string() } else { "no".dimmed().to_string() };

    println!("{} {}", "original:".bold(), state.original_url_string());
    println!("{} {}", "rewritten:".bold(), outcome.new_url);
    println!("  matched      {}", flag(outcome.matched));
    println!("  modified     {}", flag(outcome.modified));
    println!("  end request  {}", flag(outcome.end_request));
    println!("  dynamic      {}", flag(outcome.is_dynamic));

    for action in &outcome.deferred {
        println!("  {} {action}", "deferred:".yellow());
    }
}

/// Parses `name=value`.
pub fn parse_key_value(raw: &str) -> anyhow::Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected name=value, got '{raw}'"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("empty name in '{raw}'"));
    }

    Ok((name.to_owned(), value.to_owned()))
}
