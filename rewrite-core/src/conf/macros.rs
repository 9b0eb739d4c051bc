//! The `{...}` macro sublanguage of text attributes.
//!
//! A text is first split into literal and macro spans by a brace-depth
//! tokenizer, then each macro span is compiled into a value getter:
//!
//! - `{R:n}` / `{C:n}`: capture group `n` of the match / conditions
//! - `{op:text}`: operation `op` (built-in, rewrite map or custom) applied
//!   to the expansion of `text`
//! - `{HTTP_X_Y}`: request header `x-y`
//! - `{NAME}`: server variable `NAME`

use crate::registry::CustomRegistry;
use crate::rule::CaptureKey;
use crate::value::{Operation, RewriteMap, Value, ValueConcatenator, ValueGetter};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Deepest brace nesting accepted in one text.
pub const MAX_NESTING: usize = 32;

#[derive(Debug, Error)]
pub enum MacroError {
    #[error("unbalanced '{{' at offset {offset}")]
    Unbalanced { offset: usize },

    #[error("macros nested deeper than {} levels", MAX_NESTING)]
    TooDeep,

    #[error("capture reference '{0}' needs a numeric index")]
    InvalidCapture(String),

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("custom operation '{name}' failed to build: {source}")]
    CustomOperation {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Literal(String),
    /// Text between the outermost braces.
    Macro(String),
}

/// Splits `text` into depth-0 literal runs and depth-1 macro runs.
/// A `}` without an open brace is literal text.
pub fn tokenize(text: &str) -> Result<Vec<Span>, MacroError> {
    let mut spans = Vec::new();
    let mut buffer = String::new();
    let mut open_offsets: Vec<usize> = Vec::new();

    for (offset, ch) in text.char_indices() {
        match ch {
            '{' => {
                if open_offsets.is_empty() {
                    if !buffer.is_empty() {
                        spans.push(Span::Literal(std::mem::take(&mut buffer)));
                    }
                } else {
                    buffer.push(ch);
                }
                open_offsets.push(offset);
                if open_offsets.len() > MAX_NESTING {
                    return Err(MacroError::TooDeep);
                }
            }
            '}' if !open_offsets.is_empty() => {
                open_offsets.pop();
                if open_offsets.is_empty() {
                    spans.push(Span::Macro(std::mem::take(&mut buffer)));
                } else {
                    buffer.push(ch);
                }
            }
            _ => buffer.push(ch),
        }
    }

    if let Some(&offset) = open_offsets.first() {
        return Err(MacroError::Unbalanced { offset });
    }
    if !buffer.is_empty() {
        spans.push(Span::Literal(buffer));
    }

    Ok(spans)
}

/// Compiles macro text into values, resolving operation names against the
/// rewrite maps of the document and the custom registry.
pub struct MacroCompiler<'a> {
    maps: &'a HashMap<String, Arc<RewriteMap>>,
    registry: &'a CustomRegistry,
}

impl<'a> MacroCompiler<'a> {
    pub fn new(maps: &'a HashMap<String, Arc<RewriteMap>>, registry: &'a CustomRegistry) -> Self {
        Self { maps, registry }
    }

    pub fn compile(&self, text: &str) -> Result<Value, MacroError> {
        let mut parts = tokenize(text)?
            .into_iter()
            .map(|span| match span {
                Span::Literal(text) => Ok(Value::literal(text)),
                Span::Macro(inner) => self.compile_macro(&inner),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match parts.len() {
            0 => Value::literal(""),
            1 => parts.remove(0),
            _ => Value::Concat(ValueConcatenator::new(parts)),
        })
    }

    fn compile_macro(&self, inner: &str) -> Result<Value, MacroError> {
        if let Some((prefix, rest)) = split_prefix(inner) {
            return match prefix.to_ascii_uppercase().as_str() {
                "R" => capture(CaptureKey::Match, rest),
                "C" => capture(CaptureKey::Condition, rest),
                _ => {
                    let operation = self.operation(prefix)?;
                    Ok(self.compile(rest)?.with_operation(operation))
                }
            };
        }

        let name = inner.trim();
        if name.contains('{') {
            return self.compile(name);
        }

        match strip_prefix_ignore_case(name, "HTTP_") {
            Some(header) => {
                let header = header.replace('_', "-").to_ascii_lowercase();
                Ok(ValueGetter::header(&header).into())
            }
            None => Ok(ValueGetter::server_variable(name).into()),
        }
    }

    fn operation(&self, name: &str) -> Result<Operation, MacroError> {
        if let Some(builtin) = Operation::builtin(name) {
            return Ok(builtin);
        }

        if let Some(map) = self.maps.get(&name.to_ascii_lowercase()) {
            return Ok(Operation::Map(Arc::clone(map)));
        }

        match self.registry.operation(name) {
            Some(build) => build(&Default::default())
                .map(Operation::Custom)
                .map_err(|source| MacroError::CustomOperation {
                    name: name.to_owned(),
                    source,
                }),
            None => Err(MacroError::UnknownOperation(name.to_owned())),
        }
    }
}

/// `name:rest`, when the colon comes before any nested brace.
fn split_prefix(inner: &str) -> Option<(&str, &str)> {
    let colon = inner.find(':')?;
    match inner.find('{') {
        Some(brace) if brace < colon => None,
        _ => Some((inner[..colon].trim(), &inner[colon + 1..])),
    }
}

fn capture(key: CaptureKey, index: &str) -> Result<Value, MacroError> {
    let group = index
        .trim()
        .parse::<usize>()
        .map_err(|_| MacroError::InvalidCapture(format!("{key}:{index}")))?;

    Ok(ValueGetter::capture(key, group).into())
}

fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
