use crate::action::{
    Action, ActionList, ActionOutcome, Append, CustomResponse, Delete, Insert, Keep, Normalize,
    Redirect, RedirectCode, Replace, SeparatorPolicy, Truncate,
};
use crate::conf::macros::MacroCompiler;
use crate::conf::types::{
    ActionSpec, ConditionSpec, ConditionsSpec, MatchSpec, RewriteMapSpec, RuleSpec, RulesDocument,
    Scalar,
};
use crate::conf::{ConfigError, Origin};
use crate::condition::{
    CombinationLogic, Comparison, Condition, ConditionList, MatchKind, NumberMatch, PathKind,
    StaticPathMatch, StringMatch,
};
use crate::error::BuildError;
use crate::registry::CustomRegistry;
use crate::rule::{CaptureKey, Rule, RuleList, RuleSet};
use crate::value::{RewriteMap, Scope, Value, ValueGetter};
use http::StatusCode;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Lowers a parsed rules document into an executable [`RuleSet`].
pub fn compile(
    document: RulesDocument,
    path: &Path,
    registry: &CustomRegistry,
) -> Result<RuleSet, ConfigError> {
    let maps = compile_maps(document.rewrite_maps)?;
    let rules = document
        .rules
        .ok_or_else(|| ConfigError::MissingRules {
            path: path.to_path_buf(),
        })?;

    let compiler = Compiler {
        macros: MacroCompiler::new(&maps, registry),
        registry,
    };

    let mut root = RuleList::new("root");
    for (i, spec) in rules.into_iter().enumerate() {
        if let Some(rule) = compiler.rule(spec, i)? {
            root.rules.push(rule);
        }
    }

    let rule_set = RuleSet { root, maps };

    tracing::info!(
        file = %path.display(),
        rules = rule_set.rule_count(),
        maps = rule_set.map_count(),
        "rules compiled"
    );

    Ok(rule_set)
}

//-----------------------------------------------------------------------------
// Rewrite maps
//-----------------------------------------------------------------------------

fn compile_maps(specs: Vec<RewriteMapSpec>) -> Result<HashMap<String, Arc<RewriteMap>>, ConfigError> {
    let mut maps = HashMap::new();

    for spec in specs {
        let name = match spec.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => return Err(ConfigError::UnnamedMap { origin: spec.origin }),
        };
        if name.contains(':') {
            return Err(ConfigError::InvalidMapName {
                origin: spec.origin,
                name,
            });
        }

        let key = name.to_ascii_lowercase();
        if maps.contains_key(&key) {
            return Err(ConfigError::DuplicateMap {
                origin: spec.origin,
                name,
            });
        }

        let mut map = RewriteMap::new(name, spec.default_value);
        for (from, to) in spec.entries {
            map.insert(&from, to);
        }

        tracing::debug!(map = map.name(), entries = map.len(), "rewrite map compiled");
        maps.insert(key, Arc::new(map));
    }

    Ok(maps)
}

//-----------------------------------------------------------------------------
// Rules
//-----------------------------------------------------------------------------

struct Compiler<'a> {
    macros: MacroCompiler<'a>,
    registry: &'a CustomRegistry,
}

impl Compiler<'_> {
    fn rule(&self, spec: RuleSpec, index: usize) -> Result<Option<Rule>, ConfigError> {
        let name = spec.name.clone().unwrap_or_else(|| format!("rule-{index}"));

        if !spec.enabled {
            tracing::debug!(rule = %name, "rule disabled, skipped");
            return Ok(None);
        }

        //---------------------------------------------------------------------
        // Condition: `match` plus `conditions`, combined with MatchAll
        //---------------------------------------------------------------------
        let mut conditions = ConditionList::new(CombinationLogic::MatchAll);

        if let Some(matcher) = &spec.matcher {
            conditions.push(self.match_condition(matcher, &spec.origin)?);
        }
        if let Some(block) = &spec.conditions {
            conditions.push(self.condition_list(block, &spec.origin)?);
        }

        //---------------------------------------------------------------------
        // Action: `actions` plus nested `rules`
        //---------------------------------------------------------------------
        let mut actions = ActionList::new();

        for action in &spec.actions {
            actions.push(self.action(action)?);
        }

        if !spec.rules.is_empty() {
            let mut nested = RuleList::new(name.clone());
            for (i, child) in spec.rules.into_iter().enumerate() {
                if let Some(rule) = self.rule(child, i)? {
                    nested.rules.push(rule);
                }
            }
            actions.push(Action::Rules(nested));
        }

        let rule = Rule {
            name,
            condition: (!conditions.is_empty()).then(|| conditions.into_condition()),
            action: (!actions.is_empty()).then(|| actions.into_action()),
            stop_processing: spec.stop_processing,
            is_dynamic: spec.dynamic,
        };

        tracing::debug!(origin = %spec.origin, rule = %rule.name, "rule compiled");

        Ok(Some(rule))
    }

    fn match_condition(&self, spec: &MatchSpec, origin: &Origin) -> Result<Condition, ConfigError> {
        let origin = origin.nested("match", None);

        let input = match &spec.input {
            Some(text) => self.value(text, &origin)?,
            None => ValueGetter::new(Scope::MatchPath, None)
                .map_err(|e| ConfigError::build(&origin, e))?
                .into(),
        };

        let kind = match spec.syntax.as_deref() {
            Some(syntax) => syntax
                .parse::<MatchKind>()
                .map_err(|e| ConfigError::build(&origin, e))?,
            None => MatchKind::Regex,
        };

        let matcher = StringMatch::new(input, kind, &spec.url, spec.ignore_case)
            .map_err(|e| ConfigError::build(&origin, e))?
            .with_inverted(spec.negate)
            .with_capture_key(CaptureKey::Match);

        Ok(matcher.into())
    }

    fn condition_list(
        &self,
        spec: &ConditionsSpec,
        origin: &Origin,
    ) -> Result<ConditionList, ConfigError> {
        let logic = match spec.logic.as_deref() {
            Some(logic) => logic
                .parse::<CombinationLogic>()
                .map_err(|e| ConfigError::build(origin, e))?,
            None => CombinationLogic::MatchAll,
        };

        let mut list = ConditionList::new(logic).with_track_all_captures(spec.track_all_captures);
        for item in &spec.items {
            list.push(self.condition(item)?);
        }

        Ok(list)
    }

    fn condition(&self, spec: &ConditionSpec) -> Result<Condition, ConfigError> {
        let origin = &spec.origin;

        if let Some(group) = &spec.group {
            return Ok(self.condition_list(group, origin)?.into());
        }

        let input = self.condition_input(spec)?;
        let match_type = spec
            .match_type
            .clone()
            .unwrap_or_else(|| "pattern".to_owned());
        let key: String = match_type
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let condition = match key.as_str() {
            "number" => {
                let compare = match spec.operator.as_deref() {
                    Some(operator) => operator
                        .parse::<Comparison>()
                        .map_err(|e| ConfigError::build(origin, e))?,
                    None => Comparison::Equals,
                };
                let operand = spec.value.ok_or_else(|| ConfigError::MissingField {
                    origin: origin.clone(),
                    field: "value",
                })?;

                NumberMatch::new(input, compare, operand)
                    .with_default(spec.default.unwrap_or_default())
                    .with_inverted(spec.negate)
                    .into()
            }
            "isfile" | "file" => StaticPathMatch::new(input, PathKind::File)
                .with_inverted(spec.negate)
                .into(),
            "isdirectory" | "directory" => StaticPathMatch::new(input, PathKind::Directory)
                .with_inverted(spec.negate)
                .into(),
            "exists" => StaticPathMatch::new(input, PathKind::Any)
                .with_inverted(spec.negate)
                .into(),
            _ => match match_type.parse::<MatchKind>() {
                Ok(kind) => {
                    let pattern = spec.pattern.as_deref().ok_or_else(|| {
                        ConfigError::MissingField {
                            origin: origin.clone(),
                            field: "pattern",
                        }
                    })?;
                    StringMatch::new(input, kind, pattern, spec.ignore_case)
                        .map_err(|e| ConfigError::build(origin, e))?
                        .with_inverted(spec.negate)
                        .into()
                }
                Err(_) => self.custom_condition(&match_type, spec)?,
            },
        };

        Ok(condition)
    }

    fn condition_input(&self, spec: &ConditionSpec) -> Result<Value, ConfigError> {
        match (&spec.input, &spec.scope) {
            (Some(text), _) => self.value(text, &spec.origin),
            (None, Some(scope)) => self.scoped(scope, spec.index.as_ref(), &spec.origin),
            (None, None) => ValueGetter::new(Scope::MatchPath, None)
                .map(Value::from)
                .map_err(|e| ConfigError::build(&spec.origin, e)),
        }
    }

    fn custom_condition(&self, name: &str, spec: &ConditionSpec) -> Result<Condition, ConfigError> {
        let build = self
            .registry
            .condition(name)
            .ok_or_else(|| ConfigError::UnknownMatchType {
                origin: spec.origin.clone(),
                kind: name.to_owned(),
            })?;

        let condition = build(&spec.params).map_err(|source| ConfigError::Custom {
            origin: spec.origin.clone(),
            kind: "condition",
            name: name.to_owned(),
            source,
        })?;

        Ok(Condition::Custom {
            condition,
            inverted: spec.negate,
        })
    }

    //-------------------------------------------------------------------------
    // Actions
    //-------------------------------------------------------------------------

    fn action(&self, spec: &ActionSpec) -> Result<Action, ConfigError> {
        let origin = &spec.origin;
        let build = |e: BuildError| ConfigError::build(origin, e);
        let index = spec.index.as_ref().map(Scalar::to_text);
        let index = index.as_deref();

        let key: String = spec
            .kind
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let action = match key.as_str() {
            "rewrite" => {
                let value = match &spec.value {
                    Some(_) => self.required_value(spec)?,
                    None => self.value(required(&spec.url, "url", origin)?, origin)?,
                };
                Action::Replace(Replace::new(Scope::Url, None, value).map_err(build)?)
            }
            "replace" => Action::Replace(
                Replace::new(self.target_scope(spec)?, index, self.required_value(spec)?)
                    .map_err(build)?,
            ),
            "append" => Action::Append(
                Append::new(self.target_scope(spec)?, index, self.required_value(spec)?)
                    .map_err(build)?,
            ),
            "insert" => Action::Insert(
                Insert::new(self.target_scope(spec)?, index, self.required_value(spec)?)
                    .map_err(build)?,
            ),
            "delete" => Action::Delete(Delete::new(self.target_scope(spec)?, index).map_err(build)?),
            "keep" => Action::Keep(Keep::new(self.target_scope(spec)?, index).map_err(build)?),
            "normalize" => {
                let policy = |text: &Option<String>| -> Result<SeparatorPolicy, ConfigError> {
                    text.as_deref()
                        .map_or(Ok(SeparatorPolicy::Leave), str::parse)
                        .map_err(build)
                };
                Action::Normalize(Normalize::new(policy(&spec.leading)?, policy(&spec.trailing)?))
            }
            "truncate" => {
                let depth = spec.max_depth.ok_or_else(|| ConfigError::MissingField {
                    origin: origin.clone(),
                    field: "max_depth",
                })?;
                Action::Truncate(Truncate::new(depth))
            }
            "redirect" => {
                let code = match &spec.redirect_type {
                    Some(kind) => kind.to_text().parse::<RedirectCode>().map_err(build)?,
                    None => RedirectCode::default(),
                };
                let url = match &spec.url {
                    Some(text) => Some(self.value(text, origin)?),
                    None => self.value_source(spec)?,
                };
                let mut redirect = Redirect::new(url, code);
                redirect.outcome = overridden(spec, redirect.outcome);
                Action::Redirect(redirect)
            }
            "customresponse" | "respond" => {
                let code = spec.status_code.unwrap_or(200);
                let status = StatusCode::from_u16(code).map_err(|_| ConfigError::InvalidStatus {
                    origin: origin.clone(),
                    code,
                })?;
                let reason = spec.status_reason.clone().unwrap_or_else(|| {
                    status.canonical_reason().unwrap_or_default().to_owned()
                });

                let mut response = CustomResponse::new(code, reason);
                if let Some(body) = &spec.body {
                    response = response.with_body(self.value(body, origin)?);
                }
                response.outcome = overridden(spec, response.outcome);
                Action::CustomResponse(response)
            }
            "abort" => Action::Abort,
            "none" | "donothing" => Action::DoNothing(overridden(spec, ActionOutcome::CONTINUE)),
            _ => self.custom_action(spec)?,
        };

        Ok(with_flags(action, spec))
    }

    fn custom_action(&self, spec: &ActionSpec) -> Result<Action, ConfigError> {
        let build = self
            .registry
            .action(&spec.kind)
            .ok_or_else(|| ConfigError::UnknownActionType {
                origin: spec.origin.clone(),
                kind: spec.kind.clone(),
            })?;

        build(&spec.params)
            .map(Action::Custom)
            .map_err(|source| ConfigError::Custom {
                origin: spec.origin.clone(),
                kind: "action",
                name: spec.kind.clone(),
                source,
            })
    }

    /// The scope an action writes to; defaults to the path.
    fn target_scope(&self, spec: &ActionSpec) -> Result<Scope, ConfigError> {
        match spec.scope.as_deref() {
            Some(scope) => scope
                .parse::<Scope>()
                .map_err(|e| ConfigError::build(&spec.origin, e)),
            None => Ok(Scope::Path),
        }
    }

    fn required_value(&self, spec: &ActionSpec) -> Result<Value, ConfigError> {
        self.value_source(spec)?.ok_or_else(|| ConfigError::MissingField {
            origin: spec.origin.clone(),
            field: "value",
        })
    }

    /// `value` (macro text), `literal` (verbatim) or `from_scope`.
    fn value_source(&self, spec: &ActionSpec) -> Result<Option<Value>, ConfigError> {
        if let Some(text) = &spec.value {
            return self.value(text, &spec.origin).map(Some);
        }
        if let Some(text) = &spec.literal {
            return Ok(Some(Value::literal(text.clone())));
        }
        if let Some(scope) = &spec.from_scope {
            return self
                .scoped(scope, spec.from_index.as_ref(), &spec.origin)
                .map(Some);
        }
        Ok(None)
    }

    //-------------------------------------------------------------------------
    // Values
    //-------------------------------------------------------------------------

    fn value(&self, text: &str, origin: &Origin) -> Result<Value, ConfigError> {
        self.macros
            .compile(text)
            .map_err(|e| ConfigError::macro_error(origin, text, e))
    }

    fn scoped(&self, scope: &str, index: Option<&Scalar>, origin: &Origin) -> Result<Value, ConfigError> {
        let scope = scope
            .parse::<Scope>()
            .map_err(|e| ConfigError::build(origin, e))?;
        let index = index.map(Scalar::to_text);

        ValueGetter::new(scope, index.as_deref())
            .map(Value::from)
            .map_err(|e| ConfigError::build(origin, e))
    }
}

fn required<'t>(
    field: &'t Option<String>,
    name: &'static str,
    origin: &Origin,
) -> Result<&'t str, ConfigError> {
    field.as_deref().ok_or_else(|| ConfigError::MissingField {
        origin: origin.clone(),
        field: name,
    })
}

/// Applies `stop_processing` / `end_request` overrides to a default.
fn overridden(spec: &ActionSpec, default: ActionOutcome) -> ActionOutcome {
    ActionOutcome::new(
        spec.stop_processing.unwrap_or(default.stop_processing),
        spec.end_request.unwrap_or(default.end_request),
    )
}

/// Mutators and custom actions carry no flags of their own; configured
/// flags follow them as a no-op step.
fn with_flags(action: Action, spec: &ActionSpec) -> Action {
    let flags = overridden(spec, ActionOutcome::CONTINUE);
    let carries_flags = matches!(
        action,
        Action::Redirect(_) | Action::CustomResponse(_) | Action::DoNothing(_) | Action::Abort
    );

    if carries_flags || flags == ActionOutcome::CONTINUE {
        return action;
    }

    ActionList::new()
        .with(action)
        .with(Action::DoNothing(flags))
        .into_action()
}
