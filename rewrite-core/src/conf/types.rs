use crate::conf::Origin;
use crate::registry::CustomParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top level of a rules file.
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RulesDocument {
    #[serde(default)]
    pub rewrite_maps: Vec<RewriteMapSpec>,
    pub rules: Option<Vec<RuleSpec>>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RewriteMapSpec {
    #[serde(skip)]
    pub origin: Origin,
    pub name: Option<String>,
    pub default_value: Option<String>,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    #[serde(skip)]
    pub origin: Origin,
    pub name: Option<String>,
    #[serde(default)]
    pub stop_processing: bool,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(rename = "match")]
    pub matcher: Option<MatchSpec>,
    pub conditions: Option<ConditionsSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// The rule's primary pattern; its captures are addressed as `{R:n}`.
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MatchSpec {
    pub url: String,
    /// `regex` (default), `wildcard` or `exact`.
    pub syntax: Option<String>,
    #[serde(default = "default_true")]
    pub ignore_case: bool,
    #[serde(default)]
    pub negate: bool,
    /// Macro text matched instead of the request path.
    pub input: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConditionsSpec {
    pub logic: Option<String>,
    #[serde(default)]
    pub track_all_captures: bool,
    #[serde(default)]
    pub items: Vec<ConditionSpec>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConditionSpec {
    #[serde(skip)]
    pub origin: Origin,
    pub input: Option<String>,
    pub scope: Option<String>,
    pub index: Option<Scalar>,
    pub pattern: Option<String>,
    pub match_type: Option<String>,
    #[serde(default)]
    pub negate: bool,
    #[serde(default = "default_true")]
    pub ignore_case: bool,
    pub operator: Option<String>,
    pub value: Option<i64>,
    pub default: Option<i64>,
    pub group: Option<ConditionsSpec>,
    #[serde(default)]
    pub params: CustomParams,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ActionSpec {
    #[serde(skip)]
    pub origin: Origin,
    #[serde(rename = "type")]
    pub kind: String,
    pub scope: Option<String>,
    pub index: Option<Scalar>,

    // Value source: macro text, verbatim text or another scope.
    pub value: Option<String>,
    pub literal: Option<String>,
    pub from_scope: Option<String>,
    pub from_index: Option<Scalar>,

    pub url: Option<String>,
    pub redirect_type: Option<Scalar>,
    pub status_code: Option<u16>,
    pub status_reason: Option<String>,
    pub body: Option<String>,

    pub leading: Option<String>,
    pub trailing: Option<String>,
    pub max_depth: Option<usize>,

    pub stop_processing: Option<bool>,
    pub end_request: Option<bool>,

    #[serde(default)]
    pub params: CustomParams,
}

/// An attribute written either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(i64),
    Text(String),
}

impl Scalar {
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}
