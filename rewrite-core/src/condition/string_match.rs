use crate::ctx::RequestState;
use crate::error::BuildError;
use crate::rule::{CaptureKey, RuleResult};
use crate::value::Value;
use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    StartsWith,
    EndsWith,
    Contains,
    Equals,
    Wildcard,
    Regex,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::Wildcard => "wildcard",
            Self::Regex => "regex",
        }
    }
}

impl FromStr for MatchKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "startswith" | "prefix" => Ok(Self::StartsWith),
            "endswith" | "suffix" => Ok(Self::EndsWith),
            "contains" => Ok(Self::Contains),
            "equals" | "exact" => Ok(Self::Equals),
            "wildcard" | "glob" => Ok(Self::Wildcard),
            "regex" | "regexp" | "pattern" => Ok(Self::Regex),
            _ => Err(BuildError::UnknownMatchKind(s.to_owned())),
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Pattern text, lower-cased when matching ignores case.
    Text(String),
    Wildcard(Pattern),
    Regex(Regex),
}

/// Compares a resolved value against a text, wildcard or regex pattern.
#[derive(Debug, Clone)]
pub struct StringMatch {
    value: Value,
    kind: MatchKind,
    pattern: String,
    matcher: Matcher,
    ignore_case: bool,
    inverted: bool,
    capture_key: CaptureKey,
}

impl StringMatch {
    pub fn new(
        value: Value,
        kind: MatchKind,
        pattern: &str,
        ignore_case: bool,
    ) -> Result<Self, BuildError> {
        let matcher = match kind {
            MatchKind::Regex => Matcher::Regex(
                RegexBuilder::new(pattern)
                    .case_insensitive(ignore_case)
                    .build()
                    .map_err(|source| BuildError::InvalidRegex {
                        pattern: pattern.to_owned(),
                        source,
                    })?,
            ),
            MatchKind::Wildcard => {
                Matcher::Wildcard(Pattern::new(pattern).map_err(|source| {
                    BuildError::InvalidWildcard {
                        pattern: pattern.to_owned(),
                        source,
                    }
                })?)
            }
            _ if ignore_case => Matcher::Text(pattern.to_lowercase()),
            _ => Matcher::Text(pattern.to_owned()),
        };

        Ok(Self {
            value,
            kind,
            pattern: pattern.to_owned(),
            matcher,
            ignore_case,
            inverted: false,
            capture_key: CaptureKey::Condition,
        })
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn with_capture_key(mut self, key: CaptureKey) -> Self {
        self.capture_key = key;
        self
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    /// Regex groups are stored under the capture key only on a successful,
    /// non-inverted match.
    pub fn test(&self, state: &RequestState, result: &mut RuleResult<'_>) -> bool {
        let input = self.value.get_string(state, result);

        let matched = match &self.matcher {
            Matcher::Regex(regex) => match regex.captures(&input) {
                Some(captures) => {
                    if !self.inverted {
                        let groups = captures
                            .iter()
                            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
                            .collect();
                        result.store_captures(self.capture_key, groups);
                    }
                    true
                }
                None => false,
            },
            Matcher::Wildcard(pattern) => pattern.matches_with(
                &input,
                MatchOptions {
                    case_sensitive: !self.ignore_case,
                    require_literal_separator: false,
                    require_literal_leading_dot: false,
                },
            ),
            Matcher::Text(pattern) => {
                let input = if self.ignore_case {
                    input.to_lowercase()
                } else {
                    input
                };
                match self.kind {
                    MatchKind::StartsWith => input.starts_with(pattern.as_str()),
                    MatchKind::EndsWith => input.ends_with(pattern.as_str()),
                    MatchKind::Contains => input.contains(pattern.as_str()),
                    _ => input == *pattern,
                }
            }
        };

        matched != self.inverted
    }
}

impl fmt::Display for StringMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("not ")?;
        }
        write!(f, "{} {} {:?}", self.value, self.kind, self.pattern)?;
        if self.ignore_case {
            f.write_str(" (ignore case)")?;
        }
        Ok(())
    }
}
