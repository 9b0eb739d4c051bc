use crate::condition::Condition;
use crate::ctx::RequestState;
use crate::env::EvalEnv;
use crate::error::BuildError;
use crate::rule::RuleResult;
use crate::trace::TraceEvent;
use std::fmt;
use std::str::FromStr;

/// How a [`ConditionList`] combines its children.
///
/// | Logic       | true iff          | stops at    | empty |
/// |-------------|-------------------|-------------|-------|
/// | MatchAll    | every child true  | first false | true  |
/// | MatchAny    | some child true   | first true  | false |
/// | MatchNone   | every child false | first true  | true  |
/// | MatchNotAny | some child false  | first false | false |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinationLogic {
    #[default]
    MatchAll,
    MatchAny,
    MatchNone,
    MatchNotAny,
}

impl CombinationLogic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MatchAll => "matchAll",
            Self::MatchAny => "matchAny",
            Self::MatchNone => "matchNone",
            Self::MatchNotAny => "matchNotAny",
        }
    }
}

impl FromStr for CombinationLogic {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "matchall" | "all" | "and" => Ok(Self::MatchAll),
            "matchany" | "any" | "or" => Ok(Self::MatchAny),
            "matchnone" | "none" => Ok(Self::MatchNone),
            "matchnotany" | "notany" => Ok(Self::MatchNotAny),
            _ => Err(BuildError::UnknownLogic(s.to_owned())),
        }
    }
}

impl fmt::Display for CombinationLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConditionList {
    pub logic: CombinationLogic,
    /// Appends regex captures of every child instead of keeping the last.
    pub track_all_captures: bool,
    conditions: Vec<Condition>,
}

impl ConditionList {
    pub fn new(logic: CombinationLogic) -> Self {
        Self {
            logic,
            track_all_captures: false,
            conditions: Vec::new(),
        }
    }

    pub fn with_track_all_captures(mut self, track: bool) -> Self {
        self.track_all_captures = track;
        self
    }

    /// Adds a child. A child list with the same logic and capture flag is
    /// flattened into this one.
    pub fn push(&mut self, condition: impl Into<Condition>) {
        match condition.into() {
            Condition::List(child)
                if child.logic == self.logic
                    && child.track_all_captures == self.track_all_captures =>
            {
                self.conditions.extend(child.conditions);
            }
            other => self.conditions.push(other),
        }
    }

    pub fn with(mut self, condition: impl Into<Condition>) -> Self {
        self.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Collapses to the only child when nothing else would change.
    pub fn into_condition(mut self) -> Condition {
        if self.conditions.len() == 1
            && self.logic == CombinationLogic::MatchAll
            && !self.track_all_captures
        {
            if let Some(only) = self.conditions.pop() {
                return only;
            }
        }
        Condition::List(self)
    }

    pub fn test(&self, state: &RequestState, result: &mut RuleResult<'_>, env: &EvalEnv) -> bool {
        env.trace(|| TraceEvent::ConditionListBegin {
            logic: self.logic.to_string(),
        });

        let previous = result.push_capture_tracking(self.track_all_captures);
        let mut children = self.conditions.iter();

        let outcome = match self.logic {
            CombinationLogic::MatchAll => children.all(|c| c.test(state, result, env)),
            CombinationLogic::MatchAny => children.any(|c| c.test(state, result, env)),
            CombinationLogic::MatchNone => !children.any(|c| c.test(state, result, env)),
            CombinationLogic::MatchNotAny => !children.all(|c| c.test(state, result, env)),
        };

        result.restore_capture_tracking(previous);

        env.trace(|| TraceEvent::ConditionListEnd {
            logic: self.logic.to_string(),
            result: outcome,
        });

        outcome
    }
}

impl fmt::Display for ConditionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = self
            .conditions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}[{children}]", self.logic)
    }
}
