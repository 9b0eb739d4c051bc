use crate::action::ActionOutcome;
use crate::ctx::{DeferredAction, RequestState};
use crate::env::EvalEnv;
use crate::error::BuildError;
use crate::rule::RuleResult;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Redirect status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectCode(u16);

impl RedirectCode {
    pub const PERMANENT: Self = Self(301);
    pub const FOUND: Self = Self(302);
    pub const SEE_OTHER: Self = Self(303);
    pub const TEMPORARY: Self = Self(307);

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl Default for RedirectCode {
    fn default() -> Self {
        Self::PERMANENT
    }
}

impl FromStr for RedirectCode {
    type Err = BuildError;

    /// Accepts `permanent`, `found`, `seeOther`, `temporary` or a numeric
    /// 3xx status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "permanent" => Ok(Self::PERMANENT),
            "found" => Ok(Self::FOUND),
            "seeother" => Ok(Self::SEE_OTHER),
            "temporary" => Ok(Self::TEMPORARY),
            numeric => match numeric.parse::<u16>() {
                Ok(code) if (300..400).contains(&code) => Ok(Self(code)),
                _ => Err(BuildError::UnknownRedirectType(s.to_owned())),
            },
        }
    }
}

impl fmt::Display for RedirectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

//-----------------------------------------------------------------------------
// Redirect
//-----------------------------------------------------------------------------

/// Schedules a redirect to `url`, or to the current working URL when no
/// target is configured.
#[derive(Debug, Clone)]
pub struct Redirect {
    pub url: Option<Value>,
    pub code: RedirectCode,
    pub outcome: ActionOutcome,
}

impl Redirect {
    pub fn new(url: Option<Value>, code: RedirectCode) -> Self {
        Self {
            url,
            code,
            outcome: ActionOutcome::TERMINATE,
        }
    }

    pub fn perform(
        &self,
        state: &mut RequestState,
        result: &RuleResult<'_>,
        env: &EvalEnv,
    ) -> ActionOutcome {
        if env.mode.executes() {
            let location = match &self.url {
                Some(url) => url.get_string(state, result),
                None => state.new_url_string(),
            };
            state.defer(DeferredAction::Redirect {
                location,
                status: self.code.as_u16(),
            });
        }

        self.outcome
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "redirect {} -> {url}", self.code),
            None => write!(f, "redirect {} -> url", self.code),
        }
    }
}

//-----------------------------------------------------------------------------
// CustomResponse
//-----------------------------------------------------------------------------

/// Schedules a fixed response instead of forwarding the request.
#[derive(Debug, Clone)]
pub struct CustomResponse {
    pub status: u16,
    pub reason: String,
    pub body: Option<Value>,
    pub outcome: ActionOutcome,
}

impl CustomResponse {
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: None,
            outcome: ActionOutcome::TERMINATE,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn perform(
        &self,
        state: &mut RequestState,
        result: &RuleResult<'_>,
        env: &EvalEnv,
    ) -> ActionOutcome {
        if env.mode.executes() {
            let body = self.body.as_ref().map(|body| body.get_string(state, result));
            state.defer(DeferredAction::Respond {
                status: self.status,
                reason: self.reason.clone(),
                body,
            });
        }

        self.outcome
    }
}

impl fmt::Display for CustomResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "respond {} {:?}", self.status, self.reason)?;
        if let Some(body) = &self.body {
            write!(f, " body={body}")?;
        }
        Ok(())
    }
}
