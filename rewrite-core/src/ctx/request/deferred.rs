use http::{Response, StatusCode, header};
use serde::Serialize;
use std::fmt;

/// A side effect scheduled during rule evaluation and executed by the host
/// once the whole rule tree has been walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeferredAction {
    /// Answer with a redirect to `location`.
    Redirect { location: String, status: u16 },

    /// Answer with a fixed status line and body instead of proxying.
    Respond {
        status: u16,
        reason: String,
        body: Option<String>,
    },
}

impl DeferredAction {
    pub fn status(&self) -> u16 {
        match self {
            Self::Redirect { status, .. } | Self::Respond { status, .. } => *status,
        }
    }

    /// Builds the response the host should send for this action.
    pub fn to_http_response(&self) -> Result<Response<String>, http::Error> {
        match self {
            Self::Redirect { location, status } => Response::builder()
                .status(StatusCode::from_u16(*status).unwrap_or(StatusCode::FOUND))
                .header(header::LOCATION, location.as_str())
                .body(String::new()),

            Self::Respond { status, body, .. } => Response::builder()
                .status(StatusCode::from_u16(*status).unwrap_or(StatusCode::OK))
                .body(body.clone().unwrap_or_default()),
        }
    }
}

impl fmt::Display for DeferredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect { location, status } => write!(f, "redirect {status} -> {location}"),
            Self::Respond { status, reason, .. } => write!(f, "respond {status} {reason}"),
        }
    }
}
