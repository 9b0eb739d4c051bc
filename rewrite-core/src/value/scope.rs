use crate::error::BuildError;
use std::fmt;
use std::str::FromStr;

/// Addressable location a value is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    //-------------------------------------------------------------------------
    // As received (read-only)
    //-------------------------------------------------------------------------
    OriginalUrl,
    OriginalPath,
    OriginalQueryString,
    OriginalPathElement,
    OriginalParameter,
    OriginalHeader,
    OriginalServerVariable,

    //-------------------------------------------------------------------------
    // Working copy (read-write)
    //-------------------------------------------------------------------------
    Url,
    Path,
    QueryString,
    PathElement,
    Parameter,
    Header,
    ServerVariable,

    //-------------------------------------------------------------------------
    // Meta
    //-------------------------------------------------------------------------
    Literal,
    MatchGroup,
    ConditionGroup,
    /// Current path without its leading separator.
    MatchPath,
}

impl Scope {
    pub fn is_original(self) -> bool {
        matches!(
            self,
            Self::OriginalUrl
                | Self::OriginalPath
                | Self::OriginalQueryString
                | Self::OriginalPathElement
                | Self::OriginalParameter
                | Self::OriginalHeader
                | Self::OriginalServerVariable
        )
    }

    /// Scopes actions are allowed to mutate.
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            Self::Url
                | Self::Path
                | Self::QueryString
                | Self::PathElement
                | Self::Parameter
                | Self::Header
                | Self::ServerVariable
        )
    }

    /// Scopes addressed by a name rather than a position.
    pub fn is_named(self) -> bool {
        matches!(
            self,
            Self::OriginalParameter
                | Self::OriginalHeader
                | Self::OriginalServerVariable
                | Self::Parameter
                | Self::Header
                | Self::ServerVariable
        )
    }

    pub fn is_path_element(self) -> bool {
        matches!(self, Self::PathElement | Self::OriginalPathElement)
    }

    pub fn is_capture_group(self) -> bool {
        matches!(self, Self::MatchGroup | Self::ConditionGroup)
    }

    /// The whole-path scope an indexed path scope collapses to for index 0.
    pub(crate) fn whole_path(self) -> Self {
        match self {
            Self::OriginalPathElement => Self::OriginalPath,
            Self::PathElement => Self::Path,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OriginalUrl => "originalUrl",
            Self::OriginalPath => "originalPath",
            Self::OriginalQueryString => "originalQueryString",
            Self::OriginalPathElement => "originalPathElement",
            Self::OriginalParameter => "originalParameter",
            Self::OriginalHeader => "originalHeader",
            Self::OriginalServerVariable => "originalServerVariable",
            Self::Url => "url",
            Self::Path => "path",
            Self::QueryString => "queryString",
            Self::PathElement => "pathElement",
            Self::Parameter => "parameter",
            Self::Header => "header",
            Self::ServerVariable => "serverVariable",
            Self::Literal => "literal",
            Self::MatchGroup => "matchGroup",
            Self::ConditionGroup => "conditionGroup",
            Self::MatchPath => "matchPath",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = BuildError;

    /// Accepts camelCase and snake_case spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let scope = match key.as_str() {
            "originalurl" => Self::OriginalUrl,
            "originalpath" => Self::OriginalPath,
            "originalquerystring" => Self::OriginalQueryString,
            "originalpathelement" => Self::OriginalPathElement,
            "originalparameter" => Self::OriginalParameter,
            "originalheader" => Self::OriginalHeader,
            "originalservervariable" => Self::OriginalServerVariable,
            "url" => Self::Url,
            "path" => Self::Path,
            "querystring" => Self::QueryString,
            "pathelement" => Self::PathElement,
            "parameter" => Self::Parameter,
            "header" => Self::Header,
            "servervariable" => Self::ServerVariable,
            "literal" => Self::Literal,
            "matchgroup" => Self::MatchGroup,
            "conditiongroup" => Self::ConditionGroup,
            "matchpath" => Self::MatchPath,
            _ => return Err(BuildError::UnknownScope(s.to_owned())),
        };

        Ok(scope)
    }
}
