use crate::registry::CustomOperation;
use crate::value::RewriteMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::fmt;
use std::sync::Arc;

/// Everything except RFC 3986 unreserved characters gets encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Pure string transform applied after a value is resolved.
#[derive(Debug, Clone)]
pub enum Operation {
    LowerCase,
    UpperCase,
    UrlEncode,
    UrlDecode,
    MakeAbsolute,
    Map(Arc<RewriteMap>),
    Custom(Arc<dyn CustomOperation>),
}

impl Operation {
    /// Resolves a built-in operation by name, case-insensitively.
    pub fn builtin(name: &str) -> Option<Self> {
        let operation = match name.to_ascii_lowercase().as_str() {
            "tolower" | "lower" | "lowercase" => Self::LowerCase,
            "toupper" | "upper" | "uppercase" => Self::UpperCase,
            "urlencode" | "encode" => Self::UrlEncode,
            "urldecode" | "decode" => Self::UrlDecode,
            "makeabsolute" | "absolute" => Self::MakeAbsolute,
            _ => return None,
        };

        Some(operation)
    }

    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::LowerCase => input.to_lowercase(),
            Self::UpperCase => input.to_uppercase(),
            Self::UrlEncode => utf8_percent_encode(input, COMPONENT).to_string(),
            Self::UrlDecode => percent_decode_str(&input.replace('+', " "))
                .decode_utf8_lossy()
                .into_owned(),
            Self::MakeAbsolute => make_absolute(input),
            Self::Map(map) => map.lookup(input).to_owned(),
            Self::Custom(custom) => custom.apply(input),
        }
    }
}

/// Roots a relative path and removes dot segments, clamping `..` at the
/// root. Values carrying a scheme are left untouched.
fn make_absolute(input: &str) -> String {
    if input.contains("://") {
        return input.to_owned();
    }

    let mut stack: Vec<&str> = Vec::new();
    for segment in input.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(segment),
        }
    }

    let mut absolute = String::from("/");
    absolute.push_str(&stack.join("/"));

    if input.ends_with('/') && !stack.is_empty() {
        absolute.push('/');
    }

    absolute
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowerCase => f.write_str("toLower"),
            Self::UpperCase => f.write_str("toUpper"),
            Self::UrlEncode => f.write_str("urlEncode"),
            Self::UrlDecode => f.write_str("urlDecode"),
            Self::MakeAbsolute => f.write_str("makeAbsolute"),
            Self::Map(map) => write!(f, "map:{}", map.name()),
            Self::Custom(custom) => f.write_str(custom.name()),
        }
    }
}
