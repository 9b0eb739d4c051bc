use crate::ctx::RequestState;
use crate::env::{EvalEnv, FileKind};
use crate::rule::RuleResult;
use crate::value::Value;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    Any,
}

/// Checks that a resolved path exists under the document root.
#[derive(Debug, Clone)]
pub struct StaticPathMatch {
    pub value: Value,
    pub kind: PathKind,
    pub inverted: bool,
}

impl StaticPathMatch {
    pub fn new(value: Value, kind: PathKind) -> Self {
        Self {
            value,
            kind,
            inverted: false,
        }
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Probe errors count as "does not exist".
    pub fn test(&self, state: &RequestState, result: &RuleResult<'_>, env: &EvalEnv) -> bool {
        let text = self.value.get_string(state, result);
        let path = resolve(&env.document_root, &text);

        let exists = match env.files.kind(&path) {
            Ok(found) => match self.kind {
                PathKind::File => found == FileKind::File,
                PathKind::Directory => found == FileKind::Directory,
                PathKind::Any => true,
            },
            Err(error) => {
                tracing::trace!(path = %path.display(), %error, "static path probe failed");
                false
            }
        };

        exists != self.inverted
    }
}

/// Roots a URL path at the document root. Paths already below the root
/// are used as they are.
fn resolve(document_root: &Path, text: &str) -> PathBuf {
    let candidate = Path::new(text);
    if candidate.is_absolute() && candidate.starts_with(document_root) {
        return candidate.to_path_buf();
    }

    document_root.join(text.trim_start_matches('/'))
}

impl fmt::Display for StaticPathMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("not ")?;
        }
        let kind = match self.kind {
            PathKind::File => "isFile",
            PathKind::Directory => "isDirectory",
            PathKind::Any => "exists",
        };
        write!(f, "{kind}({})", self.value)
    }
}
