use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a configuration block came from, for error messages.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub(crate) file: PathBuf,
    pub(crate) section: String,
    pub(crate) index: Option<usize>,
}

impl Origin {
    pub fn new(file: &Path, section: &str, index: Option<usize>) -> Self {
        Self {
            file: file.to_path_buf(),
            section: section.to_owned(),
            index,
        }
    }

    /// A block nested inside this one, e.g. `rules[2].actions[0]`.
    pub fn nested(&self, section: &str, index: Option<usize>) -> Self {
        Self {
            file: self.file.clone(),
            section: format!("{}.{section}", self.path()),
            index,
        }
    }

    fn path(&self) -> String {
        match self.index {
            Some(i) => format!("{}[{i}]", self.section),
            None => self.section.clone(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} block", self.file.display(), self.path())
    }
}
