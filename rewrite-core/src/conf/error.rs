use crate::conf::Origin;
use crate::conf::macros::MacroError;
use crate::error::BuildError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rules file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("rules file {path} has no 'rules' attribute")]
    MissingRules { path: PathBuf },

    //-------------------------------------------------------------------------
    // Rewrite maps
    //-------------------------------------------------------------------------
    #[error("{origin}: rewrite map has no name")]
    UnnamedMap { origin: Origin },

    #[error("{origin}: rewrite map name '{name}' must not contain ':'")]
    InvalidMapName { origin: Origin, name: String },

    #[error("{origin}: duplicate rewrite map '{name}'")]
    DuplicateMap { origin: Origin, name: String },

    //-------------------------------------------------------------------------
    // Rules
    //-------------------------------------------------------------------------
    #[error("{origin}: {source}")]
    Build {
        origin: Origin,
        #[source]
        source: BuildError,
    },

    #[error("{origin}: unknown action type '{kind}'")]
    UnknownActionType { origin: Origin, kind: String },

    #[error("{origin}: unknown match type '{kind}'")]
    UnknownMatchType { origin: Origin, kind: String },

    #[error("{origin}: missing required field '{field}'")]
    MissingField { origin: Origin, field: &'static str },

    #[error("{origin}: invalid status code {code}")]
    InvalidStatus { origin: Origin, code: u16 },

    #[error("{origin}: custom {kind} '{name}' failed to build: {source}")]
    Custom {
        origin: Origin,
        kind: &'static str,
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{origin}: invalid macro in '{text}': {source}")]
    Macro {
        origin: Origin,
        text: String,
        #[source]
        source: MacroError,
    },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn build(origin: &Origin, source: BuildError) -> Self {
        Self::Build {
            origin: origin.clone(),
            source,
        }
    }

    pub fn macro_error(origin: &Origin, text: &str, source: MacroError) -> Self {
        Self::Macro {
            origin: origin.clone(),
            text: text.to_owned(),
            source,
        }
    }
}
