use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single record line was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("unbalanced parentheses")]
    Unbalanced,

    #[error("field `{field}` is empty")]
    EmptyField { field: &'static str },

    #[error("field `{field}`: `{token}` is not a flow id")]
    InvalidId { field: &'static str, token: String },

    #[error("field `{field}`: `{token}` is not a finite number")]
    InvalidNumber { field: &'static str, token: String },
}

#[derive(Debug, Error)]
pub enum FlowDataError {
    #[error("{origin}:{line}: malformed flow record")]
    Parse {
        origin: String,
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("cannot open {}", .path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed reading {origin}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },
}

impl FlowDataError {
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::MissingFile { .. })
    }
}
