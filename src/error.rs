// error.rs
// Crate-wide error type for snapshot loading and analysis

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DustError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {len} bytes is not a whole number of {record_size}-byte particle records")]
    Truncated {
        path: PathBuf,
        len: usize,
        record_size: usize,
    },
    #[error("units file not found: {0}")]
    MissingUnitsFile(PathBuf),
    #[error("invalid units file {path}: {message}")]
    UnitsFile { path: PathBuf, message: String },
    #[error("cannot parse unit '{0}'")]
    UnitParse(String),
    #[error("cannot convert {from} to {to}")]
    UnitMismatch { from: String, to: String },
    #[error("time log {path}, line {line}: {message}")]
    TimeLog {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("particle {0} is not present in the first snapshot")]
    UnknownParticle(i64),
    #[error("particle {id} appears more than once in snapshot {snapshot}")]
    DuplicateParticle { id: i64, snapshot: usize },
    #[error("length mismatch: {0}")]
    Mismatch(String),
    #[error("invalid argument: {0}")]
    Invalid(String),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DustResult<T> = Result<T, DustError>;

impl DustError {
    /// Wrap an I/O error together with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DustError::Io {
            path: path.into(),
            source,
        }
    }
}
