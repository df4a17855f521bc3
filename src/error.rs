use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// An external query (`mdls`, the Swift helper) could not be run or reported failure.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("failed to write helper script: {0}")]
    Script(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read applications directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("no {key} reported for {}", path.display())]
    MissingAttribute { key: &'static str, path: PathBuf },
    #[error("failed to create scratch file: {0}")]
    Scratch(#[source] std::io::Error),
    #[error("invalid suffix `{0}`")]
    InvalidSuffix(String),
}

#[derive(Debug, Error)]
pub enum CacheWriteError {
    #[error("cache directory unavailable: {0}")]
    Directory(#[source] std::io::Error),
    #[error("failed to encode cache: {0}")]
    Encode(#[from] bincode::Error),
    #[error("failed to write cache: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("failed to run `duti`: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("duti error: {status}, output: {output}")]
    Rejected { status: ExitStatus, output: String },
}
