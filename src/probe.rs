//! Seams to the operating system's discovery tooling.
//!
//! The discovery code only talks to [`MetadataSource`] and [`HandlerSource`];
//! the process-backed implementations here shell out to `mdls` and to a
//! generated Swift script calling LaunchServices.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::error::QueryError;

const HANDLER_SCRIPT: &str = include_str!("probe/handlers.swift");

/// Reports Spotlight metadata attributes for a path.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Returns the raw report, containing `key = "value"` pairs.
    async fn query(&self, key: &str, path: &Path) -> Result<String, QueryError>;
}

/// Lists every application registered for a content type.
#[async_trait]
pub trait HandlerSource: Send + Sync {
    /// Absolute paths or file URLs, one per application install.
    async fn handler_paths(&self, content_type: &str) -> Result<Vec<String>, QueryError>;
}

#[derive(Debug, Clone)]
pub struct Mdls {
    program: String,
}

impl Default for Mdls {
    fn default() -> Self {
        Self {
            program: "mdls".to_string(),
        }
    }
}

#[async_trait]
impl MetadataSource for Mdls {
    async fn query(&self, key: &str, path: &Path) -> Result<String, QueryError> {
        run(
            &self.program,
            [OsStr::new("-name"), OsStr::new(key), path.as_os_str()],
        )
        .await
    }
}

/// Runs the LaunchServices lookup through `swift <script> <content-type>`.
#[derive(Debug, Clone)]
pub struct SwiftHelper {
    program: String,
    scratch_dir: PathBuf,
}

impl Default for SwiftHelper {
    fn default() -> Self {
        Self {
            program: "swift".to_string(),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

impl SwiftHelper {
    fn write_script(&self) -> Result<tempfile::NamedTempFile, QueryError> {
        let mut script = tempfile::Builder::new()
            .prefix("dutis-script.")
            .suffix(".swift")
            .tempfile_in(&self.scratch_dir)
            .map_err(QueryError::Script)?;
        script
            .write_all(HANDLER_SCRIPT.as_bytes())
            .map_err(QueryError::Script)?;
        script.flush().map_err(QueryError::Script)?;
        Ok(script)
    }
}

#[async_trait]
impl HandlerSource for SwiftHelper {
    async fn handler_paths(&self, content_type: &str) -> Result<Vec<String>, QueryError> {
        // Removed when dropped, on every return path.
        let script = self.write_script()?;

        let stdout = run(
            &self.program,
            [script.path().as_os_str(), OsStr::new(content_type)],
        )
        .await?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

async fn run<'a>(
    program: &str,
    args: impl IntoIterator<Item = &'a OsStr>,
) -> Result<String, QueryError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| QueryError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(program, status = %output.status, "external query failed");
        return Err(QueryError::Failed {
            program: program.to_string(),
            status: output.status,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
