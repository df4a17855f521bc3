use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::resolve::resolve_identifier;
use super::{ApplicationIndex, ApplicationRecord};
use crate::error::{DiscoveryError, QueryError};
use crate::probe::MetadataSource;

#[derive(Debug, Default)]
pub struct Enumeration {
    pub index: ApplicationIndex,
    pub scanned: usize,
    pub unidentified: Vec<PathBuf>,
    pub failed: Vec<FailedEntry>,
}

#[derive(Debug)]
pub struct FailedEntry {
    pub path: PathBuf,
    pub reason: String,
}

struct Resolved {
    name: String,
    path: PathBuf,
    outcome: Result<Option<String>, QueryError>,
}

/// Resolves a bundle identifier for every entry directly under `dir`.
///
/// One task is spawned per entry; at most `jobs` metadata queries run at a
/// time. A failed query only drops its own entry.
pub async fn enumerate(
    dir: &Path,
    source: Arc<dyn MetadataSource>,
    jobs: usize,
    show_progress: bool,
) -> Result<Enumeration, DiscoveryError> {
    let entries = list_entries(dir).await?;

    let pb = if show_progress {
        let pb = ProgressBar::new(entries.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .expect("valid template")
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut join_set = JoinSet::new();

    for (name, path) in entries {
        let semaphore = Arc::clone(&semaphore);
        let source = Arc::clone(&source);
        let pb = pb.clone();

        join_set.spawn(async move {
            let _permit = semaphore.acquire().await;
            let outcome = resolve_identifier(source.as_ref(), &path).await;
            pb.inc(1);
            Resolved {
                name,
                path,
                outcome,
            }
        });
    }

    let mut result = Enumeration::default();

    while let Some(joined) = join_set.join_next().await {
        let resolved = match joined {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("identifier task aborted: {}", e);
                continue;
            }
        };
        result.scanned += 1;

        match resolved.outcome {
            Ok(Some(identifier)) => {
                result.index.insert(
                    resolved.name.clone(),
                    ApplicationRecord {
                        name: resolved.name,
                        path: resolved.path,
                        identifier,
                    },
                );
            }
            Ok(None) => {
                debug!(path = %resolved.path.display(), "no bundle identifier");
                result.unidentified.push(resolved.path);
            }
            Err(e) => {
                warn!(path = %resolved.path.display(), "skipping entry: {}", e);
                result.failed.push(FailedEntry {
                    path: resolved.path,
                    reason: e.to_string(),
                });
            }
        }
    }

    pb.finish_and_clear();

    result.unidentified.sort();
    result.failed.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(result)
}

async fn list_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
    let read_dir_error = |source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(read_dir_error)?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await.map_err(read_dir_error)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((name, entry.path()));
    }

    Ok(entries)
}
