use anyhow::{Context, Result};
use chrono::Duration;
use std::path::{Path, PathBuf};

pub const DEFAULT_APPLICATIONS_DIR: &str = "/Applications";
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Runtime configuration, resolved once in `main` from CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub applications_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub config_dir: PathBuf,
    pub jobs: usize,
    pub ttl: Duration,
}

impl Settings {
    pub fn resolve(
        applications_dir: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        jobs: Option<usize>,
    ) -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self::with_home(&home, applications_dir, cache_dir, jobs))
    }

    pub fn with_home(
        home: &Path,
        applications_dir: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        jobs: Option<usize>,
    ) -> Self {
        Self {
            applications_dir: applications_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_APPLICATIONS_DIR)),
            cache_dir: cache_dir.unwrap_or_else(|| home.join(".cache").join("dutis")),
            config_dir: home.join(".dutis"),
            jobs: jobs.filter(|&j| j > 0).unwrap_or_else(default_jobs),
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }
}

fn default_jobs() -> usize {
    num_cpus::get().max(1) * 2
}
