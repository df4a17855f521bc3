mod enumerate;
mod handlers;
mod normalize;
mod resolve;

pub use enumerate::{Enumeration, FailedEntry, enumerate};
pub use handlers::query_handlers;
pub use normalize::{normalize, normalize_all};
pub use resolve::{
    BUNDLE_IDENTIFIER_KEY, CONTENT_TYPE_KEY, extract_bundle_identifier, extract_content_type,
    resolve_content_type, resolve_identifier,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::Caches;
use crate::error::DiscoveryError;
use crate::probe::{HandlerSource, Mdls, MetadataSource, SwiftHelper};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub name: String,
    pub path: PathBuf,
    pub identifier: String,
}

/// Display name to record, ordered by name.
pub type ApplicationIndex = BTreeMap<String, ApplicationRecord>;

/// Accepts `pdf`, `.pdf` or ` .pdf ` and returns `.pdf`.
pub fn normalize_suffix(input: &str) -> Result<String, DiscoveryError> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if bare.is_empty() || bare.contains('/') || bare.chars().any(char::is_whitespace) {
        return Err(DiscoveryError::InvalidSuffix(input.to_string()));
    }
    Ok(format!(".{}", bare))
}

/// Cached access to the installed applications and per-suffix handlers.
///
/// Built once in `main` and handed to every command.
pub struct Discovery {
    metadata: Arc<dyn MetadataSource>,
    handlers: Arc<dyn HandlerSource>,
    caches: Caches,
    applications_dir: PathBuf,
    scratch_dir: PathBuf,
    jobs: usize,
    show_progress: bool,
}

impl Discovery {
    pub fn new(
        settings: &Settings,
        metadata: Arc<dyn MetadataSource>,
        handlers: Arc<dyn HandlerSource>,
    ) -> Self {
        Self {
            metadata,
            handlers,
            caches: Caches::in_dir(&settings.cache_dir, settings.ttl),
            applications_dir: settings.applications_dir.clone(),
            scratch_dir: std::env::temp_dir(),
            jobs: settings.jobs,
            show_progress: false,
        }
    }

    pub fn system(settings: &Settings) -> Self {
        Self::new(
            settings,
            Arc::new(Mdls::default()),
            Arc::new(SwiftHelper::default()),
        )
        .with_progress(true)
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    pub async fn applications(&self) -> Result<ApplicationIndex, DiscoveryError> {
        if let Some(index) = self.caches.applications.load().await {
            debug!(count = index.len(), "application index from cache");
            return Ok(index);
        }

        Ok(self.refresh_applications().await?.index)
    }

    /// Enumerates the applications directory, bypassing the cache.
    ///
    /// The result is only cached when every entry could be queried, so a
    /// missing `mdls` does not pin an empty index for a day.
    pub async fn refresh_applications(&self) -> Result<Enumeration, DiscoveryError> {
        let enumeration = enumerate(
            &self.applications_dir,
            Arc::clone(&self.metadata),
            self.jobs,
            self.show_progress,
        )
        .await?;

        info!(
            scanned = enumeration.scanned,
            indexed = enumeration.index.len(),
            failed = enumeration.failed.len(),
            "enumerated applications"
        );

        if enumeration.failed.is_empty() {
            if let Err(e) = self.caches.applications.save(&enumeration.index).await {
                warn!("failed to cache application index: {}", e);
            }
        }

        Ok(enumeration)
    }

    pub async fn recommendations(&self, suffix: &str) -> Result<Vec<String>, DiscoveryError> {
        let suffix = normalize_suffix(suffix)?;

        if let Some(apps) = self.caches.recommendations.load(&suffix).await {
            debug!(suffix = %suffix, count = apps.len(), "recommendations from cache");
            return Ok(apps);
        }

        let apps = query_handlers(
            &suffix,
            self.metadata.as_ref(),
            self.handlers.as_ref(),
            &self.scratch_dir,
        )
        .await?;

        if let Err(e) = self.caches.recommendations.save(&suffix, &apps).await {
            warn!(suffix = %suffix, "failed to cache recommendations: {}", e);
        }

        Ok(apps)
    }
}
