mod types;

pub use types::{CacheEntry, RecommendationMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::discovery::ApplicationIndex;
use crate::error::CacheWriteError;

const INDEX_FILE: &str = "uti_cache.bin";
const RECOMMENDATIONS_FILE: &str = "recommended_apps_cache.bin";

/// A single bincode file holding one `CacheEntry<T>`.
///
/// Anything that prevents a clean read (missing file, torn or foreign bytes,
/// an expired timestamp) is reported as a miss. There is no file locking:
/// concurrent writers race and the last complete write wins.
#[derive(Debug, Clone)]
pub struct Store<T> {
    path: PathBuf,
    ttl: Duration,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Store<T> {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Option<T> {
        self.load_at(Utc::now()).await
    }

    pub async fn load_at(&self, now: DateTime<Utc>) -> Option<T> {
        let entry = self.read_entry().await?;
        if !entry.is_valid_at(now, self.ttl) {
            debug!(path = %self.path.display(), stored = %entry.timestamp, "cache expired");
            return None;
        }
        Some(entry.data)
    }

    /// Reads the stored envelope without checking its age.
    pub async fn read_entry(&self) -> Option<CacheEntry<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %self.path.display(), "cache unreadable: {}", e);
                return None;
            }
        };

        match bincode::deserialize(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(path = %self.path.display(), "cache undecodable: {}", e);
                None
            }
        }
    }

    pub async fn save(&self, data: &T) -> Result<(), CacheWriteError> {
        self.write_entry(data, Utc::now()).await
    }

    pub async fn write_entry(
        &self,
        data: &T,
        timestamp: DateTime<Utc>,
    ) -> Result<(), CacheWriteError> {
        if let Some(dir) = self.path.parent() {
            ensure_private_dir(dir)
                .await
                .map_err(CacheWriteError::Directory)?;
        }

        let bytes = bincode::serialize(&CacheEntry::new(data, timestamp))?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    pub async fn clear(&self) -> io::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Suffix-keyed recommendation lists sharing one timestamp.
///
/// Saving any suffix rewrites the whole file with a new timestamp, which
/// extends the validity of every suffix already stored.
#[derive(Debug, Clone)]
pub struct RecommendationStore {
    store: Store<RecommendationMap>,
}

impl RecommendationStore {
    pub fn new(store: Store<RecommendationMap>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store<RecommendationMap> {
        &self.store
    }

    pub async fn load(&self, suffix: &str) -> Option<Vec<String>> {
        self.load_at(suffix, Utc::now()).await
    }

    pub async fn load_at(&self, suffix: &str, now: DateTime<Utc>) -> Option<Vec<String>> {
        self.store.load_at(now).await?.remove(suffix)
    }

    pub async fn save(&self, suffix: &str, apps: &[String]) -> Result<(), CacheWriteError> {
        // An expired mapping is dropped rather than revived by the new timestamp.
        let mut map = self.store.load().await.unwrap_or_default();
        map.insert(suffix.to_string(), apps.to_vec());
        self.store.save(&map).await
    }

    pub async fn clear(&self) -> io::Result<()> {
        self.store.clear().await
    }
}

#[derive(Debug, Clone)]
pub struct Caches {
    pub applications: Store<ApplicationIndex>,
    pub recommendations: RecommendationStore,
}

impl Caches {
    pub fn in_dir(dir: &Path, ttl: Duration) -> Self {
        Self {
            applications: Store::new(dir.join(INDEX_FILE), ttl),
            recommendations: RecommendationStore::new(Store::new(
                dir.join(RECOMMENDATIONS_FILE),
                ttl,
            )),
        }
    }
}

async fn ensure_private_dir(dir: &Path) -> io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder.create(dir).await
}
