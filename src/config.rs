use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const CONFIG_FILE: &str = "config.yaml";
const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub suffix: String,
    pub application: String,
    pub bundle_id: String,
    pub set_at: DateTime<Utc>,
}

/// Saved associations, keyed by suffix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub associations: BTreeMap<String, Association>,
    #[serde(skip)]
    path: PathBuf,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Association>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl Config {
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE)
    }

    pub async fn load(config_dir: &Path) -> Result<Self> {
        let path = Self::path_in(config_dir);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    version: default_version(),
                    associations: BTreeMap::new(),
                    path,
                });
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.path = path;
        Ok(config)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn add(&mut self, suffix: &str, application: &str, bundle_id: &str) {
        self.associations.insert(
            suffix.to_string(),
            Association {
                suffix: suffix.to_string(),
                application: application.to_string(),
                bundle_id: bundle_id.to_string(),
                set_at: Utc::now(),
            },
        );
    }

    pub fn remove(&mut self, suffix: &str) -> bool {
        self.associations.remove(suffix).is_some()
    }

    pub fn get(&self, suffix: &str) -> Option<&Association> {
        self.associations.get(suffix)
    }

    /// Sorted by suffix.
    pub fn list(&self) -> Vec<&Association> {
        self.associations.values().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }
}
