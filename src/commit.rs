use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::config::Config;
use crate::error::CommitError;

/// Changes the system default application for a suffix.
#[async_trait]
pub trait AssociationSink: Send + Sync {
    async fn set_default(&self, bundle_id: &str, suffix: &str) -> Result<(), CommitError>;
}

/// `duti -s <bundle id> <suffix> all`
#[derive(Debug, Clone)]
pub struct Duti {
    program: String,
}

impl Default for Duti {
    fn default() -> Self {
        Self {
            program: "duti".to_string(),
        }
    }
}

#[async_trait]
impl AssociationSink for Duti {
    async fn set_default(&self, bundle_id: &str, suffix: &str) -> Result<(), CommitError> {
        info!(bundle_id, suffix, "setting default application");

        let output = Command::new(&self.program)
            .args(["-s", bundle_id, suffix, "all"])
            .output()
            .await
            .map_err(CommitError::Spawn)?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(CommitError::Rejected {
                status: output.status,
                output: combined.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplySummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Re-applies every saved association, continuing past failures.
pub async fn apply_all(config: &Config, sink: &dyn AssociationSink) -> Result<ApplySummary> {
    if config.is_empty() {
        bail!("no associations configured");
    }

    println!(
        "Applying {} file associations...",
        config.associations.len()
    );
    println!();

    let mut summary = ApplySummary::default();

    for assoc in config.list() {
        println!(
            "  {} → {} ({})",
            assoc.suffix, assoc.application, assoc.bundle_id
        );
        match sink.set_default(&assoc.bundle_id, &assoc.suffix).await {
            Ok(()) => {
                println!("    ✓ Applied");
                summary.succeeded += 1;
            }
            Err(e) => {
                println!("    ✗ Error: {}", e);
                summary.failed += 1;
            }
        }
    }

    println!();
    println!("{} succeeded, {} failed", summary.succeeded, summary.failed);

    Ok(summary)
}
