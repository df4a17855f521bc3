use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};
use tracing::warn;

use crate::commit::{AssociationSink, apply_all};
use crate::config::Config;
use crate::discovery::{ApplicationRecord, Discovery, normalize_suffix};
use crate::error::DiscoveryError;
use crate::picker::{self, SELECTED_PREFIX};
use crate::settings::Settings;
use crate::tools::{REQUIRED_TOOLS, find_on_path};

const BANNER_TITLE: &str = " Recommended applications ";

pub fn render_recommendations(labels: &[String]) -> String {
    let header = format!("{0}{1}{0}", "=".repeat(10), BANNER_TITLE);
    let mut out = String::new();
    out.push_str(&header);
    out.push('\n');
    if labels.is_empty() {
        out.push_str("No recommended applications\n");
    }
    for label in labels {
        out.push_str(label);
        out.push('\n');
    }
    out.push_str(&"=".repeat(header.len()));
    out.push('\n');
    out
}

/// Recommendations for display; only an unusable suffix is an error.
pub async fn recommendations_for_display(
    discovery: &Discovery,
    suffix: &str,
) -> Result<Vec<String>> {
    match discovery.recommendations(suffix).await {
        Ok(labels) => Ok(labels),
        Err(e @ DiscoveryError::InvalidSuffix(_)) => Err(e.into()),
        Err(e) => {
            warn!(suffix, "no recommendations: {}", e);
            Ok(Vec::new())
        }
    }
}

pub async fn interactive<R: BufRead, W: Write>(
    discovery: &Discovery,
    settings: &Settings,
    sink: &dyn AssociationSink,
    suffix: Option<String>,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let suffix = match suffix {
        Some(suffix) => suffix,
        None => match picker::prompt_line(input, out, "Please input suffix (e.g., .pdf)")? {
            Some(suffix) => suffix,
            None => return Ok(()),
        },
    };
    let suffix = normalize_suffix(&suffix)?;
    writeln!(out, "{}{}", SELECTED_PREFIX, suffix)?;

    let labels = recommendations_for_display(discovery, &suffix).await?;
    write!(out, "{}", render_recommendations(&labels))?;

    let index = discovery.applications().await?;
    let Some(record) = picker::pick_application(&index, input, out)? else {
        return Ok(());
    };

    commit(settings, sink, &suffix, record, out).await
}

pub async fn set<W: Write>(
    discovery: &Discovery,
    settings: &Settings,
    sink: &dyn AssociationSink,
    suffix: &str,
    application: &str,
    out: &mut W,
) -> Result<()> {
    let suffix = normalize_suffix(suffix)?;
    let index = discovery.applications().await?;

    let record = match picker::matches(&index, application).as_slice() {
        [] => bail!("application {} not found", application),
        [record] => *record,
        candidates => {
            let names: Vec<&str> = candidates.iter().map(|r| r.name.as_str()).collect();
            bail!(
                "application {} is ambiguous: {}",
                application,
                names.join(", ")
            );
        }
    };

    commit(settings, sink, &suffix, record, out).await
}

/// The association is only recorded once the sink has accepted it.
async fn commit<W: Write>(
    settings: &Settings,
    sink: &dyn AssociationSink,
    suffix: &str,
    record: &ApplicationRecord,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "Set default application for {} to {}",
        suffix, record.identifier
    )?;
    sink.set_default(&record.identifier, suffix).await?;

    let mut config = Config::load(&settings.config_dir).await?;
    config.add(suffix, &record.name, &record.identifier);
    config
        .save()
        .await
        .context("Association applied but could not be saved")?;

    writeln!(out, "Saved {} → {}", suffix, record.name)?;
    Ok(())
}

pub async fn recommend(discovery: &Discovery, suffix: &str) -> Result<()> {
    let labels = recommendations_for_display(discovery, suffix).await?;
    print!("{}", render_recommendations(&labels));
    Ok(())
}

pub async fn apps(discovery: &Discovery, json: bool) -> Result<()> {
    let index = discovery.applications().await?;

    if json {
        let records: Vec<&ApplicationRecord> = index.values().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if index.is_empty() {
        println!("No applications found");
        return Ok(());
    }

    let width = index.keys().map(|n| n.len()).max().unwrap_or(0);
    for record in index.values() {
        println!("{:<width$}  {}", record.name, record.identifier, width = width);
    }
    println!();
    println!("{} applications", index.len());
    Ok(())
}

pub async fn list(settings: &Settings, json: bool) -> Result<()> {
    let config = Config::load(&settings.config_dir).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config.list())?);
        return Ok(());
    }

    if config.is_empty() {
        println!("No associations saved");
        return Ok(());
    }

    println!("Saved associations ({}):", config.associations.len());
    for assoc in config.list() {
        println!(
            "  {:<10} {} ({}), set {}",
            assoc.suffix,
            assoc.application,
            assoc.bundle_id,
            assoc.set_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

pub async fn remove(settings: &Settings, suffix: &str) -> Result<()> {
    let suffix = normalize_suffix(suffix)?;
    let mut config = Config::load(&settings.config_dir).await?;

    if !config.remove(&suffix) {
        println!("No association saved for {}", suffix);
        return Ok(());
    }

    config.save().await?;
    println!("Removed {}", suffix);
    Ok(())
}

pub async fn apply(settings: &Settings, sink: &dyn AssociationSink) -> Result<()> {
    let config = Config::load(&settings.config_dir).await?;
    let summary = apply_all(&config, sink).await?;

    if summary.failed > 0 {
        bail!("{} associations failed to apply", summary.failed);
    }
    Ok(())
}

pub async fn refresh(discovery: &Discovery) -> Result<()> {
    let enumeration = discovery.refresh_applications().await?;

    println!(
        "Indexed {} applications ({} entries scanned, {} without identifier)",
        enumeration.index.len(),
        enumeration.scanned,
        enumeration.unidentified.len()
    );

    if !enumeration.failed.is_empty() {
        println!(
            "{} entries could not be queried; index not cached:",
            enumeration.failed.len()
        );
        for failed in &enumeration.failed {
            println!("  {}: {}", failed.path.display(), failed.reason);
        }
    }

    discovery
        .caches()
        .recommendations
        .clear()
        .await
        .context("Failed to clear recommendation cache")?;
    println!("Cleared cached recommendations");
    Ok(())
}

pub fn check() -> Result<()> {
    let mut missing = 0;

    for (program, hint) in REQUIRED_TOOLS {
        match find_on_path(program) {
            Some(path) => println!("✓ {} ({})", program, path.display()),
            None => {
                println!("✗ {} not found on PATH ({})", program, hint);
                missing += 1;
            }
        }
    }

    if missing > 0 {
        bail!("{} required tools missing", missing);
    }
    Ok(())
}
