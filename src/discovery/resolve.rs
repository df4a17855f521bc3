use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::QueryError;
use crate::probe::MetadataSource;

pub const BUNDLE_IDENTIFIER_KEY: &str = "kMDItemCFBundleIdentifier";
pub const CONTENT_TYPE_KEY: &str = "kMDItemContentType";

static BUNDLE_IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| attribute_pattern(BUNDLE_IDENTIFIER_KEY));
static CONTENT_TYPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| attribute_pattern(CONTENT_TYPE_KEY));

fn attribute_pattern(key: &str) -> Regex {
    Regex::new(&format!(r#"{}\s+=\s+"(.+)""#, regex::escape(key)))
        .expect("valid attribute pattern")
}

fn extract(pattern: &Regex, report: &str) -> Option<String> {
    pattern
        .captures(report)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_bundle_identifier(report: &str) -> Option<String> {
    extract(&BUNDLE_IDENTIFIER_PATTERN, report)
}

pub fn extract_content_type(report: &str) -> Option<String> {
    extract(&CONTENT_TYPE_PATTERN, report)
}

/// `Ok(None)` means the entry reported no identifier, e.g. a plain file or folder.
pub async fn resolve_identifier(
    source: &dyn MetadataSource,
    path: &Path,
) -> Result<Option<String>, QueryError> {
    let report = source.query(BUNDLE_IDENTIFIER_KEY, path).await?;
    Ok(extract_bundle_identifier(&report))
}

pub async fn resolve_content_type(
    source: &dyn MetadataSource,
    path: &Path,
) -> Result<Option<String>, QueryError> {
    let report = source.query(CONTENT_TYPE_KEY, path).await?;
    Ok(extract_content_type(&report))
}
