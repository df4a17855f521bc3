use std::path::Path;
use tracing::{debug, warn};

use super::normalize::normalize_all;
use super::resolve::{CONTENT_TYPE_KEY, resolve_content_type};
use crate::error::DiscoveryError;
use crate::probe::{HandlerSource, MetadataSource};

/// Asks the system which applications can open files ending in `suffix`.
///
/// A failing handler lookup degrades to an empty list. A failing content
/// type probe is returned to the caller.
pub async fn query_handlers(
    suffix: &str,
    metadata: &dyn MetadataSource,
    handlers: &dyn HandlerSource,
    scratch_dir: &Path,
) -> Result<Vec<String>, DiscoveryError> {
    // The scratch file only needs the right name; it is removed on drop.
    let probe = tempfile::Builder::new()
        .prefix("dutis-content.")
        .suffix(suffix)
        .tempfile_in(scratch_dir)
        .map_err(DiscoveryError::Scratch)?;

    let content_type = resolve_content_type(metadata, probe.path())
        .await?
        .ok_or_else(|| DiscoveryError::MissingAttribute {
            key: CONTENT_TYPE_KEY,
            path: probe.path().to_path_buf(),
        })?;
    debug!(suffix, content_type = %content_type, "resolved content type");

    let raw_paths = match handlers.handler_paths(&content_type).await {
        Ok(paths) => paths,
        Err(e) => {
            warn!(suffix, "handler lookup unavailable: {}", e);
            Vec::new()
        }
    };

    Ok(normalize_all(&raw_paths))
}
