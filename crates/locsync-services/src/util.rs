use locsync_core::{flatten, FlatEntry, LocSyncError};
use std::path::Path;

/// Read a JSON localization file and flatten it.
pub fn read_flat(path: &Path) -> Result<Vec<FlatEntry>, LocSyncError> {
    let text = std::fs::read_to_string(path)?;
    let tree: serde_json::Value = serde_json::from_str(&text)?;
    Ok(flatten(&tree))
}

/// Join the components of a relative path with `sep`, whatever the platform
/// separator is.
pub fn join_components(rel: &Path, sep: char) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(&sep.to_string())
}
