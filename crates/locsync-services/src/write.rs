use crate::batch::WorkingMap;
use locsync_core::{unflatten, FlatEntry, LocSyncError};
use std::path::Path;

/// Order the working map by the source: every source key that has a value
/// is emitted at its source position; keys unknown to the source are dropped.
pub fn assemble(source: &[FlatEntry], map: &WorkingMap) -> Vec<FlatEntry> {
    source
        .iter()
        .filter_map(|e| map.get(&e.key).map(|v| FlatEntry::new(e.key.clone(), v.clone())))
        .collect()
}

/// Rebuild the nested document and pretty-print it with 2-space indent.
pub fn render(entries: &[FlatEntry]) -> Result<String, LocSyncError> {
    let tree = unflatten(entries)?;
    Ok(serde_json::to_string_pretty(&tree)?)
}

/// Write the reconciled target file, creating parent folders as needed.
/// Returns the number of keys written.
pub fn write_target(
    path: &Path,
    source: &[FlatEntry],
    map: &WorkingMap,
) -> Result<usize, LocSyncError> {
    let entries = assemble(source, map);
    let text = render(&entries)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    Ok(entries.len())
}
