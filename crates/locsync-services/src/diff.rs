use locsync_core::FlatEntry;
use std::collections::HashSet;

/// Key-level difference between a source file and one existing target file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDiff {
    /// Number of keys in the existing target (0 when there is none).
    pub existing_keys: usize,
    /// Source keys missing from the target, in source order.
    pub to_translate: Vec<String>,
    /// Target keys no longer in the source, in target order.
    pub to_delete: Vec<String>,
}

impl KeyDiff {
    /// `existing` is `None` when the target file is missing or unreadable;
    /// every source key is then pending.
    pub fn compute(source: &[FlatEntry], existing: Option<&[FlatEntry]>) -> Self {
        let existing = existing.unwrap_or_default();
        let source_keys: HashSet<&str> = source.iter().map(|e| e.key.as_str()).collect();
        let existing_keys: HashSet<&str> = existing.iter().map(|e| e.key.as_str()).collect();

        Self {
            existing_keys: existing.len(),
            to_translate: source
                .iter()
                .filter(|e| !existing_keys.contains(e.key.as_str()))
                .map(|e| e.key.clone())
                .collect(),
            to_delete: existing
                .iter()
                .filter(|e| !source_keys.contains(e.key.as_str()))
                .map(|e| e.key.clone())
                .collect(),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.to_translate.is_empty() || !self.to_delete.is_empty()
    }

    /// Nothing to add, nothing to prune and no forced rewrite.
    pub fn is_noop(&self, force: bool) -> bool {
        !self.has_changes() && !force
    }
}
