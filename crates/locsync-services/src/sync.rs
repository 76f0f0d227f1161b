use crate::batch::{translate_missing, WorkingMap};
use crate::diff::KeyDiff;
use crate::layout::{scan_units, TargetFile, TranslationUnit};
use crate::select::Selection;
use crate::util::read_flat;
use crate::write::write_target;
use locsync_config::SyncConfig;
use locsync_core::{unflatten, FlatEntry, LocSyncError, Result};
use locsync_provider_api::Translator;
use serde::Serialize;
use std::collections::HashSet;

/// Counters for one run, printed by the CLI when it finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub units_found: usize,
    pub units_selected: usize,
    pub units_skipped: usize,
    pub units_failed: usize,
    pub files_written: usize,
    pub files_unchanged: usize,
    pub files_planned: usize,
    pub write_failures: usize,
    pub keys_translated: usize,
    pub keys_deleted: usize,
    pub keys_fallback: usize,
    pub dry_run: bool,
}

/// One reconciliation pass over every selected unit and target language.
///
/// Units, languages and batches run strictly in order, one provider call at
/// a time. Only a missing root or an empty scan fails the run; everything
/// else is logged and counted in the summary.
pub struct SyncEngine<'a> {
    cfg: &'a SyncConfig,
    translator: &'a dyn Translator,
    selection: Selection,
    force: bool,
    dry_run: bool,
}

impl<'a> SyncEngine<'a> {
    pub fn new(cfg: &'a SyncConfig, translator: &'a dyn Translator) -> Self {
        Self {
            cfg,
            translator,
            selection: Selection::new(std::iter::empty::<&str>(), cfg.layout.separator()),
            force: false,
            dry_run: false,
        }
    }

    pub fn with_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection = Selection::new(selectors, self.cfg.layout.separator());
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self) -> Result<SyncSummary> {
        let root = &self.cfg.translate_root;
        tracing::info!(
            event = "sync_start",
            root = %root.display(),
            layout = %self.cfg.layout,
            source = %self.cfg.source_lang,
            targets = ?self.cfg.target_langs,
            provider = self.translator.name(),
            "starting sync in {}",
            root.display()
        );
        if !root.is_dir() {
            return Err(LocSyncError::RootNotFound(root.clone()).into());
        }

        let report = scan_units(
            root,
            self.cfg.layout,
            &self.cfg.source_lang,
            &self.cfg.target_langs,
            !self.dry_run,
        );
        tracing::info!(
            event = "scan_done",
            units = report.units.len(),
            skipped_dirs = report.skipped.len(),
            "found {} source files",
            report.units.len()
        );
        for (dir, count) in &report.files_by_dir {
            tracing::info!(
                event = "scan_dir",
                dir = %dir,
                files = count,
                "  - {}: {} file(s)",
                dir,
                count
            );
        }
        if report.units.is_empty() {
            return Err(LocSyncError::NoUnits(root.clone()).into());
        }

        let mut summary = SyncSummary {
            units_found: report.units.len(),
            dry_run: self.dry_run,
            ..Default::default()
        };

        for unit in &report.units {
            let name = unit.display_name();
            if !self.selection.is_selected(&unit.identifier) {
                tracing::info!(
                    event = "unit_skipped",
                    unit = %name,
                    "skipping {} - not selected",
                    name
                );
                summary.units_skipped += 1;
                continue;
            }
            summary.units_selected += 1;
            if let Err(err) = self.sync_unit(unit, &mut summary) {
                tracing::error!(
                    event = "unit_failed",
                    unit = %name,
                    path = %unit.source_path.display(),
                    error = %err,
                    "failed to process {}",
                    name
                );
                summary.units_failed += 1;
            }
        }

        tracing::info!(
            event = "sync_done",
            written = summary.files_written,
            unchanged = summary.files_unchanged,
            failed = summary.units_failed + summary.write_failures
        );
        Ok(summary)
    }

    fn sync_unit(
        &self,
        unit: &TranslationUnit,
        summary: &mut SyncSummary,
    ) -> std::result::Result<(), LocSyncError> {
        let name = unit.display_name();
        tracing::info!(event = "unit_start", unit = %name, "processing {}", name);
        let source = read_flat(&unit.source_path)?;
        // Conflicting keys leave every target unwritable.
        unflatten(&source)?;
        tracing::info!(
            event = "unit_source",
            unit = %name,
            lang = %self.cfg.source_lang,
            keys = source.len(),
            "{} source: {} keys",
            self.cfg.source_lang,
            source.len()
        );

        for target in &unit.targets {
            self.sync_target(&source, target, summary);
        }
        Ok(())
    }

    fn sync_target(&self, source: &[FlatEntry], target: &TargetFile, summary: &mut SyncSummary) {
        let lang = target.lang.as_str();
        let existing = load_existing(target);
        let diff = KeyDiff::compute(source, existing.as_deref());
        let add = diff.to_translate.len();
        let delete = diff.to_delete.len();

        if existing.is_some() {
            tracing::info!(
                event = "target_diff",
                lang,
                existing = diff.existing_keys,
                add,
                delete,
                "{}: found {} keys, {} new keys to translate, {} keys to remove",
                lang,
                diff.existing_keys,
                add,
                delete
            );
        } else {
            tracing::info!(
                event = "target_new",
                lang,
                add,
                "{}: no existing file, will translate all {} keys",
                lang,
                add
            );
        }

        if diff.is_noop(self.force) {
            tracing::info!(
                event = "target_unchanged",
                lang,
                path = %target.path.display(),
                "no changes needed for {}",
                lang
            );
            summary.files_unchanged += 1;
            return;
        }
        if self.dry_run {
            tracing::info!(
                event = "target_planned",
                lang,
                path = %target.path.display(),
                "dry run: would update {}",
                target.path.display()
            );
            summary.files_planned += 1;
            return;
        }

        let mut map: WorkingMap = existing
            .unwrap_or_default()
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect();
        for key in &diff.to_delete {
            map.remove(key);
        }
        summary.keys_deleted += delete;

        let wanted: HashSet<&str> = diff.to_translate.iter().map(String::as_str).collect();
        let pending: Vec<FlatEntry> = source
            .iter()
            .filter(|e| wanted.contains(e.key.as_str()))
            .cloned()
            .collect();
        let stats = translate_missing(
            self.translator,
            &pending,
            lang,
            self.cfg.max_batch_size,
            &mut map,
        );
        summary.keys_translated += stats.translated;
        summary.keys_fallback += stats.fallbacks;

        match write_target(&target.path, source, &map) {
            Ok(keys) => {
                tracing::info!(
                    event = "target_written",
                    lang,
                    path = %target.path.display(),
                    keys,
                    "written {} ({} keys)",
                    target.path.display(),
                    keys
                );
                summary.files_written += 1;
            }
            Err(err) => {
                tracing::error!(
                    event = "target_write_failed",
                    lang,
                    path = %target.path.display(),
                    error = %err,
                    "failed to write {}",
                    target.path.display()
                );
                summary.write_failures += 1;
            }
        }
    }
}

/// Existing target entries, or `None` when the file is absent or unreadable.
fn load_existing(target: &TargetFile) -> Option<Vec<FlatEntry>> {
    if !target.path.exists() {
        return None;
    }
    match read_flat(&target.path) {
        Ok(entries) => Some(entries),
        Err(err) => {
            tracing::warn!(
                event = "target_unreadable",
                lang = %target.lang,
                path = %target.path.display(),
                error = %err,
                "cannot read {}, translating everything",
                target.path.display()
            );
            None
        }
    }
}
