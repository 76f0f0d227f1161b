use crate::util::join_components;
use locsync_core::Layout;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Label used for units and folders that sit directly at a scan root.
pub const ROOT_LABEL: &str = "(root)";

/// One source file and the files it is synced into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Path relative to the scan root, `/`-joined without `.json` for the
    /// language-first layout, `_`-joined folder path for the nested one.
    pub identifier: String,
    pub source_path: PathBuf,
    pub targets: Vec<TargetFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    pub lang: String,
    pub path: PathBuf,
}

impl TranslationUnit {
    pub fn display_name(&self) -> &str {
        if self.identifier.is_empty() {
            ROOT_LABEL
        } else {
            &self.identifier
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Units in discovery order.
    pub units: Vec<TranslationUnit>,
    /// Number of source files per folder (relative, `/`-joined), in
    /// discovery order.
    pub files_by_dir: Vec<(String, usize)>,
    /// Subtrees that could not be read and were left out.
    pub skipped: Vec<PathBuf>,
}

impl ScanReport {
    /// The walk yields a folder's files back to back, so only the last
    /// counter can belong to `dir`.
    fn count_dir(&mut self, dir: String) {
        match self.files_by_dir.last_mut() {
            Some((last, n)) if *last == dir => *n += 1,
            _ => self.files_by_dir.push((dir, 1)),
        }
    }
}

/// Discover translation units under `root`.
///
/// With `create_dirs`, the language-first layout also creates the target
/// folders mirroring the source tree. Unreadable directories are logged and
/// skipped; they never fail the scan.
pub fn scan_units(
    root: &Path,
    layout: Layout,
    source_lang: &str,
    target_langs: &[String],
    create_dirs: bool,
) -> ScanReport {
    match layout {
        Layout::Nested => scan_nested(root, source_lang, target_langs),
        Layout::LanguageFirst => {
            scan_language_first(root, source_lang, target_langs, create_dirs)
        }
    }
}

/// Files before subdirectories, then by name, so every folder's own files
/// are reported before anything nested below it.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Walk `root`, handing every readable file to `on_file`.
fn walk_files(
    root: &Path,
    report: &mut ScanReport,
    mut on_file: impl FnMut(&mut ScanReport, DirEntry),
) {
    for entry in WalkDir::new(root).sort_by(files_first) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => on_file(report, entry),
            Ok(_) => {}
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                tracing::warn!(
                    event = "scan_dir_unreadable",
                    path = %path.display(),
                    error = %err,
                    "skipping unreadable directory"
                );
                report.skipped.push(path);
            }
        }
    }
}

fn scan_nested(root: &Path, source_lang: &str, target_langs: &[String]) -> ScanReport {
    let source_name = format!("{source_lang}.json");
    let mut report = ScanReport::default();

    walk_files(root, &mut report, |report, entry| {
        if entry.file_name().to_str() != Some(source_name.as_str()) {
            return;
        }
        let Some(folder) = entry.path().parent() else {
            return;
        };
        let rel = folder.strip_prefix(root).unwrap_or(folder);
        let identifier = join_components(rel, Layout::Nested.separator());
        let targets = target_langs
            .iter()
            .map(|lang| TargetFile {
                lang: lang.clone(),
                path: folder.join(format!("{lang}.json")),
            })
            .collect();

        report.count_dir(dir_label(rel));
        report.units.push(TranslationUnit {
            identifier,
            source_path: entry.path().to_path_buf(),
            targets,
        });
    });

    report
}

fn scan_language_first(
    root: &Path,
    source_lang: &str,
    target_langs: &[String],
    create_dirs: bool,
) -> ScanReport {
    let source_root = root.join(source_lang);
    let mut report = ScanReport::default();
    if !source_root.is_dir() {
        tracing::error!(
            event = "source_dir_missing",
            path = %source_root.display(),
            "source language directory not found"
        );
        return report;
    }

    walk_files(&source_root, &mut report, |report, entry| {
        let is_json = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext == "json");
        if !is_json {
            return;
        }
        let Ok(rel) = entry.path().strip_prefix(&source_root) else {
            return;
        };
        let rel_dir = rel.parent().unwrap_or(Path::new(""));
        let joined = join_components(rel, Layout::LanguageFirst.separator());
        let identifier = joined.strip_suffix(".json").unwrap_or(&joined).to_string();

        let mut targets = Vec::with_capacity(target_langs.len());
        for lang in target_langs {
            if create_dirs {
                let target_dir = root.join(lang).join(rel_dir);
                if let Err(err) = std::fs::create_dir_all(&target_dir) {
                    tracing::warn!(
                        event = "target_dir_create_failed",
                        path = %target_dir.display(),
                        error = %err
                    );
                }
            }
            targets.push(TargetFile {
                lang: lang.clone(),
                path: root.join(lang).join(rel),
            });
        }

        report.count_dir(dir_label(rel_dir));
        report.units.push(TranslationUnit {
            identifier,
            source_path: entry.path().to_path_buf(),
            targets,
        });
    });

    report
}

fn dir_label(rel_dir: &Path) -> String {
    let label = join_components(rel_dir, '/');
    if label.is_empty() {
        ROOT_LABEL.to_string()
    } else {
        label
    }
}
