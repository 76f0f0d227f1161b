//! Reconciliation passes over a tree of JSON localization files.
//! The CLI drives everything through [`SyncEngine`]; the lower modules are
//! public so each step can be used and tested on its own.

pub mod batch;
pub mod diff;
pub mod layout;
pub mod select;
pub mod sync;
pub mod util;
pub mod write;

#[cfg(test)]
mod testing;

pub use locsync_core::{FlatEntry, Layout, LocSyncError, Result};

pub use batch::{translate_missing, BatchStats, WorkingMap};
pub use diff::KeyDiff;
pub use layout::{scan_units, ScanReport, TargetFile, TranslationUnit};
pub use select::Selection;
pub use sync::{SyncEngine, SyncSummary};
