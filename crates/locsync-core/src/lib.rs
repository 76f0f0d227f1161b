use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod tree;

pub use tree::{flatten, unflatten};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// One leaf of a flattened localization tree: the `.`-joined path from the
/// root object down to the leaf, and the leaf coerced to a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub key: String,
    pub value: String,
}

impl FlatEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for FlatEntry {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// How source and target files are laid out under the translation root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// `root/<lang>/**/*.json`: one parallel subtree per language.
    #[default]
    LanguageFirst,
    /// `**/<lang>.json`: every language file sits next to the source file.
    Nested,
}

impl Layout {
    /// Separator used to join path segments into a unit identifier.
    pub fn separator(self) -> char {
        match self {
            Layout::LanguageFirst => '/',
            Layout::Nested => '_',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::LanguageFirst => "language-first",
            Layout::Nested => "nested",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = LocSyncError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "language-first" => Ok(Layout::LanguageFirst),
            "nested" => Ok(Layout::Nested),
            other => Err(LocSyncError::Other(format!(
                "unknown folder structure `{other}` (expected `language-first` or `nested`)"
            ))),
        }
    }
}

#[derive(Debug, Error)]
pub enum LocSyncError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Two dotted keys where one is a strict prefix of the other
    /// (`a` and `a.b`); such a set cannot be turned back into a tree.
    #[error("key `{key}` conflicts with `{other}`: a value cannot also be an object")]
    KeyConflict { key: String, other: String },

    #[error("translation root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("no translation units found under {}", .0.display())]
    NoUnits(PathBuf),

    #[error("{0}")]
    Other(String),
}
