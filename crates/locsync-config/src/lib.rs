use std::path::{Path, PathBuf};

use locsync_core::Layout;
use serde::Deserialize;

pub const DEFAULT_TRANSLATE_ROOT: &str = "src/configs/translations";
pub const DEFAULT_SOURCE_LANG: &str = "th";
pub const DEFAULT_TARGET_LANG: &str = "en";
pub const DEFAULT_MAX_BATCH_SIZE: usize = 20;
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const CONFIG_FILE_NAME: &str = "locsync.toml";

/// Fully resolved settings for one run. Built once at startup and passed by
/// reference to everything that needs it.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api_key: String,
    pub translate_root: PathBuf,
    pub source_lang: String,
    pub target_langs: Vec<String>,
    pub max_batch_size: usize,
    pub layout: Layout,
    pub model: String,
    pub base_url: String,
}

/// One configuration layer (CLI overrides, environment or a `locsync.toml`).
/// Unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    pub api_key: Option<String>,
    pub translate_root: Option<PathBuf>,
    pub source_lang: Option<String>,
    pub target_langs: Option<Vec<String>>,
    pub max_batch_size: Option<usize>,
    pub folder_structure: Option<Layout>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing ANTHROPIC_API_KEY in environment")]
    MissingApiKey,

    #[error("invalid {name} `{value}`: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("TARGET_LANGS must name at least one language")]
    NoTargetLangs,

    #[error("failed to parse {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl RawConfig {
    /// Read the recognized variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a layer from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let max_batch_size = match get("MAX_BATCH_SIZE") {
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|e| {
                ConfigError::Invalid {
                    name: "MAX_BATCH_SIZE",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };
        let folder_structure = match get("FOLDER_STRUCTURE") {
            Some(raw) => Some(parse_layout("FOLDER_STRUCTURE", &raw)?),
            None => None,
        };

        Ok(Self {
            api_key: get("ANTHROPIC_API_KEY"),
            translate_root: get("TRANSLATE_ROOT").map(PathBuf::from),
            source_lang: get("SOURCE_LANG"),
            target_langs: get("TARGET_LANGS").map(|raw| split_langs(&raw)),
            max_batch_size,
            folder_structure,
            model: get("ANTHROPIC_MODEL"),
            base_url: get("ANTHROPIC_BASE_URL"),
        })
    }

    /// Read a `locsync.toml`. A missing file is an empty layer.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let Ok(text) = std::fs::read_to_string(path) else {
            return Ok(Self::default());
        };
        toml::from_str(&text).map_err(|source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill every unset field of `self` from `lower`.
    pub fn or(mut self, lower: RawConfig) -> RawConfig {
        if self.api_key.is_none() {
            self.api_key = lower.api_key;
        }
        if self.translate_root.is_none() {
            self.translate_root = lower.translate_root;
        }
        if self.source_lang.is_none() {
            self.source_lang = lower.source_lang;
        }
        if self.target_langs.is_none() {
            self.target_langs = lower.target_langs;
        }
        if self.max_batch_size.is_none() {
            self.max_batch_size = lower.max_batch_size;
        }
        if self.folder_structure.is_none() {
            self.folder_structure = lower.folder_structure;
        }
        if self.model.is_none() {
            self.model = lower.model;
        }
        if self.base_url.is_none() {
            self.base_url = lower.base_url;
        }
        self
    }

    /// Apply defaults and validate.
    pub fn resolve(self) -> Result<SyncConfig, ConfigError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let max_batch_size = self.max_batch_size.unwrap_or(DEFAULT_MAX_BATCH_SIZE);
        if max_batch_size == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_BATCH_SIZE",
                value: "0".into(),
                reason: "batch size must be at least 1".into(),
            });
        }

        let target_langs: Vec<String> = match self.target_langs {
            Some(langs) => langs
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            None => vec![DEFAULT_TARGET_LANG.to_string()],
        };
        if target_langs.is_empty() {
            return Err(ConfigError::NoTargetLangs);
        }

        Ok(SyncConfig {
            api_key,
            translate_root: self
                .translate_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSLATE_ROOT)),
            source_lang: self
                .source_lang
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_SOURCE_LANG.to_string()),
            target_langs,
            max_batch_size,
            layout: self.folder_structure.unwrap_or_default(),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: self
                .base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

/// Split a comma-separated language list, dropping blanks.
pub fn split_langs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_layout(name: &'static str, raw: &str) -> Result<Layout, ConfigError> {
    raw.parse::<Layout>().map_err(|e| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Load the configuration for a run.
///
/// Precedence: `overrides` (usually CLI flags), process environment, `.env`
/// in the current directory, `./locsync.toml`, then
/// `<config dir>/locsync/locsync.toml`.
pub fn load_config(overrides: RawConfig) -> Result<SyncConfig, ConfigError> {
    let cwd = std::env::current_dir().ok();
    if let Some(cwd) = &cwd {
        // Only the working directory's .env; it never overrides variables
        // that are already set.
        dotenvy::from_path(cwd.join(".env")).ok();
    }

    let mut merged = overrides.or(RawConfig::from_env()?);
    if let Some(cwd) = &cwd {
        merged = merged.or(RawConfig::from_file(&cwd.join(CONFIG_FILE_NAME))?);
    }
    if let Some(base) = dirs::config_dir() {
        merged = merged.or(RawConfig::from_file(
            &base.join("locsync").join(CONFIG_FILE_NAME),
        )?);
    }
    merged.resolve()
}
