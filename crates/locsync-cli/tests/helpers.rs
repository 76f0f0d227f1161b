#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Nothing listens here, so any provider call fails fast.
pub const DEAD_PROVIDER: &str = "http://127.0.0.1:9";

/// A `locsync` command isolated from the caller's environment and config
/// files: empty env, working directory inside the temp dir.
pub fn bin_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("locsync").expect("locsync built");
    cmd.env_clear()
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env("XDG_CONFIG_HOME", cwd)
        .env("ANTHROPIC_BASE_URL", DEAD_PROVIDER);
    cmd
}

/// Like [`bin_cmd`] with an API key and the given translation root.
pub fn sync_cmd(cwd: &Path, root: &Path) -> Command {
    let mut cmd = bin_cmd(cwd);
    cmd.env("ANTHROPIC_API_KEY", "test-key")
        .env("TRANSLATE_ROOT", root)
        .env("SOURCE_LANG", "th");
    cmd
}

pub fn put(path: PathBuf, body: &str) -> PathBuf {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, body).expect("write fixture");
    path
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&read(path)).expect("valid json")
}

/// The `--format json` summary is the last non-empty stdout line.
pub fn summary_of(stdout: &[u8]) -> serde_json::Value {
    let out = String::from_utf8_lossy(stdout);
    let line = out
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .expect("summary line");
    serde_json::from_str(line).expect("summary json")
}
