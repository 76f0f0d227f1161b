use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;

mod helpers;
use helpers::*;

#[test]
fn help_works() {
    let tmp = tempfile::tempdir().expect("tempdir");
    bin_cmd(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("SELECTORS"));
}

#[test]
fn missing_api_key_is_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    put(tmp.path().join("th/app.json"), r#"{"a": "x"}"#);
    bin_cmd(tmp.path())
        .env("TRANSLATE_ROOT", tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn dotenv_is_read_from_working_directory_only() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let work = tmp.path().join("work");
    let root = work.join("translations");
    put(root.join("th/app.json"), r#"{"a": "x"}"#);
    put(root.join("en/app.json"), r#"{"a": "A", "old": "gone"}"#);
    put(tmp.path().join(".env"), "ANTHROPIC_API_KEY=from-parent\n");

    bin_cmd(&work)
        .env("TRANSLATE_ROOT", &root)
        .env("SOURCE_LANG", "th")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));

    put(work.join(".env"), "ANTHROPIC_API_KEY=from-cwd\n");
    bin_cmd(&work)
        .env("TRANSLATE_ROOT", &root)
        .env("SOURCE_LANG", "th")
        .assert()
        .success();
    assert_eq!(read_json(&root.join("en/app.json")), json!({"a": "A"}));
}

#[test]
fn missing_root_is_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    sync_cmd(tmp.path(), &tmp.path().join("nowhere"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("translation root not found"));
}

#[test]
fn empty_root_is_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    sync_cmd(tmp.path(), tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no translation units found"));
}

#[test]
fn invalid_batch_size_is_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    put(tmp.path().join("th/app.json"), r#"{"a": "x"}"#);
    sync_cmd(tmp.path(), tmp.path())
        .env("MAX_BATCH_SIZE", "many")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("MAX_BATCH_SIZE"));
}

#[test]
fn deletion_only_run_prunes_without_provider() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("translations");
    put(root.join("th/pages/home.json"), r#"{"title": "หน้าแรก", "cta": {"go": "ไป"}}"#);
    let en = put(
        root.join("en/pages/home.json"),
        r#"{"cta": {"old": "gone", "go": "Go"}, "title": "Home", "legacy": "x"}"#,
    );

    let assert = sync_cmd(tmp.path(), &root)
        .args(["--format", "json"])
        .assert()
        .success();
    let summary = summary_of(&assert.get_output().stdout);
    assert_eq!(summary["files_written"], 1);
    assert_eq!(summary["keys_deleted"], 2);
    assert_eq!(summary["keys_translated"], 0);

    // Source order wins, stale keys are gone.
    assert_eq!(
        read(&en),
        "{\n  \"title\": \"Home\",\n  \"cta\": {\n    \"go\": \"Go\"\n  }\n}"
    );
}

#[test]
fn second_run_changes_nothing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("translations");
    put(root.join("th/app.json"), r#"{"a": "x", "b": {"c": "y"}}"#);
    let en = put(root.join("en/app.json"), r#"{"a": "X", "b": {"c": "Y"}, "z": "old"}"#);

    let first = sync_cmd(tmp.path(), &root)
        .args(["--format", "json"])
        .assert()
        .success();
    assert_eq!(summary_of(&first.get_output().stdout)["files_written"], 1);
    let after_first = read(&en);

    let second = sync_cmd(tmp.path(), &root)
        .args(["--format", "json"])
        .assert()
        .success();
    let summary = summary_of(&second.get_output().stdout);
    assert_eq!(summary["files_written"], 0);
    assert_eq!(summary["files_unchanged"], 1);
    assert_eq!(read(&en), after_first);
}

#[test]
fn force_rewrites_unchanged_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("translations");
    put(root.join("th/app.json"), r#"{"a": "x"}"#);
    let en = put(root.join("en/app.json"), r#"{"a":"X"}"#);

    sync_cmd(tmp.path(), &root).assert().success();
    assert_eq!(read(&en), r#"{"a":"X"}"#);

    sync_cmd(tmp.path(), &root).arg("--force").assert().success();
    assert_eq!(read(&en), "{\n  \"a\": \"X\"\n}");
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("translations");
    put(root.join("th/app.json"), r#"{"a": "x"}"#);
    put(root.join("th/pages/home.json"), r#"{"b": "y"}"#);

    let assert = sync_cmd(tmp.path(), &root)
        .args(["--dry-run", "--format", "json"])
        .assert()
        .success();
    let summary = summary_of(&assert.get_output().stdout);
    assert_eq!(summary["dry_run"], true);
    assert_eq!(summary["files_planned"], 2);
    assert!(!root.join("en/app.json").exists());
    assert!(!root.join("en/pages").exists());
}

#[test]
fn unreachable_provider_falls_back_to_source_text() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("translations");
    put(root.join("th/app.json"), r#"{"greet": {"hello": "สวัสดี", "bye": "บาย"}}"#);

    let assert = sync_cmd(tmp.path(), &root)
        .env("TARGET_LANGS", "en,ja")
        .args(["--format", "json"])
        .assert()
        .success();
    let summary = summary_of(&assert.get_output().stdout);
    assert_eq!(summary["files_written"], 2);
    assert_eq!(summary["keys_fallback"], 4);

    let expected = json!({"greet": {"hello": "สวัสดี", "bye": "บาย"}});
    assert_eq!(read_json(&root.join("en/app.json")), expected);
    assert_eq!(read_json(&root.join("ja/app.json")), expected);
}

#[test]
fn nested_layout_with_selectors() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("translations");
    put(root.join("pages/home/th.json"), r#"{"t": "a"}"#);
    put(root.join("pages/home/en.json"), r#"{"t": "A", "old": "x"}"#);
    put(root.join("pages/about/th.json"), r#"{"t": "b"}"#);
    put(root.join("pages/about/en.json"), r#"{"t": "B", "old": "y"}"#);

    let assert = sync_cmd(tmp.path(), &root)
        .env("FOLDER_STRUCTURE", "nested")
        .args(["nope|home", "--format", "json"])
        .assert()
        .success();
    let summary = summary_of(&assert.get_output().stdout);
    assert_eq!(summary["units_found"], 2);
    assert_eq!(summary["units_skipped"], 1);

    assert_eq!(read_json(&root.join("pages/home/en.json")), json!({"t": "A"}));
    assert_eq!(
        read_json(&root.join("pages/about/en.json")),
        json!({"t": "B", "old": "y"})
    );
}

#[test]
fn cli_flags_override_environment() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("i18n");
    put(root.join("de/app.json"), r#"{"a": "x"}"#);
    put(root.join("fr/app.json"), r#"{"a": "X", "gone": "y"}"#);

    sync_cmd(tmp.path(), &tmp.path().join("elsewhere"))
        .arg("--root")
        .arg(&root)
        .args(["--source-lang", "de", "--target-langs", "fr", "--layout", "language-first"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) written"));
    assert_eq!(read_json(&root.join("fr/app.json")), json!({"a": "X"}));
}

#[test]
fn toml_config_in_working_directory_is_used() {
    let tmp = tempfile::tempdir().expect("tempdir");
    put(
        tmp.path().join("locsync.toml"),
        "translate_root = \"locales\"\nsource_lang = \"th\"\ntarget_langs = [\"en\"]\n",
    );
    put(tmp.path().join("locales/th/app.json"), r#"{"a": "x"}"#);
    put(tmp.path().join("locales/en/app.json"), r#"{"a": "X", "gone": "y"}"#);

    bin_cmd(tmp.path())
        .env("ANTHROPIC_API_KEY", "test-key")
        .assert()
        .success();
    assert_eq!(
        read_json(&tmp.path().join("locales/en/app.json")),
        json!({"a": "X"})
    );
}

#[test]
fn log_dir_receives_debug_log() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("translations");
    let logs = tmp.path().join("logs");
    put(root.join("th/app.json"), r#"{"a": "x"}"#);
    put(root.join("en/app.json"), r#"{"a": "X"}"#);

    sync_cmd(tmp.path(), &root)
        .arg("--log-dir")
        .arg(&logs)
        .assert()
        .success();
    let has_log = std::fs::read_dir(&logs)
        .expect("log dir created")
        .flatten()
        .any(|e| e.file_name().to_string_lossy().starts_with("locsync.log"));
    assert!(has_log);
}
