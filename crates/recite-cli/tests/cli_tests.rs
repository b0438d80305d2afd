//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BANK: &str = "\
[Tenses > Past > Regular]
#Add -ed for the past tense.
I walked.|나는 걸었다.
[Tenses > Past > Irregular]
I went.|나는 갔다.
[Questions > Wh]
Where are you?|너 어디야?
";

fn recite() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("recite").unwrap()
}

/// A command isolated from any user config or key in the environment.
fn recite_in(dir: &TempDir) -> Command {
    let mut cmd = recite();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("RECITE_SHEETS_TOKEN")
        .env_remove("RECITE_GEMINI_KEY");
    cmd
}

fn write_bank(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("bank.txt");
    std::fs::write(&path, BANK).unwrap();
    path
}

#[test]
fn validate_valid_bank() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir);

    recite()
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions"))
        .stdout(predicate::str::contains("Quiz bank valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.txt");
    std::fs::write(&path, "[A > B > C]\nhello|안녕\nhello|안녕\na|b|c\nstray line\n").unwrap();

    recite()
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[line 4] WARNING"))
        .stdout(predicate::str::contains("duplicate entry"))
        .stdout(predicate::str::contains("3 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    recite()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn units_lists_the_bank() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir);

    recite()
        .arg("units")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("Irregular"))
        .stdout(predicate::str::contains("Wh"))
        .stdout(predicate::str::contains("3 question(s) in total"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    recite_in(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created recite.toml"))
        .stdout(predicate::str::contains("Created quiz_data.txt"));

    assert!(dir.path().join("recite.toml").exists());
    assert!(dir.path().join("quiz_data.txt").exists());

    recite_in(&dir)
        .arg("validate")
        .arg("--bank")
        .arg("quiz_data.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("Quiz bank valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    recite_in(&dir).arg("init").assert().success();

    recite_in(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn quiz_without_sheets_config_fails() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir);

    recite_in(&dir)
        .arg("quiz")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("[sheets]"));
}

#[test]
fn quiz_without_provider_fails() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir);
    std::fs::write(
        dir.path().join("recite.toml"),
        "[sheets]\nspreadsheet_id = \"sheet-1\"\naccess_token = \"tok\"\n",
    )
    .unwrap();

    recite_in(&dir)
        .arg("quiz")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider 'gemini' not found"));
}

#[test]
fn quiz_with_missing_bank_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("recite.toml"),
        "[grading]\nuse_ai = false\n\n[sheets]\nspreadsheet_id = \"sheet-1\"\naccess_token = \"tok\"\n",
    )
    .unwrap();

    recite_in(&dir)
        .arg("quiz")
        .arg("--bank")
        .arg("missing.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("no questions loaded"));
}

#[test]
fn explicit_missing_config_fails() {
    let dir = TempDir::new().unwrap();

    recite_in(&dir)
        .arg("progress")
        .arg("--config")
        .arg("nope.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn list_models_without_providers() {
    let dir = TempDir::new().unwrap();

    recite_in(&dir)
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers configured"));
}

#[test]
fn list_models_from_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("recite.toml"),
        "[providers.gemini]\ntype = \"gemini\"\napi_key = \"k\"\n",
    )
    .unwrap();

    recite_in(&dir)
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider: gemini (default)"))
        .stdout(predicate::str::contains("gemini-2.5-flash"));
}

#[test]
fn help_output() {
    recite()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Korean to English sentence drill"));
}

#[test]
fn version_output() {
    recite()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("recite"));
}
