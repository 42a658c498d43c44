use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Run romsign with a clean configuration environment.
fn romsign() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("romsign");
    cmd.env_remove("ROMSIGN_CONFIG");
    cmd
}

// ─── Argument validation ────────────────────────────────────────

#[test]
fn help_lists_key_options() {
    romsign()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--platform"))
        .stdout(predicate::str::contains("--shared"))
        .stdout(predicate::str::contains("--media"))
        .stdout(predicate::str::contains("--release"))
        .stdout(predicate::str::contains("--dir"));
}

#[test]
fn missing_dir_fails() {
    romsign()
        .args(["-p", "platform"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dir"));
}

#[test]
fn missing_keys_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    romsign()
        .current_dir(dir.path())
        .args(["-d", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn nonexistent_rom_dir_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    romsign()
        .current_dir(dir.path())
        .args(["-d", "no-such-rom", "-p", "platform"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn empty_key_name_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("rom").create_dir_all().unwrap();

    romsign()
        .current_dir(dir.path())
        .args(["-d", "rom", "-s", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid shared key name"));
}

// ─── Configuration ──────────────────────────────────────────────

#[test]
fn malformed_config_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("rom").create_dir_all().unwrap();
    dir.child("romsign.toml")
        .write_str("[align]\nboundary = 3\n")
        .unwrap();

    romsign()
        .current_dir(dir.path())
        .args(["-d", "rom", "-p", "platform"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("power of two"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("rom").create_dir_all().unwrap();

    romsign()
        .current_dir(dir.path())
        .args(["-d", "rom", "-p", "platform", "--config", "elsewhere.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("elsewhere.toml not found"));
}

#[test]
fn config_path_from_environment() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("rom").create_dir_all().unwrap();

    romsign()
        .current_dir(dir.path())
        .env("ROMSIGN_CONFIG", "from-env.toml")
        .args(["-d", "rom", "-p", "platform"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("from-env.toml not found"));
}

// ─── Preflight ──────────────────────────────────────────────────

#[test]
fn missing_java_is_reported_before_scanning() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("rom/system/app/Settings.apk")
        .write_str("AA:BB")
        .unwrap();
    dir.child("romsign.toml")
        .write_str("[tools]\njava = \"/nonexistent/romsign/java\"\n")
        .unwrap();

    romsign()
        .current_dir(dir.path())
        .args(["-d", "rom", "-p", "platform"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("java is not available"))
        .stdout(predicate::str::contains("Checking old signatures").not());
}
