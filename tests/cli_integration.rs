// Integration tests for CLI commands
// These run the built binary against temporary files, with an explicit
// config so a user's ~/.config/leakcheck never leaks into the results.

use leakcheck::CredentialHash;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn leakcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_leakcheck"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn write_small_key_config(dir: &Path) -> String {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        "[protocol]\nkey_bits = 512\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();
    path.to_string_lossy().into_owned()
}

fn write_inputs(dir: &Path) -> (String, String) {
    let creds = dir.join("creds.txt");
    let db = dir.join("breaches.csv");

    fs::write(&creds, "a:password123\nb:qwerty\nc:securePass!2023\n").unwrap();
    fs::write(
        &db,
        format!(
            "# hash,count\n{},5\n{},12\n{},8\n",
            CredentialHash::of("a", "password123").to_hex(),
            CredentialHash::of("d", "123456").to_hex(),
            CredentialHash::of("b", "qwerty").to_hex(),
        ),
    )
    .unwrap();

    (
        creds.to_string_lossy().into_owned(),
        db.to_string_lossy().into_owned(),
    )
}

#[test]
fn test_cli_help() {
    let output = leakcheck(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Private breach lookup"));
    assert!(stdout.contains("init-config"));
    assert!(stdout.contains("keygen"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("version"));
}

#[test]
fn test_cli_version() {
    let output = leakcheck(&["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("leakcheck"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_requires_credentials() {
    let output = leakcheck(&["check", "--breach-db", "db.csv"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("credentials") || stderr.contains("required"));
}

#[test]
fn test_cli_check_with_ephemeral_key() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_small_key_config(temp_dir.path());
    let (creds, db) = write_inputs(temp_dir.path());

    let output = leakcheck(&[
        "check",
        "--credentials",
        &creds,
        "--breach-db",
        &db,
        "--config",
        &config,
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Leaked credential occurrences: 13"));
}

#[test]
fn test_cli_keygen_then_check() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_small_key_config(temp_dir.path());
    let (creds, db) = write_inputs(temp_dir.path());
    let key = temp_dir.path().join("server.key");
    let key = key.to_string_lossy().into_owned();

    let output = leakcheck(&["keygen", "--output", &key, "--config", &config]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("512-bit"));

    let output = leakcheck(&[
        "check",
        "--credentials",
        &creds,
        "--breach-db",
        &db,
        "--keypair",
        &key,
        "--config",
        &config,
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Leaked credential occurrences: 13"));
}

#[test]
fn test_cli_check_malformed_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_small_key_config(temp_dir.path());
    let (_, db) = write_inputs(temp_dir.path());
    let creds = temp_dir.path().join("bad.txt");
    fs::write(&creds, "no separator here\n").unwrap();

    let output = leakcheck(&[
        "check",
        "--credentials",
        creds.to_str().unwrap(),
        "--breach-db",
        &db,
        "--config",
        &config,
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("Line 1"));
}

#[test]
fn test_cli_init_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("leakcheck.toml");
    let path = path.to_string_lossy().into_owned();

    let output = leakcheck(&["init-config", "--output", &path]);
    assert!(output.status.success());
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[protocol]"));
    assert!(contents.contains("curve = \"sm2p256v1\""));

    // Second run without --force must not clobber
    let output = leakcheck(&["init-config", "--output", &path]);
    assert!(!output.status.success());
}
