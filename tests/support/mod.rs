use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::process::Output;
use tempfile::TempDir;

/// Get a Command for dispo
pub fn dispo() -> Command {
    cargo_bin_cmd!("dispo")
}

/// Extract the buyer id from a mutation's human output
/// (`Added buyer by-xxxx (Jane Doe)` -> `by-xxxx`)
pub fn extract_buyer_id(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .find(|token| token.starts_with("by-"))
        .map(|token| token.to_string())
        .expect("Failed to extract buyer id from output")
}

/// Extract the group id from `Created group gr-xxxx (Name)` output
#[allow(dead_code)]
pub fn extract_group_id(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .find(|token| token.starts_with("gr-"))
        .map(|token| token.to_string())
        .expect("Failed to extract group id from output")
}

/// Setup a test store and return the directory only
/// Use when you need full control over command construction
pub fn setup_test_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

/// Add a buyer with just a name and return their id
#[allow(dead_code)]
pub fn add_buyer(dir: &TempDir, fname: &str, lname: &str) -> String {
    let output = dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", fname, "--lname", lname])
        .output()
        .unwrap();
    extract_buyer_id(&output)
}

/// Add a buyer with extra intake flags and return their id
#[allow(dead_code)]
pub fn add_buyer_with(dir: &TempDir, fname: &str, lname: &str, extra: &[&str]) -> String {
    let mut args = vec!["add", "--fname", fname, "--lname", lname];
    args.extend_from_slice(extra);
    let output = dispo().current_dir(dir.path()).args(&args).output().unwrap();
    extract_buyer_id(&output)
}

/// Create a group and return its id
#[allow(dead_code)]
pub fn create_group(dir: &TempDir, name: &str) -> String {
    let output = dispo()
        .current_dir(dir.path())
        .args(["group", "create", name])
        .output()
        .unwrap();
    extract_group_id(&output)
}

/// Run a dispo command and return stdout as String
#[allow(dead_code)]
pub fn run_and_get_stdout(dir: &TempDir, args: &[&str]) -> String {
    let output = dispo().current_dir(dir.path()).args(args).output().unwrap();
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run a dispo command and assert success
#[allow(dead_code)]
pub fn run_assert_success(dir: &TempDir, args: &[&str]) {
    dispo().current_dir(dir.path()).args(args).assert().success();
}
