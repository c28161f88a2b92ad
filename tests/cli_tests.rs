//! Integration tests for the dispo CLI
//!
//! These tests run the dispo binary and verify exit codes, output
//! formats, and store behavior end to end.

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use tempfile::tempdir;

/// Get a Command for dispo
fn dispo() -> Command {
    cargo_bin_cmd!("dispo")
}

// ============================================================================
// Help and Version tests
// ============================================================================

#[test]
fn test_help_flag() {
    dispo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: dispo"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_version_flag() {
    dispo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dispo"));
}

#[test]
fn test_subcommand_help() {
    dispo()
        .args(["add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add a buyer"))
        .stdout(predicate::str::contains("--fname"))
        .stdout(predicate::str::contains("--score"));
}

#[test]
fn test_no_command_prints_banner() {
    dispo()
        .assert()
        .success()
        .stdout(predicate::str::contains("dispo"))
        .stdout(predicate::str::contains("buyer disposition"));
}

// ============================================================================
// Exit code tests
// ============================================================================

#[test]
fn test_unknown_format_exit_code_2() {
    dispo()
        .args(["--format", "yaml", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_argument_json_usage_error() {
    dispo()
        .args(["--format", "json", "list", "--bogus-flag"]) // parse/usage error
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_duplicate_format_json_usage_error() {
    dispo()
        .args(["--format", "json", "--format", "human", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_unknown_command_exit_code_2() {
    dispo().arg("nonexistent").assert().code(2);
}

#[test]
fn test_unknown_command_json_usage_error() {
    dispo()
        .args(["--format", "json", "nonexistent"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_missing_store_exit_code_3() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("store not found"));
}

#[test]
fn test_missing_store_json_error_envelope() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .args(["--format", "json", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"store_not_found\""))
        .stderr(predicate::str::contains("\"code\":3"));
}

#[test]
fn test_out_of_range_score_exit_code_2() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .args(["list", "--min-score", "150"])
        .assert()
        .code(2);
}

// ============================================================================
// Init command tests
// ============================================================================

#[test]
fn test_init_creates_store() {
    let dir = tempdir().unwrap();

    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized dispo store"));

    // Verify structure was created
    assert!(dir.path().join(".dispo").exists());
    assert!(dir.path().join(".dispo/config.toml").exists());
    assert!(dir.path().join(".dispo/dispo.db").exists());
    assert!(dir.path().join(".dispo/.gitignore").exists());
}

#[test]
fn test_init_idempotent() {
    let dir = tempdir().unwrap();

    // First init
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should also succeed (idempotent)
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
}

#[test]
fn test_init_visible() {
    let dir = tempdir().unwrap();

    dispo()
        .current_dir(dir.path())
        .args(["init", "--visible"])
        .assert()
        .success();

    // Should create visible directory
    assert!(dir.path().join("dispo").exists());
    assert!(!dir.path().join(".dispo").exists());
}

#[test]
fn test_init_json_format() {
    let dir = tempdir().unwrap();

    dispo()
        .current_dir(dir.path())
        .args(["--format", "json", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ok\""))
        .stdout(predicate::str::contains("\"store\""));
}

#[test]
fn test_init_records_format() {
    let dir = tempdir().unwrap();

    dispo()
        .current_dir(dir.path())
        .args(["--format", "records", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("H dispo=1 records=1"))
        .stdout(predicate::str::contains("mode=init"))
        .stdout(predicate::str::contains("status=ok"));
}

#[test]
fn test_init_explicit_store_path() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("team-a");

    dispo()
        .args(["--store", store.to_str().unwrap(), "init"])
        .assert()
        .success();

    assert!(store.join("config.toml").exists());
    assert!(store.join("dispo.db").exists());
}

#[test]
fn test_store_discovery_walks_up() {
    let dir = tempdir().unwrap();

    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let nested = dir.path().join("a/b");
    std::fs::create_dir_all(&nested).unwrap();

    dispo()
        .current_dir(&nested)
        .arg("stats")
        .assert()
        .success();
}

// ============================================================================
// Add command tests
// ============================================================================

#[test]
fn test_add_buyer() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--lname", "Doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added buyer by-"))
        .stdout(predicate::str::contains("(Jane Doe)"));
}

#[test]
fn test_add_requires_a_name() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--email", "jane@example.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("first or last name"));
}

#[test]
fn test_add_rejects_malformed_email() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--email", "not-an-email"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid email"));
}

#[test]
fn test_add_applies_defaults() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--lname", "Doe", "--id", "by-jane"])
        .assert()
        .success();

    // Score defaults to 50, status to lead
    dispo()
        .current_dir(dir.path())
        .args(["show", "by-jane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-jane  Jane Doe"))
        .stdout(predicate::str::contains("lead"))
        .stdout(predicate::str::contains("50"));
}

#[test]
fn test_add_with_explicit_id_twice_fails() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--id", "by-jane"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Other", "--id", "by-jane"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_add_full_intake_round_trips() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args([
            "add",
            "--fname",
            "Jane",
            "--lname",
            "Doe",
            "--id",
            "by-jane",
            "--email",
            "jane@example.com",
            "--phone",
            "555-0100",
            "--company",
            "Doe Holdings",
            "--score",
            "85",
            "--location",
            "Austin",
            "--location",
            "Dallas",
            "--tag",
            "cash buyer",
            "--property-type",
            "Single Family",
            "--budget-min",
            "150000",
            "--budget-max",
            "300000",
            "--vip",
            "true",
            "--status",
            "active",
        ])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["show", "by-jane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jane@example.com"))
        .stdout(predicate::str::contains("555-0100"))
        .stdout(predicate::str::contains("Doe Holdings"))
        .stdout(predicate::str::contains("Austin, Dallas"))
        .stdout(predicate::str::contains("cash buyer"))
        .stdout(predicate::str::contains("150000 - 300000"))
        .stdout(predicate::str::contains("vip=true"))
        .stdout(predicate::str::contains("active"));
}

#[test]
fn test_add_json_format_returns_record() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let output = dispo()
        .current_dir(dir.path())
        .args(["--format", "json", "add", "--fname", "Jane", "--lname", "Doe"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let buyer: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(buyer["id"].as_str().unwrap().starts_with("by-"));
    assert_eq!(buyer["fname"], "Jane");
    assert_eq!(buyer["score"], 50);
    assert_eq!(buyer["status"], "lead");
}

// ============================================================================
// Show command tests
// ============================================================================

#[test]
fn test_show_unknown_buyer_exit_code_3() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["show", "by-missing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("buyer not found: by-missing"));
}

#[test]
fn test_show_records_format() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--lname", "Doe", "--id", "by-jane"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["--format", "records", "show", "by-jane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("H dispo=1 records=1"))
        .stdout(predicate::str::contains("mode=show buyers=1"))
        .stdout(predicate::str::contains("B by-jane lead score=50 \"Jane Doe\" tags=-"));
}

// ============================================================================
// Update command tests
// ============================================================================

#[test]
fn test_update_changes_fields() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--id", "by-jane"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["update", "by-jane", "--score", "90", "--status", "qualified"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated buyer by-jane"));

    dispo()
        .current_dir(dir.path())
        .args(["--format", "records", "show", "by-jane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B by-jane qualified score=90"));
}

#[test]
fn test_update_replaces_tag_list() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--id", "by-jane", "--tag", "old"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["update", "by-jane", "--tag", "hot", "--tag", "cash buyer"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["--format", "records", "show", "by-jane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tags=hot,cash buyer"))
        .stdout(predicate::str::contains("old").not());
}

#[test]
fn test_update_unknown_buyer_exit_code_3() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["update", "by-missing", "--score", "10"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("buyer not found"));
}

// ============================================================================
// List and filter tests
// ============================================================================

fn seed_list_fixture(dir: &tempfile::TempDir) {
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args([
            "add", "--fname", "Alice", "--lname", "Low", "--id", "by-alice", "--score", "30",
            "--tag", "landlord", "--location", "Austin",
        ])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args([
            "add", "--fname", "Bob", "--lname", "Mid", "--id", "by-bob", "--score", "60", "--tag",
            "cash buyer", "--vip", "true", "--can-sms", "false",
        ])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args([
            "add", "--fname", "Carol", "--lname", "High", "--id", "by-carol", "--score", "95",
            "--tag", "cash buyer", "--tag", "hot", "--email", "carol@example.com",
            "--property-type", "Multi Family",
        ])
        .assert()
        .success();
}

#[test]
fn test_list_empty_store() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No buyers found"));
}

#[test]
fn test_list_shows_all_buyers() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("by-alice"))
        .stdout(predicate::str::contains("by-bob"))
        .stdout(predicate::str::contains("by-carol"))
        .stdout(predicate::str::contains("[lead] score=95 Carol High"));
}

#[test]
fn test_list_min_score_filter() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--min-score", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-bob"))
        .stdout(predicate::str::contains("by-carol"))
        .stdout(predicate::str::contains("by-alice").not());
}

#[test]
fn test_list_score_range_filter() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--min-score", "40", "--max-score", "70"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-bob"))
        .stdout(predicate::str::contains("by-alice").not())
        .stdout(predicate::str::contains("by-carol").not());
}

#[test]
fn test_list_tag_filter_requires_all() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--tag", "cash buyer", "--tag", "hot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-carol"))
        .stdout(predicate::str::contains("by-bob").not());
}

#[test]
fn test_list_exclude_tag_filter() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--exclude-tag", "cash buyer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-alice"))
        .stdout(predicate::str::contains("by-bob").not())
        .stdout(predicate::str::contains("by-carol").not());
}

#[test]
fn test_list_location_filter() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--location", "austin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-alice"))
        .stdout(predicate::str::contains("by-bob").not());
}

#[test]
fn test_list_vip_filter() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--vip", "yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-bob"))
        .stdout(predicate::str::contains("by-alice").not());

    dispo()
        .current_dir(dir.path())
        .args(["list", "--vip", "no"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-alice"))
        .stdout(predicate::str::contains("by-bob").not());
}

#[test]
fn test_list_sms_consent_filter() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    // Bob opted out of SMS
    dispo()
        .current_dir(dir.path())
        .args(["list", "--sms", "no"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-bob"))
        .stdout(predicate::str::contains("by-carol").not());
}

#[test]
fn test_list_search_filter() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--search", "carol@example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-carol"))
        .stdout(predicate::str::contains("by-alice").not());
}

#[test]
fn test_list_property_type_filter() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--property-type", "Multi Family"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-carol"))
        .stdout(predicate::str::contains("by-bob").not());
}

#[test]
fn test_list_quick_filter_high_score() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--quick", "high-score"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-carol"))
        .stdout(predicate::str::contains("by-bob").not());
}

#[test]
fn test_list_quick_filter_new_includes_fresh_records() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    // Everything was created moments ago
    dispo()
        .current_dir(dir.path())
        .args(["list", "--quick", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-alice"))
        .stdout(predicate::str::contains("by-carol"));
}

#[test]
fn test_list_created_after_excludes_everything_in_the_future() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--created-after", "2099-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No buyers found"));

    dispo()
        .current_dir(dir.path())
        .args(["list", "--created-after", "2000-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-alice"));
}

#[test]
fn test_list_combined_filters_are_anded() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--tag", "cash buyer", "--min-score", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-carol"))
        .stdout(predicate::str::contains("by-bob").not());
}

#[test]
fn test_list_limit_reports_truncation() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    dispo()
        .current_dir(dir.path())
        .args(["list", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 of 3 shown)"));
}

#[test]
fn test_list_json_format() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    let output = dispo()
        .current_dir(dir.path())
        .args(["--format", "json", "list", "--min-score", "90"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let buyers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let buyers = buyers.as_array().unwrap();
    assert_eq!(buyers.len(), 1);
    assert_eq!(buyers[0]["id"], "by-carol");
    assert_eq!(buyers[0]["score"], 95);
}

#[test]
fn test_list_records_format() {
    let dir = tempdir().unwrap();
    seed_list_fixture(&dir);

    let output = dispo()
        .current_dir(dir.path())
        .args(["--format", "records", "list", "--tag", "hot"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("H dispo=1 records=1 store="));
    assert!(header.contains("mode=list buyers=1"));
    assert!(lines
        .next()
        .unwrap()
        .starts_with("B by-carol lead score=95 \"Carol High\" tags=cash buyer,hot"));
}

#[test]
fn test_list_quiet_suppresses_empty_notice() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let output = dispo()
        .current_dir(dir.path())
        .args(["--quiet", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

// ============================================================================
// Tag registry tests
// ============================================================================

#[test]
fn test_tag_create_and_list() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "create", "cash buyer", "--color", "#EF4444"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created tag cash buyer (tg-"));

    dispo()
        .current_dir(dir.path())
        .args(["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cash buyer (0)"));
}

#[test]
fn test_tag_create_duplicate_exit_code_3() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "create", "hot"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "create", "hot"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("tag already exists"));
}

#[test]
fn test_tag_list_counts_usage() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--tag", "hot"])
        .assert()
        .success();
    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Joe", "--tag", "hot"])
        .assert()
        .success();

    // Intake does not register tags; the list recount still sees them
    // once the registry knows the name
    dispo()
        .current_dir(dir.path())
        .args(["tag", "create", "hot"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hot (2)"));
}

#[test]
fn test_tag_delete() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "create", "stale"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "delete", "stale"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted tag stale"));

    dispo()
        .current_dir(dir.path())
        .args(["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tags found"));
}

#[test]
fn test_tag_delete_protected_refused() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "create", "vip", "--protected"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "delete", "vip"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("tag is protected: vip"));

    dispo()
        .current_dir(dir.path())
        .args(["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vip (0) [protected]"));
}

#[test]
fn test_tag_delete_unknown_exit_code_3() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["tag", "delete", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("tag not found: ghost"));
}

// ============================================================================
// Stats command tests
// ============================================================================

#[test]
fn test_stats_empty_store() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buyers:      0"))
        .stdout(predicate::str::contains("Tags:        0"))
        .stdout(predicate::str::contains("Groups:      0"));
}

#[test]
fn test_stats_counts_records() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane", "--vip", "true", "--status", "active"])
        .assert()
        .success();
    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Joe"])
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buyers:      2"))
        .stdout(predicate::str::contains("lead: 1"))
        .stdout(predicate::str::contains("active: 1"))
        .stdout(predicate::str::contains("vip: 1"));
}

#[test]
fn test_stats_json_format() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["add", "--fname", "Jane"])
        .assert()
        .success();

    let output = dispo()
        .current_dir(dir.path())
        .args(["--format", "json", "stats"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["buyers"], 1);
    assert_eq!(stats["by_status"]["lead"], 1);
    assert_eq!(stats["groups"], 0);
}

#[test]
fn test_stats_records_format() {
    let dir = tempdir().unwrap();
    dispo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    dispo()
        .current_dir(dir.path())
        .args(["--format", "records", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode=stats"))
        .stdout(predicate::str::contains("buyers=0"));
}
