//! End-to-end tests for the `pennywise` binary

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pennywise(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pennywise").unwrap();
    cmd.env("PENNYWISE_DATA_DIR", data_dir)
        .env_remove("PENNYWISE_LOG");
    cmd
}

fn march_budget(data_dir: &Path) {
    pennywise(data_dir)
        .args(["budget", "create", "1000", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created budget for March 2025"));
}

#[test]
fn test_init_seeds_default_categories() {
    let dir = TempDir::new().unwrap();

    pennywise(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default categories have been created"));

    pennywise(dir.path())
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Utilities"));

    assert!(dir.path().join("config.json").exists());
}

#[test]
fn test_budget_allocate_spend_and_summarize() {
    let dir = TempDir::new().unwrap();
    march_budget(dir.path());

    pennywise(dir.path())
        .args(["allocate", "set", "Groceries=400", "Bills=300", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 created"));

    pennywise(dir.path())
        .args([
            "expense", "add", "25.50", "-c", "groceries", "-d", "Market", "--date", "2025-03-04",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded $25.50 in Groceries (March 2025)"));

    pennywise(dir.path())
        .args(["summary", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$700.00"))
        .stdout(predicate::str::contains("$25.50"))
        .stdout(predicate::str::contains("$300.00"))
        .stdout(predicate::str::contains("Groceries"));

    pennywise(dir.path())
        .args(["expense", "list", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Market"))
        .stdout(predicate::str::contains("1 expense(s), total $25.50"));
}

#[test]
fn test_over_allocation_is_rejected() {
    let dir = TempDir::new().unwrap();
    march_budget(dir.path());

    pennywise(dir.path())
        .args(["allocate", "set", "Groceries=800", "Bills=300", "--month", "2025-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceed monthly budget"));

    pennywise(dir.path())
        .args(["allocate", "list", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries").not());
}

#[test]
fn test_missing_budget_is_reported() {
    let dir = TempDir::new().unwrap();

    pennywise(dir.path())
        .args(["summary", "--month", "2024-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found: 2024-01"));
}

#[test]
fn test_export_then_import_into_fresh_store() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let file = source.path().join("snapshot.json");

    march_budget(source.path());
    pennywise(source.path())
        .args(["goal", "add", "Bike", "400"])
        .assert()
        .success();

    pennywise(source.path())
        .args(["export", "--output"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 budget(s)"));

    pennywise(target.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Budgets:            1"))
        .stdout(predicate::str::contains("Savings goals:      1"));

    pennywise(target.path())
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("March 2025"))
        .stdout(predicate::str::contains("$1000.00"));

    pennywise(target.path())
        .args(["goal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bike"));
}

#[test]
fn test_import_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("broken.json");
    std::fs::write(&file, "{\"version\": 1}").unwrap();

    march_budget(dir.path());

    pennywise(dir.path())
        .arg("import")
        .arg(&file)
        .assert()
        .failure();

    pennywise(dir.path())
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("March 2025"));
}
