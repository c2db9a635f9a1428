//! Integration tests for podfacts
//!
//! These tests run the whole reconciler against an in-memory cluster, and the
//! binary against unreachable dependencies.


#[path = "../unit/common/mod.rs"]
#[allow(dead_code)]
mod common;

use assert_cmd::cargo;
use predicates::prelude::*;

/// Helper function to create a podfacts command with a clean environment
fn podfacts() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("podfacts"));
    for var in [
        "PODFACTS_CONFIG",
        "PODFACTS_WORKERS",
        "PODFACTS_QUEUE_CAPACITY",
        "PODFACTS_RESYNC_SECS",
        "PODFACTS_ANNOTATION_KEY",
        "PODFACTS_FETCH_TIMEOUT_SECS",
        "PODFACTS_LIVENESS_ADDR",
        "CAT_FACTS_URL",
        "KUBE_CONFIGS",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "info");
    cmd
}

// =============================================================================
// STARTUP FAILURE TESTS
// =============================================================================

/// Unreachable fact endpoint aborts startup before touching the cluster
#[test]
fn test_unreachable_fact_endpoint_fails_startup() {
    podfacts()
        .env("CAT_FACTS_URL", "http://127.0.0.1:9/facts")
        .env("PODFACTS_FETCH_TIMEOUT_SECS", "2")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load facts from http://127.0.0.1:9/facts"));
}

/// Invalid configuration is rejected before any network access
#[test]
fn test_zero_workers_is_rejected() {
    podfacts()
        .env("PODFACTS_WORKERS", "0")
        .env("CAT_FACTS_URL", "http://127.0.0.1:9/facts")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers"))
        .stderr(predicate::str::contains("failed to load facts").not());
}

/// Unparseable numeric settings are rejected
#[test]
fn test_non_numeric_setting_is_rejected() {
    podfacts()
        .env("PODFACTS_RESYNC_SECS", "soon")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("PODFACTS_RESYNC_SECS"));
}

/// A missing config file named explicitly is an error
#[test]
fn test_missing_config_file_is_rejected() {
    let temp = tempfile::TempDir::new().unwrap();
    let missing = temp.path().join("absent.toml");

    podfacts()
        .env("PODFACTS_CONFIG", &missing)
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.toml"));
}
