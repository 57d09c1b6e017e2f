//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use bibliocat::config::DATABASE_ENV;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary catalog database loaded with the sample data.
fn create_test_db() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let db = temp.path().join("catalog.db");
    let schema = Path::new(env!("CARGO_MANIFEST_DIR")).join("sql/bibliotheque.sql");

    bibliocat()
        .args(["--create", "--database"])
        .arg(&db)
        .arg("import")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("Database imported successfully"));

    (temp, db)
}

fn bibliocat() -> Command {
    let mut cmd = Command::cargo_bin("bibliocat").unwrap();
    cmd.env_remove(DATABASE_ENV).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    bibliocat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("library catalog"));
}

#[test]
fn test_version() {
    bibliocat()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bibliocat"));
}

#[test]
fn test_schema_command_needs_no_database() {
    bibliocat()
        .args(["--database", "/nonexistent/catalog.db", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS Emprunter"));
}

#[test]
fn test_missing_database_is_reported() {
    bibliocat()
        .args(["--database", "/nonexistent/catalog.db", "author", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cannot connect to database"));
}

#[test]
fn test_author_command() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["author", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Author's name: Agatha Christie"));
}

#[test]
fn test_author_command_rejects_non_numeric_id() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["author", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid author ID 'abc'"));
}

#[test]
fn test_database_from_environment() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .env(DATABASE_ENV, &db)
        .args(["before", "1900"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Les Misérables"));
}

#[test]
fn test_json_output() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["--format", "json", "filter", "1", "1", "1934", "1954"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Murder on the Orient Express\""))
        .stdout(predicate::str::contains("Sueurs froides; D'entre les morts"));
}

#[test]
fn test_csv_output() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["-f", "csv", "before", "1951"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,title,year\n"));
}

#[test]
fn test_purge_copies_previews_without_yes() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["purge-copies", "2000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would be removed"));

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["purge-copies", "2000", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 copies, 2 loans)"));

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["purge-copies", "2000", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 copies, 0 loans)"));
}

#[test]
fn test_purge_copies_rejects_two_digit_year() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["purge-copies", "99", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid year format"));
}

#[test]
fn test_purge_author_capture_mode() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["--work-deletion", "capture", "purge-author", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 links, 2 works, 1 copies, 1 loans)"));
}

#[test]
fn test_interactive_menu() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .write_stdin("2\n3\n3\n1900\n9\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected to the database"))
        .stdout(predicate::str::contains("Author's name: Boileau-Narcejac"))
        .stdout(predicate::str::contains("Les Misérables"))
        .stdout(predicate::str::contains("Unrecognized choice '9'."));
}

#[test]
fn test_menu_failures_are_logged_by_default() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .write_stdin("2\nabc\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid author ID 'abc'"))
        .stderr(predicate::str::contains("operation failed"));
}

#[test]
fn test_interactive_delete_cancelled() {
    let (_temp, db) = create_test_db();

    bibliocat()
        .arg("--database")
        .arg(&db)
        .write_stdin("5\n2000\nnope\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deletion cancelled."));

    bibliocat()
        .arg("--database")
        .arg(&db)
        .args(["purge-copies", "2000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 copies bought before 2000-01-01"));
}
