//! CLI integration tests for stockman admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use chrono::Utc;
use predicates::prelude::*;
use stockman::store::{SqliteStore, Store};
use stockman::types::{Category, Company, ProductDraft, ProductKind};
use uuid::Uuid;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        Command::cargo_bin("stockman")
            .expect("failed to find binary")
            .args([
                "admin",
                "init",
                "--data-dir",
                &self.data_dir_str(),
                "--non-interactive",
            ])
            .assert()
    }

    fn open_store(&self) -> SqliteStore {
        SqliteStore::new(self.data_dir().join("stockman.db")).expect("failed to open store")
    }
}

#[test]
fn init_creates_database() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Database initialized"));

    assert!(ctx.data_dir().join("stockman.db").exists());
}

#[test]
fn init_is_idempotent() {
    let ctx = TestContext::new();

    ctx.init().success();
    ctx.init().success();

    let store = ctx.open_store();
    assert!(store.list_users().expect("list users").is_empty());
}

#[test]
fn init_database_accepts_products() {
    let ctx = TestContext::new();
    ctx.init().success();

    let store = ctx.open_store();

    store
        .create_company(&Company {
            id: "C1".to_string(),
            name: "Acme".to_string(),
            code_prefix: "ACM".to_string(),
            created_at: Utc::now(),
        })
        .expect("create company");

    let category = Category {
        id: Uuid::new_v4().to_string(),
        name: "tools".to_string(),
        created_at: Utc::now(),
    };
    store.create_category(&category).expect("create category");

    let created = store
        .create_product(&ProductDraft {
            company_id: "C1".to_string(),
            name: "Hammer".to_string(),
            kind: ProductKind::Physical,
            description: String::new(),
            category_id: category.id,
            buy_price: 10.0,
            sell_price: 15.0,
            photo_path: String::new(),
        })
        .expect("create product");

    assert_eq!(created.code, "ACM-00001");
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("stockman")
        .expect("failed to find binary")
        .args(["admin", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
