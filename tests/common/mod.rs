#![allow(dead_code)]

use chrono::NaiveDateTime;
use curiosidade_crm::db::{DbPool, establish_connection_pool};
use curiosidade_crm::domain::customer::{CustomerFields, NewCustomer};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// SQLite file in a temporary directory, migrated and removed on drop.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("connection pool");

        let mut conn = pool.get().expect("connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn customer(name: &str, email: &str, created_at: NaiveDateTime) -> NewCustomer {
    NewCustomer::new(
        CustomerFields {
            name: name.to_string(),
            email: email.to_string(),
            phone: "11999990000".to_string(),
            address: "Rua das Flores, 10".to_string(),
            age: 30,
            active: true,
            ..CustomerFields::default()
        },
        created_at,
    )
}
