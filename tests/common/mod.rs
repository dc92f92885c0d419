//! Shared helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use enoteca_backoffice::SERVICE_ACCESS_ROLE;
use enoteca_backoffice::SERVICE_ADMIN_ROLE;
use enoteca_backoffice::db::{DbPool, establish_connection_pool};
use enoteca_backoffice::models::auth::AuthenticatedUser;
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// SQLite database in a temporary directory, removed on drop.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("utf-8 path").to_string();

        let pool = establish_connection_pool(&url).expect("create pool");
        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn operator() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "2".into(),
        email: "operator@example.com".into(),
        name: "Operator".into(),
        roles: vec![SERVICE_ACCESS_ROLE.into()],
        exp: far_future(),
    }
}

pub fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "1".into(),
        email: "admin@example.com".into(),
        name: "Admin".into(),
        roles: vec![SERVICE_ACCESS_ROLE.into(), SERVICE_ADMIN_ROLE.into()],
        exp: far_future(),
    }
}

pub fn far_future() -> usize {
    (chrono::Utc::now().timestamp() + 3600) as usize
}
