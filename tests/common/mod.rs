#![allow(dead_code)]

use std::path::PathBuf;

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use dealer_crm::db::{DbPool, establish_connection_pool};
use dealer_crm::domain::tenancy::{Agency, NewAgency};
use dealer_crm::domain::types::{AgencyName, BrandName, GroupName, UserEmail, UserName};
use dealer_crm::domain::user::{NewUser, User};
use dealer_crm::repository::{DieselRepository, TenancyWriter, UserWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite file inside a temporary directory, migrated on creation and
/// removed with the directory on drop.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("build pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    /// Location inside the temporary directory, for files next to the database.
    pub fn path(&self, name: &str) -> PathBuf {
        self._dir.path().join(name)
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

/// Creates a group, a brand and one agency named `name`.
pub fn seed_agency(repo: &DieselRepository, name: &str) -> Agency {
    let group = repo
        .create_group(&GroupName::new(format!("{name} Group")).unwrap())
        .unwrap();
    let brand = repo
        .create_brand(&BrandName::new(format!("{name} Motors")).unwrap())
        .unwrap();
    repo.create_agency(&NewAgency::new(
        group.id,
        brand.id,
        AgencyName::new(name).unwrap(),
        Some("CDMX".into()),
    ))
    .unwrap()
}

pub fn seed_user(repo: &DieselRepository, agency: &Agency, name: &str) -> User {
    repo.create_or_update_user(&NewUser::new(
        agency.id,
        UserName::new(name).unwrap(),
        UserEmail::new(format!("{}@dealer.test", name.to_lowercase())).unwrap(),
    ))
    .unwrap()
}
