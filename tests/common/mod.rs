//! Shop database and record fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbConnection, DbPool, establish_connection_pool};
use tailor_shop::domain::customer::{Customer, NewCustomer};
use tailor_shop::domain::employee::{Employee, EmployeeRole, NewEmployee};
use tailor_shop::domain::order::{ItemType, NewOrder, Order};
use tailor_shop::repository::{CustomerWriter, DieselRepository, EmployeeWriter, OrderWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// SQLite file with the shop schema applied, removed on drop.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        remove_files(filename);

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        pool.get()
            .expect("Failed to get SQLite connection from pool.")
            .run_pending_migrations(MIGRATIONS)
            .expect("Shop migrations failed");

        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// Raw connection for checks the repository does not expose.
    pub fn conn(&self) -> DbConnection {
        self.pool.get().expect("Failed to get SQLite connection from pool.")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        remove_files(&self.filename);
    }
}

fn remove_files(filename: &str) {
    for path in [
        filename.to_string(),
        format!("{filename}-shm"),
        format!("{filename}-wal"),
    ] {
        std::fs::remove_file(path).ok();
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn customer(repo: &DieselRepository, hub_id: i32, phone: &str) -> Customer {
    repo.create_customer(&NewCustomer::new(hub_id, "Bat", "Dorj", phone))
        .expect("create customer")
}

pub fn employee(
    repo: &DieselRepository,
    hub_id: i32,
    phone: &str,
    role: EmployeeRole,
) -> Employee {
    repo.create_employee(&NewEmployee::new(hub_id, "Oyun", phone, role))
        .expect("create employee")
}

/// Men's suit placed on `day`, due three weeks later.
pub fn order(repo: &DieselRepository, hub_id: i32, customer_id: i32, day: NaiveDate) -> Order {
    repo.create_order(
        &NewOrder::new(
            hub_id,
            customer_id,
            ItemType::MenSuit,
            day,
            day + chrono::Duration::days(21),
        )
        .placed_on(day),
    )
    .expect("create order")
}
