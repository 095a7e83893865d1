use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};

mod common;

#[derive(QueryableByName)]
struct SchemaObject {
    #[diesel(sql_type = Text)]
    name: String,
}

fn schema_objects(test_db: &common::TestDb, kind: &str) -> Vec<String> {
    let mut conn = test_db.conn();
    diesel::sql_query("SELECT name FROM sqlite_master WHERE type = ? ORDER BY name")
        .bind::<Text, _>(kind)
        .load::<SchemaObject>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|object| object.name)
        .collect()
}

#[test]
fn test_migrations_create_shop_tables_and_indexes() {
    let test_db = common::TestDb::new("test_migrations_create_shop_tables.db");

    let tables = schema_objects(&test_db, "table");
    for table in [
        "customers",
        "employee_ratings",
        "employees",
        "materials",
        "order_ratings",
        "order_status_history",
        "orders",
        "reports",
        "system_settings",
    ] {
        assert!(tables.iter().any(|name| name == table), "missing table {table}");
    }

    let indexes = schema_objects(&test_db, "index");
    for index in [
        "customers_hub_phone_idx",
        "employees_hub_phone_idx",
        "employees_hub_login_email_idx",
        "orders_hub_number_idx",
        "employee_ratings_order_employee_idx",
        "system_settings_hub_key_idx",
    ] {
        assert!(indexes.iter().any(|name| name == index), "missing index {index}");
    }
}

#[test]
fn test_check_constraints_reject_invalid_rows() {
    let test_db = common::TestDb::new("test_check_constraints_reject_invalid_rows.db");
    let repo = test_db.repo();
    let customer = common::customer(&repo, 1, "99112233");
    let order = common::order(&repo, 1, customer.id, common::date(2025, 3, 1));
    let mut conn = test_db.conn();

    let negative_stock = diesel::sql_query(
        "INSERT INTO materials (hub_id, name, unit_price_cents, stock_quantity) \
         VALUES (1, 'Wool', 1000, -1)",
    )
    .execute(&mut conn);
    assert!(negative_stock.is_err());

    let negative_price = diesel::sql_query(
        "INSERT INTO materials (hub_id, name, unit_price_cents) VALUES (1, 'Linen', -5)",
    )
    .execute(&mut conn);
    assert!(negative_price.is_err());

    let low_score = diesel::sql_query(
        "INSERT INTO order_ratings \
         (order_id, overall_rating, quality_rating, service_rating, timing_rating) \
         VALUES (?, 0, 3, 3, 3)",
    )
    .bind::<Integer, _>(order.id)
    .execute(&mut conn);
    assert!(low_score.is_err());
}

#[test]
fn test_db_files_are_removed_on_drop() {
    let base = "test_db_files_are_removed_on_drop.db";

    {
        let test_db = common::TestDb::new(base);
        assert!(test_db.pool().get().is_ok());
    }

    assert!(!std::path::Path::new(base).exists());
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}
