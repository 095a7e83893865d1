use chrono::NaiveDate;
use pushkind_common::repository::errors::RepositoryError;
use tailor_shop::domain::customer::{CustomerListQuery, CustomerType, NewCustomer, UpdateCustomer};
use tailor_shop::domain::employee::{EmployeeRole, NewEmployee};
use tailor_shop::domain::order::{ItemType, NewOrder, OrderListQuery, OrderStatus};
use tailor_shop::domain::order_status_history::NewOrderStatusHistory;
use tailor_shop::domain::rating::{NewEmployeeRating, NewOrderRating};
use tailor_shop::domain::setting::NewSystemSetting;
use tailor_shop::repository::DieselRepository;
use tailor_shop::repository::{
    CustomerReader, CustomerWriter, EmployeeReader, EmployeeWriter, OrderReader, OrderWriter,
    RatingReader, RatingWriter, SettingReader, SettingWriter,
};

mod common;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_customer_repository_crud() {
    let test_db = common::TestDb::new("test_customer_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let bat = repo
        .create_customer(&NewCustomer::new(1, "Bat", "Dorj", "99112233"))
        .unwrap();
    repo.create_customer(
        &NewCustomer::new(1, "Saraa", "Bold", "88001122").with_customer_type(CustomerType::Vip),
    )
    .unwrap();
    repo.create_customer(&NewCustomer::new(2, "Other", "Hub", "99112233"))
        .unwrap();

    let (total, items) = repo.list_customers(CustomerListQuery::new(1)).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);

    let (total, items) = repo
        .list_customers(CustomerListQuery::new(1).phone("8800"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].first_name, "Saraa");

    let found = repo.get_customer_by_phone("99112233", 1).unwrap().unwrap();
    assert_eq!(found.id, bat.id);

    let updated = repo
        .update_customer(
            bat.id,
            1,
            &UpdateCustomer::from(
                NewCustomer::new(1, "Bat", "Dorj", "99112233").with_email("BAT@Example.com"),
            ),
        )
        .unwrap();
    assert_eq!(updated.email.as_deref(), Some("bat@example.com"));

    let err = repo
        .update_customer(
            bat.id,
            2,
            &UpdateCustomer::from(NewCustomer::new(2, "Intruder", "", "1")),
        )
        .err()
        .expect("expected hub-scoped update to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let err = repo
        .delete_customer(bat.id, 2)
        .err()
        .expect("expected hub-scoped delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    repo.delete_customer(bat.id, 1).unwrap();
    assert!(repo.get_customer_by_id(bat.id, 1).unwrap().is_none());
}

#[test]
fn test_customer_phone_is_unique_per_hub() {
    let test_db = common::TestDb::new("test_customer_phone_is_unique_per_hub.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_customer(&NewCustomer::new(1, "Bat", "Dorj", "99112233"))
        .unwrap();
    let duplicate = repo.create_customer(&NewCustomer::new(1, "Bat", "Again", "99112233"));

    assert!(duplicate.is_err());
}

#[test]
fn test_order_numbers_follow_monthly_sequence() {
    let test_db = common::TestDb::new("test_order_numbers_follow_monthly_sequence.db");
    let repo = DieselRepository::new(test_db.pool());

    let customer = repo
        .create_customer(&NewCustomer::new(1, "Bat", "Dorj", "99112233"))
        .unwrap();
    let place = |day: NaiveDate| {
        repo.create_order(
            &NewOrder::new(1, customer.id, ItemType::Jacket, day, day)
                .with_amounts(300_000, 100_000)
                .placed_on(day),
        )
        .unwrap()
    };

    let first = place(date(2025, 3, 1));
    let second = place(date(2025, 3, 15));
    let next_month = place(date(2025, 4, 2));

    assert_eq!(first.order_number, "ORD-202503-001");
    assert_eq!(second.order_number, "ORD-202503-002");
    assert_eq!(next_month.order_number, "ORD-202504-001");
    assert_eq!(first.status, OrderStatus::OrderPlaced);
    assert_eq!(first.remaining_amount_cents(), 200_000);

    let (total, rows) = repo
        .list_orders(OrderListQuery::new(1).customer_id(customer.id))
        .unwrap();
    assert_eq!(total, 3);
    assert!(rows.iter().all(|row| row.customer.id == customer.id));
}

#[test]
fn test_advance_order_status_records_history() {
    let test_db = common::TestDb::new("test_advance_order_status_records_history.db");
    let repo = DieselRepository::new(test_db.pool());

    let customer = repo
        .create_customer(&NewCustomer::new(1, "Bat", "Dorj", "99112233"))
        .unwrap();
    let cutter = repo
        .create_employee(&NewEmployee::new(1, "Tuya", "88112233", EmployeeRole::Cutter))
        .unwrap();
    let order = repo
        .create_order(&NewOrder::new(
            1,
            customer.id,
            ItemType::MenSuit,
            date(2025, 3, 1),
            date(2025, 3, 20),
        ))
        .unwrap();

    let history = NewOrderStatusHistory::new(order.id, OrderStatus::OrderPlaced)
        .completed_by(Some(cutter.id));
    let advanced = repo
        .advance_order_status(1, &history, OrderStatus::CutterCutting, None)
        .unwrap();
    assert_eq!(advanced.status, OrderStatus::CutterCutting);

    // The stored status no longer matches the stage being recorded.
    let stale = repo
        .advance_order_status(1, &history, OrderStatus::CutterCutting, None)
        .err()
        .expect("expected stale advance to fail");
    assert!(matches!(stale, RepositoryError::NotFound));

    let entries = repo.list_status_history(order.id).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, OrderStatus::OrderPlaced);
    assert_eq!(entries[0].completed_by, Some(cutter.id));

    let reloaded = repo.get_order_by_id(order.id, 1).unwrap().unwrap();
    assert_eq!(reloaded.status, OrderStatus::CutterCutting);
    assert!(repo.get_order_by_id(order.id, 2).unwrap().is_none());
}

#[test]
fn test_employee_rating_upsert_replaces_score() {
    let test_db = common::TestDb::new("test_employee_rating_upsert_replaces_score.db");
    let repo = DieselRepository::new(test_db.pool());

    let customer = repo
        .create_customer(&NewCustomer::new(1, "Bat", "Dorj", "99112233"))
        .unwrap();
    let sewer = repo
        .create_employee(&NewEmployee::new(1, "Oyun", "88112233", EmployeeRole::JacketSewer))
        .unwrap();
    let order = repo
        .create_order(&NewOrder::new(
            1,
            customer.id,
            ItemType::Jacket,
            date(2025, 3, 1),
            date(2025, 3, 20),
        ))
        .unwrap();

    repo.upsert_employee_rating(&NewEmployeeRating::new(order.id, sewer.id, 3))
        .unwrap();
    let replaced = repo
        .upsert_employee_rating(
            &NewEmployeeRating::new(order.id, sewer.id, 5).with_comment("Neat seams"),
        )
        .unwrap();
    assert_eq!(replaced.rating, 5);

    let ratings = repo.list_order_employee_ratings(order.id).unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].comment.as_deref(), Some("Neat seams"));
    assert_eq!(repo.list_employee_scores(sewer.id).unwrap(), vec![5]);

    let out_of_range = repo.upsert_employee_rating(&NewEmployeeRating::new(order.id, sewer.id, 6));
    assert!(out_of_range.is_err());
}

#[test]
fn test_setting_upsert_keeps_one_row_per_key() {
    let test_db = common::TestDb::new("test_setting_upsert_keeps_one_row_per_key.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.upsert_setting(
        &NewSystemSetting::new(1, "default_order_duration", "14")
            .with_description("Days until the due date"),
    )
    .unwrap();
    let updated = repo
        .upsert_setting(&NewSystemSetting::new(1, "default_order_duration", "21"))
        .unwrap();
    repo.upsert_setting(&NewSystemSetting::new(2, "default_order_duration", "7"))
        .unwrap();

    assert_eq!(updated.value, "21");
    assert_eq!(updated.description.as_deref(), Some("Days until the due date"));

    let settings = repo.list_settings(1).unwrap();
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[0].value, "21");
}

#[test]
fn test_order_numbers_keep_counting_past_999() {
    let test_db = common::TestDb::new("test_order_numbers_keep_counting_past_999.db");
    let repo = test_db.repo();
    let customer = common::customer(&repo, 1, "99112233");
    let day = date(2025, 3, 10);

    let mut last = None;
    for _ in 0..1001 {
        last = Some(common::order(&repo, 1, customer.id, day));
    }
    let last = last.unwrap();
    assert_eq!(last.order_number, "ORD-202503-1001");

    let next = common::order(&repo, 1, customer.id, day);
    assert_eq!(next.order_number, "ORD-202503-1002");
}

#[test]
fn test_delete_employee_detaches_orders_history_and_ratings() {
    let test_db = common::TestDb::new("test_delete_employee_detaches_orders.db");
    let repo = test_db.repo();
    let customer = common::customer(&repo, 1, "99112233");
    let cutter = common::employee(&repo, 1, "88112233", EmployeeRole::Cutter);
    let sewer = common::employee(&repo, 1, "88112244", EmployeeRole::TrouserSewer);

    let order = repo
        .create_order(
            &NewOrder::new(1, customer.id, ItemType::MenSuit, date(2025, 3, 1), date(2025, 3, 20))
                .with_assignments(Some(cutter.id), Some(cutter.id), Some(cutter.id)),
        )
        .unwrap();
    repo.advance_order_status(
        1,
        &NewOrderStatusHistory::new(order.id, OrderStatus::OrderPlaced).completed_by(Some(cutter.id)),
        OrderStatus::CutterCutting,
        None,
    )
    .unwrap();
    repo.upsert_employee_rating(&NewEmployeeRating::new(order.id, cutter.id, 4))
        .unwrap();
    repo.upsert_employee_rating(&NewEmployeeRating::new(order.id, sewer.id, 5))
        .unwrap();

    let err = repo
        .delete_employee(cutter.id, 2)
        .err()
        .expect("expected hub-scoped delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));
    assert_eq!(repo.list_order_employee_ratings(order.id).unwrap().len(), 2);

    repo.delete_employee(cutter.id, 1).unwrap();

    assert!(repo.get_employee_by_id(cutter.id, 1).unwrap().is_none());
    let order = repo.get_order_by_id(order.id, 1).unwrap().unwrap();
    assert_eq!(order.assigned_tailor_id, None);
    assert_eq!(order.assigned_cutter_id, None);
    assert_eq!(order.assigned_trouser_maker_id, None);

    let history = repo.list_status_history(order.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].completed_by, None);

    let ratings = repo.list_order_employee_ratings(order.id).unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].employee_id, sewer.id);
    assert!(repo.list_employee_scores(cutter.id).unwrap().is_empty());
}

#[test]
fn test_delete_order_removes_history_and_ratings() {
    let test_db = common::TestDb::new("test_delete_order_removes_history_and_ratings.db");
    let repo = test_db.repo();
    let customer = common::customer(&repo, 1, "99112233");
    let sewer = common::employee(&repo, 1, "88112233", EmployeeRole::JacketSewer);
    let order = common::order(&repo, 1, customer.id, date(2025, 3, 1));
    let kept = common::order(&repo, 1, customer.id, date(2025, 3, 2));

    repo.advance_order_status(
        1,
        &NewOrderStatusHistory::new(order.id, OrderStatus::OrderPlaced).completed_by(Some(sewer.id)),
        OrderStatus::CutterCutting,
        None,
    )
    .unwrap();
    repo.upsert_employee_rating(&NewEmployeeRating::new(order.id, sewer.id, 5))
        .unwrap();
    repo.upsert_employee_rating(&NewEmployeeRating::new(kept.id, sewer.id, 3))
        .unwrap();
    repo.upsert_order_rating(&NewOrderRating {
        order_id: order.id,
        overall_rating: 5,
        quality_rating: 5,
        service_rating: 4,
        timing_rating: 4,
        comments: None,
    })
    .unwrap();

    let err = repo
        .delete_order(order.id, 2)
        .err()
        .expect("expected hub-scoped delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));
    assert!(repo.get_order_rating(order.id).unwrap().is_some());

    repo.delete_order(order.id, 1).unwrap();

    assert!(repo.get_order_by_id(order.id, 1).unwrap().is_none());
    assert!(repo.list_status_history(order.id).unwrap().is_empty());
    assert!(repo.list_order_employee_ratings(order.id).unwrap().is_empty());
    assert!(repo.get_order_rating(order.id).unwrap().is_none());
    assert_eq!(repo.list_employee_scores(sewer.id).unwrap(), vec![3]);

    let err = repo
        .delete_order(order.id, 1)
        .err()
        .expect("expected second delete to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}
