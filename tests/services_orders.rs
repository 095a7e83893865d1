use chrono::{Local, NaiveDate};
use pushkind_common::domain::auth::AuthenticatedUser;
use tailor_shop::domain::order::{OrderStatus, StatusAdvance};
use tailor_shop::forms::customers::CustomerForm;
use tailor_shop::forms::employees::EmployeeForm;
use tailor_shop::forms::orders::{OrderForm, RateOrderForm};
use tailor_shop::repository::{DieselRepository, OrderReader, RatingReader};
use tailor_shop::services::{ServiceError, customers, employees, orders};
use tailor_shop::{MANAGER_ROLE, SERVICE_ACCESS_ROLE};

mod common;

fn user(roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "user".into(),
        email: "oyun@example.com".into(),
        hub_id: 1,
        name: "Oyun".into(),
        roles: roles.iter().map(|role| (*role).to_string()).collect(),
        exp: 0,
    }
}

fn customer_form(phone: &str) -> CustomerForm {
    CustomerForm {
        first_name: "Bat".to_string(),
        last_name: "Dorj".to_string(),
        phone: phone.to_string(),
        email: None,
        province: None,
        customer_type: None,
    }
}

fn order_form(customer_id: i32, tailor_id: i32) -> OrderForm {
    OrderForm {
        customer_id,
        item_type: "men_suit".to_string(),
        material_code: Some(" WL-204 ".to_string()),
        assigned_tailor_id: Some(tailor_id.to_string()),
        assigned_cutter_id: None,
        assigned_trouser_maker_id: None,
        total_amount: "450000".to_string(),
        advance_amount: Some("150000".to_string()),
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        notes: None,
    }
}

#[test]
fn order_moves_through_every_stage() {
    let test_db = common::TestDb::new("service_order_moves_through_every_stage.db");
    let repo = DieselRepository::new(test_db.pool());
    let manager = user(&[SERVICE_ACCESS_ROLE, MANAGER_ROLE]);

    let customer = customers::create_customer(&repo, &manager, customer_form("9911-2233"))
        .expect("create customer");
    assert_eq!(customer.phone, "99112233");

    let sewer = employees::create_employee(
        &repo,
        &manager,
        EmployeeForm {
            first_name: "Oyun".to_string(),
            last_name: String::new(),
            phone: "88112233".to_string(),
            role: "jacket_sewer".to_string(),
            is_active: Some("on".to_string()),
            login_email: Some("oyun@example.com".to_string()),
        },
    )
    .expect("create employee");

    let order = orders::create_order(&repo, &manager, order_form(customer.id, sewer.id))
        .expect("create order");
    assert_eq!(order.status, OrderStatus::OrderPlaced);
    assert_eq!(order.material_code.as_deref(), Some("WL-204"));
    assert!(order.order_number.starts_with("ORD-"));

    for expected in OrderStatus::ALL.into_iter().skip(1) {
        let result = orders::advance_order_status(&repo, &manager, order.id);
        match result {
            Ok(StatusAdvance::Advanced { order, .. }) => assert_eq!(order.status, expected),
            other => panic!("expected an advance to {expected:?}, got {other:?}"),
        }
    }

    let finished = repo.get_order_by_id(order.id, 1).unwrap().unwrap();
    assert_eq!(finished.status, OrderStatus::FINAL);
    assert_eq!(finished.completed_date, Some(Local::now().date_naive()));

    let history = repo.list_status_history(order.id).unwrap();
    assert_eq!(history.len(), OrderStatus::ALL.len() - 1);
    // The acting user is linked to the employee through the login email.
    assert!(history.iter().all(|entry| entry.completed_by == Some(sewer.id)));

    let again = orders::advance_order_status(&repo, &manager, order.id);
    assert!(matches!(again, Ok(StatusAdvance::AlreadyFinished(_))));

    orders::rate_order(
        &repo,
        &manager,
        order.id,
        RateOrderForm {
            overall_rating: 5,
            quality_rating: 4,
            service_rating: 5,
            timing_rating: 3,
            comments: None,
        },
    )
    .expect("rate order");
    let rating = repo.get_order_rating(order.id).unwrap().unwrap();
    assert_eq!(rating.quality_rating, 4);
}

#[test]
fn create_customer_rejects_duplicate_phone() {
    let test_db = common::TestDb::new("service_create_customer_rejects_duplicate_phone.db");
    let repo = DieselRepository::new(test_db.pool());
    let tailor = user(&[SERVICE_ACCESS_ROLE]);

    customers::create_customer(&repo, &tailor, customer_form("99112233"))
        .expect("create customer");
    let result = customers::create_customer(&repo, &tailor, customer_form("9911 2233"));

    assert!(matches!(result, Err(ServiceError::Conflict)));
}

#[test]
fn employees_require_manager_role() {
    let test_db = common::TestDb::new("service_employees_require_manager_role.db");
    let repo = DieselRepository::new(test_db.pool());

    let result = employees::create_employee(
        &repo,
        &user(&[SERVICE_ACCESS_ROLE]),
        EmployeeForm {
            first_name: "Tuya".to_string(),
            last_name: String::new(),
            phone: "88112233".to_string(),
            role: "cutter".to_string(),
            is_active: Some("on".to_string()),
            login_email: None,
        },
    );

    assert!(matches!(result, Err(ServiceError::Unauthorized)));
}

#[test]
fn order_for_unknown_customer_is_rejected() {
    let test_db = common::TestDb::new("service_order_for_unknown_customer_is_rejected.db");
    let repo = DieselRepository::new(test_db.pool());

    let mut form = order_form(42, 0);
    form.assigned_tailor_id = None;
    let result = orders::create_order(&repo, &user(&[SERVICE_ACCESS_ROLE]), form);

    assert!(matches!(result, Err(ServiceError::Form(_))));
}
