use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::{MANAGER_ROLE, SERVICE_ACCESS_ROLE};

pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod api;
pub mod customers;
pub mod employees;
pub mod materials;
pub mod orders;
pub mod reports;
pub mod settings;

/// Fails with `Unauthorized` unless the user holds the service role.
pub(crate) fn ensure_access(user: &AuthenticatedUser) -> ServiceResult<()> {
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(())
}

/// Fails with `Unauthorized` unless the user holds both the service and the manager role.
pub(crate) fn ensure_manager(user: &AuthenticatedUser) -> ServiceResult<()> {
    ensure_access(user)?;
    if !check_role(MANAGER_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(())
}

/// Trims a user supplied filter, dropping it when blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};
    use pushkind_common::domain::auth::AuthenticatedUser;

    use crate::domain::customer::{Customer, CustomerType, Province};
    use crate::domain::employee::{Employee, EmployeeRole};
    use crate::domain::order::{ItemType, Order, OrderStatus};

    pub fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2025, 3, 1) {
            Some(date) => date.and_hms_opt(9, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    pub fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            hub_id: 7,
            name: "Tester".to_string(),
            roles: roles.iter().map(|role| (*role).to_string()).collect(),
            exp: 0,
        }
    }

    pub fn sample_customer(id: i32, hub_id: i32) -> Customer {
        Customer {
            id,
            hub_id,
            first_name: "Bat".to_string(),
            last_name: "Dorj".to_string(),
            phone: format!("9911{id:04}"),
            email: None,
            province: Province::Ulaanbaatar,
            customer_type: CustomerType::Regular,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    pub fn sample_employee(id: i32, hub_id: i32, role: EmployeeRole) -> Employee {
        Employee {
            id,
            hub_id,
            first_name: format!("Worker{id}"),
            last_name: String::new(),
            phone: format!("8811{id:04}"),
            role,
            is_active: true,
            login_email: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    pub fn sample_order(id: i32, hub_id: i32, status: OrderStatus) -> Order {
        Order {
            id,
            hub_id,
            order_number: format!("ORD-202503-{id:03}"),
            customer_id: 1,
            item_type: ItemType::MenSuit,
            material_code: None,
            assigned_tailor_id: None,
            assigned_cutter_id: None,
            assigned_trouser_maker_id: None,
            total_amount_cents: 65_000_000,
            advance_amount_cents: 20_000_000,
            status,
            start_date: date(2025, 3, 1),
            due_date: date(2025, 3, 15),
            completed_date: None,
            notes: None,
            is_rated: false,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }
}
