//! Lookups backing the autocomplete widgets of the order and customer forms.

use pushkind_common::domain::auth::AuthenticatedUser;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, CustomerListQuery};
use crate::domain::employee::{EmployeeListQuery, EmployeeRole};
use crate::forms::customers::CustomerForm;
use crate::repository::{CustomerReader, CustomerWriter, EmployeeReader};
use crate::services::customers::create_customer;
use crate::services::{ServiceError, ServiceResult, ensure_access, non_blank};

/// Shortest phone fragment worth searching for.
pub const MIN_PHONE_SEARCH_LEN: usize = 3;

/// Upper bound on autocomplete results.
pub const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct CustomerSearchQuery {
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeSearchQuery {
    pub q: Option<String>,
}

/// Customer as returned by the JSON endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerJson {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub province: String,
    pub customer_type: String,
}

impl From<Customer> for CustomerJson {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            full_name: customer.full_name(),
            province: customer.province.as_str().to_string(),
            customer_type: customer.customer_type.as_str().to_string(),
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone: customer.phone,
            email: customer.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmployeeJson {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub role: EmployeeRole,
    pub role_label: &'static str,
}

/// Outcome of the JSON customer creation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateCustomerResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CreateCustomerResponse {
    pub fn created(customer: &Customer) -> Self {
        Self {
            success: true,
            customer_id: Some(customer.id),
            customer_name: Some(customer.full_name()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            customer_id: None,
            customer_name: None,
            error: Some(error.into()),
        }
    }
}

/// Customers whose phone contains the fragment.
///
/// Fragments shorter than [`MIN_PHONE_SEARCH_LEN`] return nothing.
pub fn search_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CustomerSearchQuery,
) -> ServiceResult<Vec<CustomerJson>>
where
    R: CustomerReader + ?Sized,
{
    ensure_access(user)?;

    let Some(phone) = non_blank(query.phone) else {
        return Ok(Vec::new());
    };
    if phone.chars().count() < MIN_PHONE_SEARCH_LEN {
        return Ok(Vec::new());
    }

    let (_, customers) = repo
        .list_customers(
            CustomerListQuery::new(user.hub_id)
                .phone(phone)
                .paginate(1, MAX_SEARCH_RESULTS),
        )
        .map_err(ServiceError::from)?;

    Ok(customers.into_iter().map(CustomerJson::from).collect())
}

pub fn customer_json<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<CustomerJson>
where
    R: CustomerReader + ?Sized,
{
    ensure_access(user)?;

    repo.get_customer_by_id(customer_id, user.hub_id)
        .map_err(ServiceError::from)?
        .map(CustomerJson::from)
        .ok_or(ServiceError::NotFound)
}

/// Creates a customer and reports the outcome in the shape the order form expects.
///
/// Only a missing role is returned as an error; everything else ends up in the payload.
pub fn create_customer_json<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CustomerForm,
) -> ServiceResult<CreateCustomerResponse>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    match create_customer(repo, user, form) {
        Ok(customer) => Ok(CreateCustomerResponse::created(&customer)),
        Err(ServiceError::Unauthorized) => Err(ServiceError::Unauthorized),
        Err(ServiceError::Form(message)) => Ok(CreateCustomerResponse::failed(message)),
        Err(ServiceError::Conflict) => Ok(CreateCustomerResponse::failed(
            "A customer with this phone already exists",
        )),
        Err(err) => {
            log::error!("Failed to create customer: {err}");
            Ok(CreateCustomerResponse::failed("Failed to create customer"))
        }
    }
}

/// Active employees matching a name or phone fragment.
pub fn search_employees<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: EmployeeSearchQuery,
) -> ServiceResult<Vec<EmployeeJson>>
where
    R: EmployeeReader + ?Sized,
{
    ensure_access(user)?;

    let mut list_query = EmployeeListQuery::new(user.hub_id)
        .active_only()
        .paginate(1, MAX_SEARCH_RESULTS);
    if let Some(term) = non_blank(query.q) {
        list_query = list_query.search(term);
    }

    let (_, employees) = repo
        .list_employees(list_query)
        .map_err(ServiceError::from)?;

    Ok(employees
        .into_iter()
        .map(|employee| EmployeeJson {
            id: employee.id,
            name: employee.full_name(),
            role_label: employee.role.label(),
            role: employee.role,
            phone: employee.phone,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::repository::mock::{MockCustomerReader, MockEmployeeReader, MockShopRepository};
    use crate::services::test_support::{sample_customer, sample_employee, user_with_roles};

    fn tailor() -> AuthenticatedUser {
        user_with_roles(&[SERVICE_ACCESS_ROLE])
    }

    fn customer_form(phone: &str) -> CustomerForm {
        CustomerForm {
            first_name: "Saraa".to_string(),
            last_name: "Bold".to_string(),
            phone: phone.to_string(),
            email: None,
            province: None,
            customer_type: None,
        }
    }

    #[test]
    fn short_phone_fragment_returns_nothing() {
        let mut repo = MockCustomerReader::new();
        repo.expect_list_customers().never();

        let result = search_customers(
            &repo,
            &tailor(),
            CustomerSearchQuery {
                phone: Some(" 99 ".to_string()),
            },
        )
        .expect("search runs");

        assert!(result.is_empty());
    }

    #[test]
    fn phone_search_is_capped() {
        let mut repo = MockCustomerReader::new();
        repo.expect_list_customers()
            .withf(|query| {
                query.phone.as_deref() == Some("9911")
                    && query.pagination.as_ref().map(|p| p.per_page) == Some(MAX_SEARCH_RESULTS)
            })
            .returning(|query| Ok((1, vec![sample_customer(4, query.hub_id)])));

        let result = search_customers(
            &repo,
            &tailor(),
            CustomerSearchQuery {
                phone: Some("9911".to_string()),
            },
        )
        .expect("search runs");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].full_name, "Dorj Bat");
        assert_eq!(result[0].province, "ulaanbaatar");
    }

    #[test]
    fn search_requires_role() {
        let repo = MockCustomerReader::new();

        let result = search_customers(&repo, &user_with_roles(&[]), CustomerSearchQuery::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn missing_customer_json_is_not_found() {
        let mut repo = MockCustomerReader::new();
        repo.expect_get_customer_by_id().returning(|_, _| Ok(None));

        let result = customer_json(&repo, &tailor(), 5);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn json_create_reports_success() {
        let mut repo = MockShopRepository::new();
        repo.expect_get_customer_by_phone().returning(|_, _| Ok(None));
        repo.expect_create_customer().returning(|new_customer| {
            let mut customer = sample_customer(12, new_customer.hub_id);
            customer.first_name = new_customer.first_name.clone();
            customer.last_name = new_customer.last_name.clone();
            Ok(customer)
        });

        let response =
            create_customer_json(&repo, &tailor(), customer_form("99112233")).expect("handled");

        assert_eq!(response, CreateCustomerResponse {
            success: true,
            customer_id: Some(12),
            customer_name: Some("Bold Saraa".to_string()),
            error: None,
        });
    }

    #[test]
    fn json_create_reports_duplicate_phone() {
        let mut repo = MockShopRepository::new();
        repo.expect_get_customer_by_phone()
            .returning(|_, hub_id| Ok(Some(sample_customer(1, hub_id))));
        repo.expect_create_customer().never();

        let response =
            create_customer_json(&repo, &tailor(), customer_form("99110001")).expect("handled");

        assert!(!response.success);
        assert!(response.error.is_some());
    }

    #[test]
    fn employee_search_lists_active_matches() {
        let mut repo = MockEmployeeReader::new();
        repo.expect_list_employees()
            .withf(|query| query.active_only && query.search.as_deref() == Some("Worker"))
            .returning(|query| {
                Ok((
                    1,
                    vec![sample_employee(2, query.hub_id, EmployeeRole::JacketSewer)],
                ))
            });

        let result = search_employees(
            &repo,
            &tailor(),
            EmployeeSearchQuery {
                q: Some("Worker".to_string()),
            },
        )
        .expect("search runs");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].role, EmployeeRole::JacketSewer);
    }
}
