use chrono::Local;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};

use crate::domain::employee::{
    Employee, EmployeeListQuery, EmployeeRole, EmployeeSummary, NewEmployee, UpdateEmployee,
};
use crate::domain::order::OrderListQuery;
use crate::domain::rating::RatingStats;
use crate::forms::employees::EmployeeForm;
use crate::repository::{EmployeeReader, EmployeeWriter, OrderReader, RatingReader};
use crate::services::orders::OrderView;
use crate::services::{ServiceError, ServiceResult, ensure_manager, non_blank};

/// Assigned orders listed on the employee page.
pub const RECENT_ORDERS_LIMIT: usize = 20;

/// Query parameters accepted by the employees index page.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeesQuery {
    /// Name or phone fragment.
    pub search: Option<String>,
    pub role: Option<String>,
    /// Inactive employees are hidden unless requested.
    #[serde(default)]
    pub include_inactive: bool,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,
    pub full_name: String,
    pub role_label: &'static str,
}

impl From<Employee> for EmployeeView {
    fn from(employee: Employee) -> Self {
        Self {
            full_name: employee.full_name(),
            role_label: employee.role.label(),
            employee,
        }
    }
}

/// Data required to render the employees index template.
pub struct EmployeesPageData {
    pub employees: Paginated<EmployeeView>,
    pub summary: EmployeeSummary,
    pub search: Option<String>,
    pub role: Option<EmployeeRole>,
    pub include_inactive: bool,
}

/// Loads the employee list ordered by name with the head-count summary.
pub fn load_employees<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: EmployeesQuery,
) -> ServiceResult<EmployeesPageData>
where
    R: EmployeeReader + ?Sized,
{
    ensure_manager(user)?;

    let page = query.page.unwrap_or(1);
    let search = non_blank(query.search);
    let role = non_blank(query.role).and_then(|code| code.parse::<EmployeeRole>().ok());

    let mut list_query =
        EmployeeListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(role) = role {
        list_query = list_query.role(role);
    }
    if !query.include_inactive {
        list_query = list_query.active_only();
    }

    let (total, employees) = repo.list_employees(list_query).map_err(ServiceError::from)?;
    let roles = repo
        .list_employee_roles(user.hub_id)
        .map_err(ServiceError::from)?;

    let items = employees.into_iter().map(EmployeeView::from).collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(EmployeesPageData {
        employees: Paginated::new(items, page, total_pages),
        summary: EmployeeSummary::from_roles(&roles),
        search,
        role,
        include_inactive: query.include_inactive,
    })
}

/// Data required to render the employee detail template.
pub struct EmployeeDetailData {
    pub employee: EmployeeView,
    pub recent_orders: Vec<OrderView>,
    pub total_orders: usize,
    pub completed_orders: usize,
    pub in_progress_orders: usize,
    pub rating: RatingStats,
}

/// Loads an employee with their assigned orders and rating.
pub fn load_employee_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    employee_id: i32,
) -> ServiceResult<EmployeeDetailData>
where
    R: EmployeeReader + OrderReader + RatingReader + ?Sized,
{
    let employee = load_employee(repo, user, employee_id)?;

    let today = Local::now().date_naive();
    let (_, mut rows) = repo
        .list_orders(
            OrderListQuery::new(user.hub_id)
                .employee_id(employee.id)
                .today(today),
        )
        .map_err(ServiceError::from)?;

    let total_orders = rows.len();
    let completed_orders = rows.iter().filter(|row| row.order.is_finished()).count();

    rows.sort_by(|a, b| {
        b.order
            .created_at
            .cmp(&a.order.created_at)
            .then(b.order.id.cmp(&a.order.id))
    });
    let recent_orders = rows
        .into_iter()
        .take(RECENT_ORDERS_LIMIT)
        .map(|row| OrderView::from_row(row, today))
        .collect();

    let scores = repo
        .list_employee_scores(employee.id)
        .map_err(ServiceError::from)?;

    Ok(EmployeeDetailData {
        employee: EmployeeView::from(employee),
        recent_orders,
        total_orders,
        completed_orders,
        in_progress_orders: total_orders - completed_orders,
        rating: RatingStats::from_scores(&scores),
    })
}

/// Fetches one employee of the user's hub.
pub fn load_employee<R>(
    repo: &R,
    user: &AuthenticatedUser,
    employee_id: i32,
) -> ServiceResult<Employee>
where
    R: EmployeeReader + ?Sized,
{
    ensure_manager(user)?;

    repo.get_employee_by_id(employee_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates an employee with a phone and login email unique in the hub.
pub fn create_employee<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EmployeeForm,
) -> ServiceResult<Employee>
where
    R: EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_manager(user)?;

    let new_employee = form
        .into_new_employee(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    check_unique(repo, &new_employee, None)?;

    repo.create_employee(&new_employee)
        .map_err(ServiceError::from)
}

/// Replaces the editable fields of an employee.
pub fn modify_employee<R>(
    repo: &R,
    user: &AuthenticatedUser,
    employee_id: i32,
    form: EmployeeForm,
) -> ServiceResult<Employee>
where
    R: EmployeeReader + EmployeeWriter + ?Sized,
{
    ensure_manager(user)?;

    let new_employee = form
        .into_new_employee(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    check_unique(repo, &new_employee, Some(employee_id))?;

    repo.update_employee(employee_id, user.hub_id, &UpdateEmployee::from(new_employee))
        .map_err(ServiceError::from)
}

/// Deletes an employee, unassigning them from their orders.
pub fn remove_employee<R>(
    repo: &R,
    user: &AuthenticatedUser,
    employee_id: i32,
) -> ServiceResult<()>
where
    R: EmployeeWriter + ?Sized,
{
    ensure_manager(user)?;

    repo.delete_employee(employee_id, user.hub_id)
        .map_err(ServiceError::from)?;
    log::info!("employee {employee_id} removed from hub {}", user.hub_id);
    Ok(())
}

fn check_unique<R>(repo: &R, employee: &NewEmployee, current_id: Option<i32>) -> ServiceResult<()>
where
    R: EmployeeReader + ?Sized,
{
    let is_other = |found: Option<Employee>| found.is_some_and(|found| Some(found.id) != current_id);

    let by_phone = repo
        .get_employee_by_phone(&employee.phone, employee.hub_id)
        .map_err(ServiceError::from)?;
    if is_other(by_phone) {
        return Err(ServiceError::Conflict);
    }

    if let Some(email) = employee.login_email.as_deref() {
        let by_email = repo
            .get_employee_by_login_email(email, employee.hub_id)
            .map_err(ServiceError::from)?;
        if is_other(by_email) {
            return Err(ServiceError::Conflict);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderStatus, OrderWithCustomer};
    use crate::repository::mock::{MockEmployeeReader, MockShopRepository};
    use crate::services::test_support::{
        sample_customer, sample_employee, sample_order, user_with_roles,
    };
    use crate::{MANAGER_ROLE, SERVICE_ACCESS_ROLE};

    fn manager() -> AuthenticatedUser {
        user_with_roles(&[SERVICE_ACCESS_ROLE, MANAGER_ROLE])
    }

    fn form() -> EmployeeForm {
        EmployeeForm {
            first_name: "Saraa".to_string(),
            last_name: "Bold".to_string(),
            phone: "99119911".to_string(),
            role: "cutter".to_string(),
            is_active: Some("on".to_string()),
            login_email: None,
        }
    }

    #[test]
    fn employees_page_is_manager_only() {
        let repo = MockEmployeeReader::new();

        let result = load_employees(
            &repo,
            &user_with_roles(&[SERVICE_ACCESS_ROLE]),
            EmployeesQuery::default(),
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn employees_page_hides_inactive_by_default() {
        let mut repo = MockEmployeeReader::new();
        repo.expect_list_employees()
            .withf(|query| query.active_only && query.role == Some(EmployeeRole::Cutter))
            .returning(|query| {
                Ok((1, vec![sample_employee(1, query.hub_id, EmployeeRole::Cutter)]))
            });
        repo.expect_list_employee_roles()
            .returning(|_| Ok(vec![(EmployeeRole::Cutter, true), (EmployeeRole::Cutter, false)]));

        let data = load_employees(
            &repo,
            &manager(),
            EmployeesQuery {
                role: Some("cutter".to_string()),
                ..EmployeesQuery::default()
            },
        )
        .expect("employees load");

        assert_eq!(data.summary.total, 2);
        assert_eq!(data.summary.inactive, 1);
        assert!(!data.include_inactive);
    }

    #[test]
    fn create_employee_rejects_taken_phone() {
        let mut repo = MockShopRepository::new();
        repo.expect_get_employee_by_phone()
            .returning(|_, hub| Ok(Some(sample_employee(5, hub, EmployeeRole::Manager))));
        repo.expect_create_employee().never();

        let result = create_employee(&repo, &manager(), form());

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn create_employee_rejects_taken_login_email() {
        let mut repo = MockShopRepository::new();
        repo.expect_get_employee_by_phone().returning(|_, _| Ok(None));
        repo.expect_get_employee_by_login_email()
            .withf(|email, _| *email == "saraa@shop.mn")
            .returning(|_, hub| Ok(Some(sample_employee(8, hub, EmployeeRole::Cutter))));
        repo.expect_create_employee().never();

        let mut form = form();
        form.login_email = Some("Saraa@Shop.mn".to_string());
        let result = create_employee(&repo, &manager(), form);

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }

    #[test]
    fn modify_employee_keeps_own_phone() {
        let mut repo = MockShopRepository::new();
        repo.expect_get_employee_by_phone()
            .returning(|_, hub| Ok(Some(sample_employee(5, hub, EmployeeRole::Cutter))));
        repo.expect_update_employee()
            .withf(|id, hub, updates| *id == 5 && *hub == 7 && updates.role == EmployeeRole::Cutter)
            .returning(|id, hub, _| Ok(sample_employee(id, hub, EmployeeRole::Cutter)));

        assert!(modify_employee(&repo, &manager(), 5, form()).is_ok());
    }

    #[test]
    fn employee_detail_counts_assigned_orders() {
        let mut repo = MockShopRepository::new();
        repo.expect_get_employee_by_id()
            .returning(|id, hub| Ok(Some(sample_employee(id, hub, EmployeeRole::JacketSewer))));
        repo.expect_list_orders()
            .withf(|query| query.employee_id == Some(4))
            .returning(|query| {
                let rows: Vec<OrderWithCustomer> = (1..=25)
                    .map(|id| {
                        let status = if id % 5 == 0 {
                            OrderStatus::FINAL
                        } else {
                            OrderStatus::CutterCutting
                        };
                        OrderWithCustomer {
                            order: sample_order(id, query.hub_id, status),
                            customer: sample_customer(1, query.hub_id),
                        }
                    })
                    .collect();
                Ok((rows.len(), rows))
            });
        repo.expect_list_employee_scores()
            .returning(|_| Ok(vec![5, 4]));

        let data = load_employee_detail(&repo, &manager(), 4).expect("detail loads");

        assert_eq!(data.total_orders, 25);
        assert_eq!(data.completed_orders, 5);
        assert_eq!(data.in_progress_orders, 20);
        assert_eq!(data.recent_orders.len(), RECENT_ORDERS_LIMIT);
        assert_eq!(data.rating.average, Some(4.5));
    }
}
