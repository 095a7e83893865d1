use chrono::Local;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, CustomerListQuery, CustomerSummary, CustomerType};
use crate::domain::order::OrderListQuery;
use crate::domain::report::month_start;
use crate::forms::customers::CustomerForm;
use crate::repository::{CustomerReader, CustomerWriter, OrderReader};
use crate::services::orders::OrderView;
use crate::services::{ServiceError, ServiceResult, ensure_access, non_blank};

/// Query parameters accepted by the customers index page.
#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    /// Name, phone or email fragment.
    pub search: Option<String>,
    pub customer_type: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Customer with the labels templates print next to it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    pub full_name: String,
    pub province_label: &'static str,
    pub customer_type_label: &'static str,
}

impl From<Customer> for CustomerView {
    fn from(customer: Customer) -> Self {
        Self {
            full_name: customer.full_name(),
            province_label: customer.province.label(),
            customer_type_label: customer.customer_type.label(),
            customer,
        }
    }
}

/// Data required to render the customers index template.
pub struct CustomersPageData {
    pub customers: Paginated<CustomerView>,
    pub summary: CustomerSummary,
    pub search: Option<String>,
    pub customer_type: Option<CustomerType>,
}

/// Loads the paginated customer list, newest first.
pub fn load_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CustomersQuery,
) -> ServiceResult<CustomersPageData>
where
    R: CustomerReader + ?Sized,
{
    ensure_access(user)?;

    let page = query.page.unwrap_or(1);
    let search = non_blank(query.search);
    let customer_type =
        non_blank(query.customer_type).and_then(|code| code.parse::<CustomerType>().ok());

    let mut list_query =
        CustomerListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(customer_type) = customer_type {
        list_query = list_query.customer_type(customer_type);
    }

    let (total, customers) = repo.list_customers(list_query).map_err(ServiceError::from)?;
    let summary = repo
        .customer_summary(user.hub_id, month_start(Local::now().date_naive()))
        .map_err(ServiceError::from)?;

    let items = customers.into_iter().map(CustomerView::from).collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(CustomersPageData {
        customers: Paginated::new(items, page, total_pages),
        summary,
        search,
        customer_type,
    })
}

/// Data required to render the customer detail template.
pub struct CustomerDetailData {
    pub customer: CustomerView,
    pub orders: Vec<OrderView>,
    pub total_orders: usize,
    pub completed_orders: usize,
    pub active_orders: usize,
}

/// Loads a customer with their order history, newest first.
pub fn load_customer_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<CustomerDetailData>
where
    R: CustomerReader + OrderReader + ?Sized,
{
    ensure_access(user)?;

    let customer = load_customer(repo, user, customer_id)?;

    let today = Local::now().date_naive();
    let (_, mut rows) = repo
        .list_orders(
            OrderListQuery::new(user.hub_id)
                .customer_id(customer.id)
                .today(today),
        )
        .map_err(ServiceError::from)?;
    rows.sort_by(|a, b| {
        b.order
            .created_at
            .cmp(&a.order.created_at)
            .then(b.order.id.cmp(&a.order.id))
    });

    let orders: Vec<OrderView> = rows
        .into_iter()
        .map(|row| OrderView::from_row(row, today))
        .collect();
    let completed_orders = orders.iter().filter(|view| view.order.is_finished()).count();

    Ok(CustomerDetailData {
        customer: CustomerView::from(customer),
        total_orders: orders.len(),
        active_orders: orders.len() - completed_orders,
        completed_orders,
        orders,
    })
}

/// Fetches one customer of the user's hub.
pub fn load_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    ensure_access(user)?;

    repo.get_customer_by_id(customer_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a customer, rejecting a phone already used in the hub.
pub fn create_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    ensure_access(user)?;

    let new_customer = form
        .into_new_customer(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_customer_by_phone(&new_customer.phone, user.hub_id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict);
    }

    repo.create_customer(&new_customer)
        .map_err(ServiceError::from)
}

/// Replaces the editable fields of a customer.
pub fn modify_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    ensure_access(user)?;

    let updates = form
        .into_update_customer(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let holder = repo
        .get_customer_by_phone(&updates.phone, user.hub_id)
        .map_err(ServiceError::from)?;
    if holder.is_some_and(|existing| existing.id != customer_id) {
        return Err(ServiceError::Conflict);
    }

    repo.update_customer(customer_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes a customer that has no orders.
pub fn remove_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<()>
where
    R: CustomerWriter + OrderReader + ?Sized,
{
    ensure_access(user)?;

    let (orders, _) = repo
        .list_orders(
            OrderListQuery::new(user.hub_id)
                .customer_id(customer_id)
                .paginate(1, 1),
        )
        .map_err(ServiceError::from)?;
    if orders > 0 {
        return Err(ServiceError::Conflict);
    }

    repo.delete_customer(customer_id, user.hub_id)
        .map_err(ServiceError::from)
}
