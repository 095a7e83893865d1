use std::collections::HashMap;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::repository::errors::RepositoryError;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, CustomerListQuery};
use crate::domain::employee::{Employee, EmployeeListQuery, EmployeeRole};
use crate::domain::money::{format_amount, input_amount};
use crate::domain::order::{
    ItemType, Order, OrderListQuery, OrderStatus, OrderSummary, OrderWithCustomer, StatusAdvance,
};
use crate::domain::order_status_history::{NewOrderStatusHistory, OrderStatusHistory};
use crate::domain::rating::{EmployeeRating, OrderRating};
use crate::domain::setting::OrderDefaults;
use crate::forms::orders::{OrderForm, RateEmployeeForm, RateOrderForm};
use crate::repository::{
    CustomerReader, EmployeeReader, OrderReader, OrderWriter, RatingReader, RatingWriter,
    SettingReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_access, non_blank};

/// Query parameters accepted by the orders index page.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Order number or customer name fragment.
    pub search: Option<String>,
    /// Status code, ignored when blank or unknown.
    pub status: Option<String>,
    /// Item type code, ignored when blank or unknown.
    pub item_type: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Query parameters accepted by the active orders page.
#[derive(Debug, Default, Deserialize)]
pub struct ActiveOrdersQuery {
    /// Fragment of the customer's phone.
    pub phone: Option<String>,
}

/// Order flattened together with everything templates print next to it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: String,
    pub customer_phone: String,
    pub status_label: &'static str,
    pub item_type_label: &'static str,
    pub is_overdue: bool,
    pub days_remaining: i64,
    pub progress_percent: u8,
    pub total_display: String,
    pub advance_display: String,
    pub remaining_display: String,
}

impl OrderView {
    pub fn new(order: Order, customer: Option<&Customer>, today: NaiveDate) -> Self {
        Self {
            customer_name: customer.map(Customer::full_name).unwrap_or_default(),
            customer_phone: customer
                .map(|customer| customer.phone.clone())
                .unwrap_or_default(),
            status_label: order.status.label(),
            item_type_label: order.item_type.label(),
            is_overdue: order.is_overdue(today),
            days_remaining: order.days_remaining(today),
            progress_percent: order.progress_percent(),
            total_display: format_amount(i64::from(order.total_amount_cents)),
            advance_display: format_amount(i64::from(order.advance_amount_cents)),
            remaining_display: format_amount(order.remaining_amount_cents()),
            order,
        }
    }

    pub fn from_row(row: OrderWithCustomer, today: NaiveDate) -> Self {
        let OrderWithCustomer { order, customer } = row;
        Self::new(order, Some(&customer), today)
    }
}

/// Data required to render the orders index template.
pub struct OrdersPageData {
    pub orders: Paginated<OrderView>,
    pub summary: OrderSummary,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub item_type: Option<ItemType>,
}

/// Loads the paginated order list with its summary counters.
pub fn load_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    ensure_access(user)?;

    let today = Local::now().date_naive();
    let page = query.page.unwrap_or(1);
    let search = non_blank(query.search);
    let status = non_blank(query.status).and_then(|code| code.parse::<OrderStatus>().ok());
    let item_type = non_blank(query.item_type).and_then(|code| code.parse::<ItemType>().ok());

    let mut list_query = OrderListQuery::new(user.hub_id)
        .today(today)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(status) = status {
        list_query = list_query.status(status);
    }
    if let Some(item_type) = item_type {
        list_query = list_query.item_type(item_type);
    }

    let (total, rows) = repo.list_orders(list_query).map_err(ServiceError::from)?;
    let summary = repo
        .order_summary(user.hub_id, today)
        .map_err(ServiceError::from)?;

    let items = rows
        .into_iter()
        .map(|row| OrderView::from_row(row, today))
        .collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(OrdersPageData {
        orders: Paginated::new(items, page, total_pages),
        summary,
        search,
        status,
        item_type,
    })
}

/// Data required to render the active orders template.
pub struct ActiveOrdersData {
    pub orders: Vec<OrderView>,
    pub total: usize,
    pub overdue: usize,
    pub phone: Option<String>,
}

/// Loads every unfinished order, overdue ones first.
pub fn load_active_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ActiveOrdersQuery,
) -> ServiceResult<ActiveOrdersData>
where
    R: OrderReader + ?Sized,
{
    ensure_access(user)?;

    let today = Local::now().date_naive();
    let phone = non_blank(query.phone);

    let mut list_query = OrderListQuery::new(user.hub_id).today(today).active_only();
    if let Some(phone) = phone.as_ref() {
        list_query = list_query.customer_phone(phone);
    }

    let (total, rows) = repo.list_orders(list_query).map_err(ServiceError::from)?;
    let orders: Vec<OrderView> = rows
        .into_iter()
        .map(|row| OrderView::from_row(row, today))
        .collect();
    let overdue = orders.iter().filter(|order| order.is_overdue).count();

    Ok(ActiveOrdersData {
        orders,
        total,
        overdue,
        phone,
    })
}

/// One stage of the production timeline.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StageView {
    pub code: &'static str,
    pub label: &'static str,
    pub completed: bool,
    pub current: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub completed_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryView {
    #[serde(flatten)]
    pub entry: OrderStatusHistory,
    pub status_label: &'static str,
    pub employee_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmployeeRatingView {
    #[serde(flatten)]
    pub rating: EmployeeRating,
    pub employee_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderRatingView {
    #[serde(flatten)]
    pub rating: OrderRating,
    pub average: f64,
}

/// Employee holding one of the three assignment slots.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssignmentView {
    pub slot: &'static str,
    pub employee: Employee,
}

/// Data required to render the order detail template.
pub struct OrderDetailData {
    pub order: OrderView,
    pub customer: Customer,
    pub assignments: Vec<AssignmentView>,
    pub timeline: Vec<StageView>,
    pub history: Vec<HistoryView>,
    pub employee_ratings: Vec<EmployeeRatingView>,
    pub order_rating: Option<OrderRatingView>,
    /// Assigned employees that can receive a rating.
    pub rateable_employees: Vec<Employee>,
    pub next_status: Option<OrderStatus>,
}

/// Loads an order with its timeline, history and ratings.
pub fn load_order_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<OrderDetailData>
where
    R: OrderReader + CustomerReader + EmployeeReader + RatingReader + ?Sized,
{
    ensure_access(user)?;

    let order = repo
        .get_order_by_id(order_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    let customer = repo
        .get_customer_by_id(order.customer_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let (_, employees) = repo
        .list_employees(EmployeeListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;
    let staff: HashMap<i32, &Employee> = employees
        .iter()
        .map(|employee| (employee.id, employee))
        .collect();
    let name_of = |id: Option<i32>| {
        id.and_then(|id| staff.get(&id))
            .map(|employee| employee.full_name())
    };

    let history = repo
        .list_status_history(order.id)
        .map_err(ServiceError::from)?;
    let timeline = build_timeline(order.status, &history, &name_of);
    let history: Vec<HistoryView> = history
        .into_iter()
        .map(|entry| HistoryView {
            status_label: entry.status.label(),
            employee_name: name_of(entry.completed_by),
            entry,
        })
        .collect();

    let assignments: Vec<AssignmentView> = [
        ("Tailor", order.assigned_tailor_id),
        ("Cutter", order.assigned_cutter_id),
        ("Trouser maker", order.assigned_trouser_maker_id),
    ]
    .into_iter()
    .filter_map(|(slot, id)| {
        id.and_then(|id| staff.get(&id)).map(|employee| AssignmentView {
            slot,
            employee: (*employee).clone(),
        })
    })
    .collect();

    let rateable_employees: Vec<Employee> = order
        .assigned_employee_ids()
        .into_iter()
        .filter_map(|id| staff.get(&id).map(|employee| (*employee).clone()))
        .collect();

    let employee_ratings = repo
        .list_order_employee_ratings(order.id)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|rating| EmployeeRatingView {
            employee_name: name_of(Some(rating.employee_id)).unwrap_or_default(),
            rating,
        })
        .collect();
    let order_rating = repo
        .get_order_rating(order.id)
        .map_err(ServiceError::from)?
        .map(|rating| OrderRatingView {
            average: rating.average(),
            rating,
        });

    let next_status = order.status.next();
    let today = Local::now().date_naive();

    Ok(OrderDetailData {
        order: OrderView::new(order, Some(&customer), today),
        customer,
        assignments,
        timeline,
        history,
        employee_ratings,
        order_rating,
        rateable_employees,
        next_status,
    })
}

/// Marks every stage before `current` as completed, each with its first history entry.
fn build_timeline(
    current: OrderStatus,
    history: &[OrderStatusHistory],
    name_of: &dyn Fn(Option<i32>) -> Option<String>,
) -> Vec<StageView> {
    OrderStatus::ALL
        .iter()
        .map(|stage| {
            let entry = history.iter().find(|entry| entry.status == *stage);
            StageView {
                code: stage.as_str(),
                label: stage.label(),
                completed: stage.index() < current.index() || current.is_final(),
                current: *stage == current,
                completed_at: entry.map(|entry| entry.completed_at),
                completed_by: entry.and_then(|entry| name_of(entry.completed_by)),
            }
        })
        .collect()
}

/// Values pre-filled into the order form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderFormValues {
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: String,
    pub advance_amount: String,
}

/// Data required to render the add/edit order form.
pub struct OrderFormData {
    /// Order being edited, `None` for a new one.
    pub order: Option<Order>,
    pub values: OrderFormValues,
    pub customers: Vec<Customer>,
    /// Active employees plus any inactive one still assigned to the order.
    pub employees: Vec<Employee>,
}

/// Loads the choices and initial values of the order form.
pub fn load_order_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: Option<i32>,
) -> ServiceResult<OrderFormData>
where
    R: OrderReader + CustomerReader + EmployeeReader + SettingReader + ?Sized,
{
    ensure_access(user)?;

    let order = match order_id {
        Some(id) => Some(
            repo.get_order_by_id(id, user.hub_id)
                .map_err(ServiceError::from)?
                .ok_or(ServiceError::NotFound)?,
        ),
        None => None,
    };

    let values = match order.as_ref() {
        Some(order) => OrderFormValues {
            start_date: order.start_date,
            due_date: order.due_date,
            total_amount: input_amount(i64::from(order.total_amount_cents)),
            advance_amount: input_amount(i64::from(order.advance_amount_cents)),
        },
        None => {
            let settings = repo
                .list_settings(user.hub_id)
                .map_err(ServiceError::from)?;
            new_order_values(
                OrderDefaults::from_settings(&settings),
                Local::now().date_naive(),
            )
        }
    };

    let (_, customers) = repo
        .list_customers(CustomerListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;

    let assigned = order
        .as_ref()
        .map(Order::assigned_employee_ids)
        .unwrap_or_default();
    let (_, employees) = repo
        .list_employees(EmployeeListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;
    let employees = employees
        .into_iter()
        .filter(|employee| employee.is_active || assigned.contains(&employee.id))
        .collect();

    Ok(OrderFormData {
        order,
        values,
        customers,
        employees,
    })
}

fn new_order_values(defaults: OrderDefaults, today: NaiveDate) -> OrderFormValues {
    OrderFormValues {
        start_date: today,
        due_date: today + Duration::days(defaults.duration_days),
        total_amount: defaults.amount.to_string(),
        advance_amount: "0".to_string(),
    }
}

/// Creates a new order under the next order number of the current month.
pub fn create_order<R>(repo: &R, user: &AuthenticatedUser, form: OrderForm) -> ServiceResult<Order>
where
    R: CustomerReader + EmployeeReader + OrderWriter + ?Sized,
{
    ensure_access(user)?;

    let employee_ids = form.assigned_ids();
    let new_order = form
        .into_new_order(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    check_references(repo, user.hub_id, new_order.customer_id, &employee_ids)?;

    let order = repo.create_order(&new_order).map_err(ServiceError::from)?;
    log::info!("order {} created in hub {}", order.order_number, user.hub_id);
    Ok(order)
}

/// Replaces the editable fields of an order.
pub fn modify_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    form: OrderForm,
) -> ServiceResult<Order>
where
    R: CustomerReader + EmployeeReader + OrderWriter + ?Sized,
{
    ensure_access(user)?;

    let employee_ids = form.assigned_ids();
    let updates = form
        .into_update_order(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    check_references(repo, user.hub_id, updates.customer_id, &employee_ids)?;

    repo.update_order(order_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes an order together with its history and ratings.
pub fn remove_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    ensure_access(user)?;

    repo.delete_order(order_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Rejects orders pointing at customers or employees of another hub.
fn check_references<R>(
    repo: &R,
    hub_id: i32,
    customer_id: i32,
    employee_ids: &[i32],
) -> ServiceResult<()>
where
    R: CustomerReader + EmployeeReader + ?Sized,
{
    if repo
        .get_customer_by_id(customer_id, hub_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::Form("Selected customer does not exist.".to_string()));
    }

    for employee_id in employee_ids {
        if repo
            .get_employee_by_id(*employee_id, hub_id)
            .map_err(ServiceError::from)?
            .is_none()
        {
            return Err(ServiceError::Form(
                "Selected employee does not exist.".to_string(),
            ));
        }
    }

    Ok(())
}

/// Completes the current stage of an order and moves it to the next one.
///
/// Orders at the final stage are returned unchanged.
pub fn advance_order_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
) -> ServiceResult<StatusAdvance>
where
    R: OrderReader + OrderWriter + EmployeeReader + ?Sized,
{
    ensure_access(user)?;

    let order = repo
        .get_order_by_id(order_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let current = order.status;
    let Some(next) = current.next() else {
        return Ok(StatusAdvance::AlreadyFinished(order));
    };

    let completed_by = resolve_completed_by(repo, user, current)?;
    let history = NewOrderStatusHistory::new(order.id, current).completed_by(completed_by);
    let completed_date = next.is_final().then(|| Local::now().date_naive());

    // The row is matched on its current status, a miss means a concurrent advance.
    let updated = repo
        .advance_order_status(user.hub_id, &history, next, completed_date)
        .map_err(|err| match err {
            RepositoryError::NotFound => ServiceError::Conflict,
            other => ServiceError::from(other),
        })?;

    log::info!(
        "order {} advanced from {} to {} by {}",
        updated.order_number,
        current.as_str(),
        next.as_str(),
        user.email
    );

    Ok(StatusAdvance::Advanced {
        order: updated,
        from: current,
    })
}

/// Roles credited with a stage when the acting user is not linked to an employee.
fn fallback_roles(stage: OrderStatus) -> &'static [EmployeeRole] {
    match stage {
        OrderStatus::CutterCutting => &[EmployeeRole::Cutter],
        OrderStatus::CustomerFirstFitting | OrderStatus::CustomerSecondFitting => &[],
        _ => &EmployeeRole::SEWERS,
    }
}

fn resolve_completed_by<R>(
    repo: &R,
    user: &AuthenticatedUser,
    stage: OrderStatus,
) -> ServiceResult<Option<i32>>
where
    R: EmployeeReader + ?Sized,
{
    if let Some(employee) = repo
        .get_employee_by_login_email(&user.email.to_lowercase(), user.hub_id)
        .map_err(ServiceError::from)?
    {
        return Ok(Some(employee.id));
    }

    let roles = fallback_roles(stage);
    if roles.is_empty() {
        return Ok(None);
    }

    let (_, employees) = repo
        .list_employees(
            EmployeeListQuery::new(user.hub_id)
                .any_role(roles.to_vec())
                .active_only()
                .paginate(1, 1),
        )
        .map_err(ServiceError::from)?;

    Ok(employees.first().map(|employee| employee.id))
}

/// Stores or replaces the rating of one employee on an order.
pub fn rate_employee<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    form: RateEmployeeForm,
) -> ServiceResult<EmployeeRating>
where
    R: OrderReader + EmployeeReader + RatingWriter + ?Sized,
{
    ensure_access(user)?;

    let rating = form
        .into_new_rating(order_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.get_order_by_id(order_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    repo.get_employee_by_id(rating.employee_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.upsert_employee_rating(&rating)
        .map_err(ServiceError::from)
}

/// Stores or replaces the customer feedback on an order.
pub fn rate_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    form: RateOrderForm,
) -> ServiceResult<OrderRating>
where
    R: OrderReader + RatingWriter + ?Sized,
{
    ensure_access(user)?;

    let rating = form
        .into_new_rating(order_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.get_order_by_id(order_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.upsert_order_rating(&rating)
        .map_err(ServiceError::from)
}
