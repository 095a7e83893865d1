use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::pagination::Pagination;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::customer::{
    Customer, CustomerListQuery, CustomerSummary, NewCustomer, UpdateCustomer,
};
use crate::domain::employee::{
    Employee, EmployeeListQuery, EmployeeRole, NewEmployee, UpdateEmployee,
};
use crate::domain::material::{Material, MaterialListQuery, NewMaterial, UpdateMaterial};
use crate::domain::order::{
    NewOrder, Order, OrderListQuery, OrderStatus, OrderSummary, OrderWithCustomer, UpdateOrder,
};
use crate::domain::order_status_history::{NewOrderStatusHistory, OrderStatusHistory};
use crate::domain::rating::{EmployeeRating, NewEmployeeRating, NewOrderRating, OrderRating};
use crate::domain::report::{DateRange, NewReport, PeriodMetrics, ProvinceStats, Report, ReportListQuery};
use crate::domain::setting::{NewSystemSetting, SystemSetting};

pub mod customer;
pub mod employee;
pub mod material;
pub mod order;
pub mod rating;
pub mod report;
pub mod setting;
pub mod stats;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// First instant of `date`.
pub(crate) fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Exclusive upper bound for timestamps falling on or before `date`.
pub(crate) fn day_after(date: NaiveDate) -> NaiveDateTime {
    day_start(date + Duration::days(1))
}

/// `(offset, limit)` of a page, clamped so huge page numbers fetch nothing.
pub(crate) fn page_bounds(pagination: &Pagination) -> (i64, i64) {
    let offset = pagination
        .page
        .max(1)
        .saturating_sub(1)
        .saturating_mul(pagination.per_page);
    let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
    (i64::try_from(offset).unwrap_or(i64::MAX), limit)
}

/// Read-only operations over customer records.
pub trait CustomerReader {
    fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Customer>>;
    fn get_customer_by_phone(&self, phone: &str, hub_id: i32) -> RepositoryResult<Option<Customer>>;
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
    /// Counts per customer type plus customers created since `month_start`.
    fn customer_summary(&self, hub_id: i32, month_start: NaiveDate) -> RepositoryResult<CustomerSummary>;
    /// Distinct customers with an order created on or after `since`.
    fn count_active_customers(&self, hub_id: i32, since: NaiveDate) -> RepositoryResult<usize>;
}

/// Write operations over customer records.
pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn update_customer(
        &self,
        customer_id: i32,
        hub_id: i32,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
    fn delete_customer(&self, customer_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over employee records.
pub trait EmployeeReader {
    fn get_employee_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Employee>>;
    fn get_employee_by_phone(&self, phone: &str, hub_id: i32) -> RepositoryResult<Option<Employee>>;
    fn get_employee_by_login_email(
        &self,
        email: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<Employee>>;
    fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)>;
    /// `(role, is_active)` of every employee in the hub.
    fn list_employee_roles(&self, hub_id: i32) -> RepositoryResult<Vec<(EmployeeRole, bool)>>;
}

/// Write operations over employee records.
pub trait EmployeeWriter {
    fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
    fn update_employee(
        &self,
        employee_id: i32,
        hub_id: i32,
        updates: &UpdateEmployee,
    ) -> RepositoryResult<Employee>;
    /// Removes the employee together with their assignments, attributions and ratings.
    fn delete_employee(&self, employee_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over orders and their status history.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderWithCustomer>)>;
    fn order_summary(&self, hub_id: i32, today: NaiveDate) -> RepositoryResult<OrderSummary>;
    fn list_status_history(&self, order_id: i32) -> RepositoryResult<Vec<OrderStatusHistory>>;
    /// `(material_code, is_finished)` of every order with a material code.
    fn list_material_codes(
        &self,
        hub_id: i32,
        search: Option<&str>,
    ) -> RepositoryResult<Vec<(String, bool)>>;
}

/// Write operations over orders.
pub trait OrderWriter {
    /// Stores the order under the next free number of its month.
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    fn update_order(
        &self,
        order_id: i32,
        hub_id: i32,
        updates: &UpdateOrder,
    ) -> RepositoryResult<Order>;
    /// Removes the order with its history and ratings.
    fn delete_order(&self, order_id: i32, hub_id: i32) -> RepositoryResult<()>;
    /// Records `history` and moves the order from `history.status` to `next`.
    fn advance_order_status(
        &self,
        hub_id: i32,
        history: &NewOrderStatusHistory,
        next: OrderStatus,
        completed_date: Option<NaiveDate>,
    ) -> RepositoryResult<Order>;
}

/// Read-only operations over ratings.
pub trait RatingReader {
    fn list_order_employee_ratings(&self, order_id: i32) -> RepositoryResult<Vec<EmployeeRating>>;
    fn get_order_rating(&self, order_id: i32) -> RepositoryResult<Option<OrderRating>>;
    /// Every score the employee has received.
    fn list_employee_scores(&self, employee_id: i32) -> RepositoryResult<Vec<i32>>;
}

/// Write operations over ratings.
pub trait RatingWriter {
    fn upsert_employee_rating(&self, rating: &NewEmployeeRating) -> RepositoryResult<EmployeeRating>;
    /// Stores the rating and marks the order as rated.
    fn upsert_order_rating(&self, rating: &NewOrderRating) -> RepositoryResult<OrderRating>;
}

/// Read-only operations over material records.
pub trait MaterialReader {
    fn get_material_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Material>>;
    fn list_materials(&self, query: MaterialListQuery) -> RepositoryResult<(usize, Vec<Material>)>;
}

/// Write operations over material records.
pub trait MaterialWriter {
    fn create_material(&self, new_material: &NewMaterial) -> RepositoryResult<Material>;
    fn update_material(
        &self,
        material_id: i32,
        hub_id: i32,
        updates: &UpdateMaterial,
    ) -> RepositoryResult<Material>;
    fn delete_material(&self, material_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over saved reports.
pub trait ReportReader {
    fn get_report_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Report>>;
    fn list_reports(&self, query: ReportListQuery) -> RepositoryResult<(usize, Vec<Report>)>;
}

/// Write operations over saved reports.
pub trait ReportWriter {
    fn create_report(&self, new_report: &NewReport) -> RepositoryResult<Report>;
    fn delete_report(&self, report_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over system settings.
pub trait SettingReader {
    fn list_settings(&self, hub_id: i32) -> RepositoryResult<Vec<SystemSetting>>;
}

/// Write operations over system settings.
pub trait SettingWriter {
    fn upsert_setting(&self, setting: &NewSystemSetting) -> RepositoryResult<SystemSetting>;
}

/// Aggregations backing the dashboard and reports.
pub trait StatsReader {
    fn period_metrics(
        &self,
        hub_id: i32,
        range: &DateRange,
        today: NaiveDate,
    ) -> RepositoryResult<PeriodMetrics>;
    /// Total of finished orders, by completion date when a range is given.
    fn completed_revenue(&self, hub_id: i32, range: Option<&DateRange>) -> RepositoryResult<i64>;
    fn province_activity(&self, hub_id: i32, range: &DateRange) -> RepositoryResult<Vec<ProvinceStats>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_start_at_first_page() {
        let bounds = page_bounds(&Pagination { page: 0, per_page: 20 });
        assert_eq!(bounds, (0, 20));

        let bounds = page_bounds(&Pagination { page: 3, per_page: 20 });
        assert_eq!(bounds, (40, 20));
    }

    #[test]
    fn page_bounds_clamp_huge_pages() {
        let bounds = page_bounds(&Pagination {
            page: usize::MAX,
            per_page: 20,
        });
        assert_eq!(bounds, (i64::MAX, 20));
    }
}
