use chrono::{Duration, Local, NaiveDate};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::employee::{Employee, EmployeeListQuery, EmployeeSummary};
use crate::domain::material::{MaterialUsage, MaterialUsageSummary};
use crate::domain::money::{format_amount, percent_change};
use crate::domain::order::{Order, OrderListQuery, OrderStatus, OrderSummary};
use crate::domain::report::{
    ACTIVE_CUSTOMER_DAYS, DateRange, EmployeePerformance, EmployeeWorkload, NewReport,
    PeriodSummary, ProvinceStats, Report, ReportListQuery, ReportPeriod, ReportType,
    TOP_EMPLOYEES, month_start, previous_month_start,
};
use crate::forms::reports::{AddReportForm, parse_custom_range};
use crate::repository::{
    CustomerReader, EmployeeReader, OrderReader, ReportReader, ReportWriter, StatsReader,
};
use crate::services::orders::OrderView;
use crate::services::{ServiceError, ServiceResult, ensure_manager, non_blank};

/// Orders listed on the dashboard.
pub const DASHBOARD_RECENT_ORDERS: usize = 12;

/// Period selection shared by the report pages.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
    /// Start of a custom period, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// End of a custom period, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

impl PeriodQuery {
    /// Unknown periods and malformed dates fall back to the current month.
    fn resolve(&self) -> (ReportPeriod, Option<(NaiveDate, NaiveDate)>) {
        let period = self
            .period
            .as_deref()
            .map(str::trim)
            .and_then(|code| code.parse::<ReportPeriod>().ok())
            .unwrap_or_default();
        let custom = parse_custom_range(self.start_date.as_deref(), self.end_date.as_deref())
            .ok()
            .flatten();
        (period, custom)
    }
}

/// Query parameters accepted by the reports index page.
#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    /// Title or description fragment.
    pub search: Option<String>,
    pub report_type: Option<String>,
    #[serde(flatten)]
    pub period: PeriodQuery,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportView {
    #[serde(flatten)]
    pub report: Report,
    pub report_type_label: &'static str,
}

impl From<Report> for ReportView {
    fn from(report: Report) -> Self {
        Self {
            report_type_label: report.report_type.label(),
            report,
        }
    }
}

/// Period counters with their comparison, leaders and material usage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodOverview {
    pub period: ReportPeriod,
    pub period_label: &'static str,
    pub range: DateRange,
    pub summary: PeriodSummary,
    pub revenue_display: String,
    pub top_employees: Vec<EmployeePerformance>,
    pub materials: MaterialUsageSummary,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RevenueOverview {
    pub total_cents: i64,
    pub this_month_cents: i64,
    pub previous_month_cents: i64,
    pub change_percent: f64,
    pub total_display: String,
    pub this_month_display: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CustomerOverview {
    pub total: usize,
    /// Customers with an order in the last 90 days.
    pub active: usize,
    pub new_this_month: usize,
}

/// Data required to render the dashboard template.
pub struct DashboardData {
    pub recent_orders: Vec<OrderView>,
    pub orders: OrderSummary,
    pub revenue: RevenueOverview,
    pub customers: CustomerOverview,
    pub active_employees: usize,
    pub materials: MaterialUsageSummary,
}

/// Loads the manager dashboard.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: OrderReader + CustomerReader + EmployeeReader + StatsReader + ?Sized,
{
    ensure_manager(user)?;

    let today = Local::now().date_naive();
    let hub_id = user.hub_id;

    let (_, rows) = repo
        .list_orders(
            OrderListQuery::new(hub_id)
                .today(today)
                .paginate(1, DASHBOARD_RECENT_ORDERS),
        )
        .map_err(ServiceError::from)?;
    let recent_orders = rows
        .into_iter()
        .map(|row| OrderView::from_row(row, today))
        .collect();

    let orders = repo
        .order_summary(hub_id, today)
        .map_err(ServiceError::from)?;
    let revenue = revenue_overview(repo, hub_id, today)?;

    let this_month = month_start(today);
    let customer_summary = repo
        .customer_summary(hub_id, this_month)
        .map_err(ServiceError::from)?;
    let active_customers = repo
        .count_active_customers(hub_id, today - Duration::days(ACTIVE_CUSTOMER_DAYS))
        .map_err(ServiceError::from)?;

    let roles = repo
        .list_employee_roles(hub_id)
        .map_err(ServiceError::from)?;
    let materials = material_summary(repo, hub_id)?;

    Ok(DashboardData {
        recent_orders,
        orders,
        revenue,
        customers: CustomerOverview {
            total: customer_summary.total,
            active: active_customers,
            new_this_month: customer_summary.created_this_month,
        },
        active_employees: EmployeeSummary::from_roles(&roles).active,
        materials,
    })
}

fn revenue_overview<R>(repo: &R, hub_id: i32, today: NaiveDate) -> ServiceResult<RevenueOverview>
where
    R: StatsReader + ?Sized,
{
    let this_month = DateRange::new(month_start(today), today);
    let previous_month = DateRange::new(
        previous_month_start(today),
        month_start(today) - Duration::days(1),
    );

    let total_cents = repo
        .completed_revenue(hub_id, None)
        .map_err(ServiceError::from)?;
    let this_month_cents = repo
        .completed_revenue(hub_id, Some(&this_month))
        .map_err(ServiceError::from)?;
    let previous_month_cents = repo
        .completed_revenue(hub_id, Some(&previous_month))
        .map_err(ServiceError::from)?;

    Ok(RevenueOverview {
        total_cents,
        this_month_cents,
        previous_month_cents,
        change_percent: percent_change(this_month_cents as f64, previous_month_cents as f64),
        total_display: format_amount(total_cents),
        this_month_display: format_amount(this_month_cents),
    })
}

fn material_summary<R>(repo: &R, hub_id: i32) -> ServiceResult<MaterialUsageSummary>
where
    R: OrderReader + ?Sized,
{
    let rows = repo
        .list_material_codes(hub_id, None)
        .map_err(ServiceError::from)?;
    Ok(MaterialUsageSummary::from_usage(&MaterialUsage::from_rows(
        &rows,
    )))
}

/// Every order of the hub.
fn hub_orders<R>(repo: &R, hub_id: i32, today: NaiveDate) -> ServiceResult<Vec<Order>>
where
    R: OrderReader + ?Sized,
{
    let (_, rows) = repo
        .list_orders(OrderListQuery::new(hub_id).today(today))
        .map_err(ServiceError::from)?;
    Ok(rows.into_iter().map(|row| row.order).collect())
}

fn hub_employees<R>(repo: &R, hub_id: i32) -> ServiceResult<Vec<Employee>>
where
    R: EmployeeReader + ?Sized,
{
    let (_, employees) = repo
        .list_employees(EmployeeListQuery::new(hub_id))
        .map_err(ServiceError::from)?;
    Ok(employees)
}

/// Builds the period summary shown on the reports page.
fn period_overview<R>(
    repo: &R,
    hub_id: i32,
    period: ReportPeriod,
    custom: Option<(NaiveDate, NaiveDate)>,
    today: NaiveDate,
) -> ServiceResult<PeriodOverview>
where
    R: StatsReader + OrderReader + EmployeeReader + ?Sized,
{
    let range = period.range(today, custom);
    let current = repo
        .period_metrics(hub_id, &range, today)
        .map_err(ServiceError::from)?;
    let previous = period
        .previous_range(&range)
        .map(|previous| repo.period_metrics(hub_id, &previous, today))
        .transpose()
        .map_err(ServiceError::from)?;
    let summary = PeriodSummary::compare(current, previous.as_ref());

    let employees = hub_employees(repo, hub_id)?;
    let orders = hub_orders(repo, hub_id, today)?;

    Ok(PeriodOverview {
        period,
        period_label: period.label(),
        range,
        revenue_display: format_amount(summary.metrics.revenue_cents),
        summary,
        top_employees: EmployeePerformance::top(&employees, &orders, TOP_EMPLOYEES),
        materials: material_summary(repo, hub_id)?,
    })
}

/// Data required to render the reports index template.
pub struct ReportsPageData {
    pub reports: Paginated<ReportView>,
    pub overview: PeriodOverview,
    pub search: Option<String>,
    pub report_type: Option<ReportType>,
}

/// Loads saved reports together with the summary of the selected period.
pub fn load_reports<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ReportsQuery,
) -> ServiceResult<ReportsPageData>
where
    R: ReportReader + StatsReader + OrderReader + EmployeeReader + ?Sized,
{
    ensure_manager(user)?;

    let page = query.page.unwrap_or(1);
    let search = non_blank(query.search);
    let report_type =
        non_blank(query.report_type).and_then(|code| code.parse::<ReportType>().ok());

    let mut list_query = ReportListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(report_type) = report_type {
        list_query = list_query.report_type(report_type);
    }

    let (total, reports) = repo.list_reports(list_query).map_err(ServiceError::from)?;
    let items = reports.into_iter().map(ReportView::from).collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    let (period, custom) = query.period.resolve();
    let overview = period_overview(
        repo,
        user.hub_id,
        period,
        custom,
        Local::now().date_naive(),
    )?;

    Ok(ReportsPageData {
        reports: Paginated::new(items, page, total_pages),
        overview,
        search,
        report_type,
    })
}

/// Assigned-order counters of every active employee, busiest first.
pub fn load_employee_workload<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<EmployeeWorkload>>
where
    R: EmployeeReader + OrderReader + ?Sized,
{
    ensure_manager(user)?;

    let today = Local::now().date_naive();
    let employees = hub_employees(repo, user.hub_id)?;
    let orders = hub_orders(repo, user.hub_id, today)?;

    Ok(EmployeeWorkload::tally(&employees, &orders, today))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProvinceRow {
    #[serde(flatten)]
    pub stats: ProvinceStats,
    pub revenue_display: String,
}

/// Data required to render the province breakdown template.
pub struct ProvinceBreakdownData {
    pub period: ReportPeriod,
    pub range: DateRange,
    pub provinces: Vec<ProvinceRow>,
    pub total_customers: usize,
    pub total_orders: usize,
    pub total_revenue_display: String,
}

/// Customers, orders and revenue per province for the selected period.
pub fn load_province_breakdown<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PeriodQuery,
) -> ServiceResult<ProvinceBreakdownData>
where
    R: StatsReader + ?Sized,
{
    ensure_manager(user)?;

    let (period, custom) = query.resolve();
    let range = period.range(Local::now().date_naive(), custom);
    let stats = repo
        .province_activity(user.hub_id, &range)
        .map_err(ServiceError::from)?;

    let total_customers = stats.iter().map(|row| row.customers).sum();
    let total_orders = stats.iter().map(|row| row.orders).sum();
    let total_revenue: i64 = stats.iter().map(|row| row.revenue_cents).sum();

    let provinces = stats
        .into_iter()
        .map(|stats| ProvinceRow {
            revenue_display: format_amount(stats.revenue_cents),
            stats,
        })
        .collect();

    Ok(ProvinceBreakdownData {
        period,
        range,
        provinces,
        total_customers,
        total_orders,
        total_revenue_display: format_amount(total_revenue),
    })
}

/// Generates the snapshot for the requested type and period and stores it.
pub fn create_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddReportForm,
) -> ServiceResult<Report>
where
    R: ReportWriter + StatsReader + OrderReader + EmployeeReader + CustomerReader + ?Sized,
{
    ensure_manager(user)?;

    let request = form
        .into_request()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let today = Local::now().date_naive();
    let hub_id = user.hub_id;
    let range = request.period.range(today, request.custom_range);
    let orders = hub_orders(repo, hub_id, today)?;
    let in_range: Vec<Order> = orders
        .iter()
        .filter(|order| range.contains(order.created_at.date()))
        .cloned()
        .collect();

    let data = match request.report_type {
        ReportType::OrdersSummary => {
            let current = repo
                .period_metrics(hub_id, &range, today)
                .map_err(ServiceError::from)?;
            let previous = request
                .period
                .previous_range(&range)
                .map(|previous| repo.period_metrics(hub_id, &previous, today))
                .transpose()
                .map_err(ServiceError::from)?;
            let by_status: Vec<_> = OrderStatus::ALL
                .iter()
                .map(|status| {
                    json!({
                        "status": status,
                        "label": status.label(),
                        "count": in_range.iter().filter(|order| order.status == *status).count(),
                    })
                })
                .collect();
            json!({
                "summary": PeriodSummary::compare(current, previous.as_ref()),
                "by_status": by_status,
            })
        }
        ReportType::EmployeePerformance => {
            let employees = hub_employees(repo, hub_id)?;
            json!({
                "workload": EmployeeWorkload::tally(&employees, &in_range, today),
                "top_employees": EmployeePerformance::top(&employees, &in_range, TOP_EMPLOYEES),
            })
        }
        ReportType::CustomerAnalysis => {
            let summary = repo
                .customer_summary(hub_id, month_start(today))
                .map_err(ServiceError::from)?;
            let active = repo
                .count_active_customers(hub_id, today - Duration::days(ACTIVE_CUSTOMER_DAYS))
                .map_err(ServiceError::from)?;
            let provinces = repo
                .province_activity(hub_id, &range)
                .map_err(ServiceError::from)?;
            json!({
                "summary": summary,
                "active_customers": active,
                "provinces": provinces,
            })
        }
        ReportType::MaterialUsage => {
            let rows: Vec<(String, bool)> = in_range
                .iter()
                .filter_map(|order| {
                    order
                        .material_code
                        .clone()
                        .map(|code| (code, order.is_finished()))
                })
                .collect();
            let usage = MaterialUsage::from_rows(&rows);
            json!({
                "summary": MaterialUsageSummary::from_usage(&usage),
                "usage": usage,
            })
        }
        ReportType::FinancialSummary => {
            let completed = repo
                .completed_revenue(hub_id, Some(&range))
                .map_err(ServiceError::from)?;
            let ordered: i64 = in_range
                .iter()
                .map(|order| i64::from(order.total_amount_cents))
                .sum();
            let advances: i64 = in_range
                .iter()
                .map(|order| i64::from(order.advance_amount_cents))
                .sum();
            let outstanding: i64 = in_range
                .iter()
                .filter(|order| !order.is_finished())
                .map(Order::remaining_amount_cents)
                .sum();
            json!({
                "ordered_cents": ordered,
                "completed_revenue_cents": completed,
                "advance_cents": advances,
                "outstanding_cents": outstanding,
            })
        }
    };

    let period_start = range.start.unwrap_or_else(|| {
        orders
            .iter()
            .map(|order| order.created_at.date())
            .min()
            .unwrap_or(range.end)
    });

    let mut new_report = NewReport::new(
        hub_id,
        request.title,
        request.report_type,
        period_start,
        range.end,
    )
    .with_data(data)
    .created_by(user.email.clone());
    if let Some(description) = request.description {
        new_report = new_report.with_description(description);
    }

    let report = repo
        .create_report(&new_report)
        .map_err(ServiceError::from)?;
    log::info!(
        "report {} ({}) created by {}",
        report.id,
        report.report_type.as_str(),
        user.email
    );
    Ok(report)
}

/// Data required to render the report detail template.
pub struct ReportDetailData {
    pub report: ReportView,
    /// Snapshot rendered for display.
    pub data_pretty: String,
}

pub fn load_report_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    report_id: i32,
) -> ServiceResult<ReportDetailData>
where
    R: ReportReader + ?Sized,
{
    ensure_manager(user)?;

    let report = repo
        .get_report_by_id(report_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    let data_pretty = serde_json::to_string_pretty(&report.data).unwrap_or_default();

    Ok(ReportDetailData {
        report: ReportView::from(report),
        data_pretty,
    })
}

pub fn remove_report<R>(repo: &R, user: &AuthenticatedUser, report_id: i32) -> ServiceResult<()>
where
    R: ReportWriter + ?Sized,
{
    ensure_manager(user)?;

    repo.delete_report(report_id, user.hub_id)
        .map_err(ServiceError::from)
}
