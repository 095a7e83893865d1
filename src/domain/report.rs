use std::collections::HashMap;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::customer::Province;
use crate::domain::employee::Employee;
use crate::domain::money::percent_change;
use crate::domain::order::Order;
use crate::domain::{ChoiceOption, UnknownChoice};

/// Number of employees listed in the period summary.
pub const TOP_EMPLOYEES: usize = 3;

/// Customers with an order within this many days count as active.
pub const ACTIVE_CUSTOMER_DAYS: i64 = 90;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    OrdersSummary,
    EmployeePerformance,
    CustomerAnalysis,
    MaterialUsage,
    FinancialSummary,
}

impl ReportType {
    pub const ALL: [ReportType; 5] = [
        ReportType::OrdersSummary,
        ReportType::EmployeePerformance,
        ReportType::CustomerAnalysis,
        ReportType::MaterialUsage,
        ReportType::FinancialSummary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::OrdersSummary => "orders_summary",
            ReportType::EmployeePerformance => "employee_performance",
            ReportType::CustomerAnalysis => "customer_analysis",
            ReportType::MaterialUsage => "material_usage",
            ReportType::FinancialSummary => "financial_summary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportType::OrdersSummary => "Orders summary",
            ReportType::EmployeePerformance => "Employee performance",
            ReportType::CustomerAnalysis => "Customer analysis",
            ReportType::MaterialUsage => "Material usage",
            ReportType::FinancialSummary => "Financial summary",
        }
    }

    pub fn options() -> Vec<ChoiceOption> {
        Self::ALL
            .iter()
            .map(|value| ChoiceOption {
                code: value.as_str(),
                label: value.label(),
            })
            .collect()
    }
}

impl FromStr for ReportType {
    type Err = UnknownChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownChoice::new("report type", value))
    }
}

/// Reporting window selected on the reports page.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    #[default]
    ThisMonth,
    Quarter,
    ThisYear,
    AllTime,
    Custom,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 5] = [
        ReportPeriod::ThisMonth,
        ReportPeriod::Quarter,
        ReportPeriod::ThisYear,
        ReportPeriod::AllTime,
        ReportPeriod::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportPeriod::ThisMonth => "this_month",
            ReportPeriod::Quarter => "quarter",
            ReportPeriod::ThisYear => "this_year",
            ReportPeriod::AllTime => "all_time",
            ReportPeriod::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportPeriod::ThisMonth => "This month",
            ReportPeriod::Quarter => "This quarter",
            ReportPeriod::ThisYear => "This year",
            ReportPeriod::AllTime => "All time",
            ReportPeriod::Custom => "Custom range",
        }
    }

    pub fn options() -> Vec<ChoiceOption> {
        Self::ALL
            .iter()
            .map(|value| ChoiceOption {
                code: value.as_str(),
                label: value.label(),
            })
            .collect()
    }

    /// Date range covered by the period as of `today`.
    ///
    /// A custom period without both bounds falls back to the current month.
    pub fn range(self, today: NaiveDate, custom: Option<(NaiveDate, NaiveDate)>) -> DateRange {
        let start = match self {
            ReportPeriod::ThisMonth => Some(month_start(today)),
            ReportPeriod::Quarter => {
                let quarter_month = (today.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), quarter_month, 1)
            }
            ReportPeriod::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            ReportPeriod::AllTime => None,
            ReportPeriod::Custom => match custom {
                Some((start, end)) => {
                    return DateRange {
                        start: Some(start),
                        end,
                    };
                }
                None => Some(month_start(today)),
            },
        };

        DateRange { start, end: today }
    }

    /// Comparison window preceding `current`, if the period has one.
    pub fn previous_range(self, current: &DateRange) -> Option<DateRange> {
        let start = current.start?;
        let end = start - Duration::days(1);
        let previous_start = match self {
            ReportPeriod::ThisMonth => previous_month_start(start),
            ReportPeriod::Quarter => start - Duration::days(90),
            ReportPeriod::ThisYear => NaiveDate::from_ymd_opt(start.year() - 1, 1, 1)?,
            ReportPeriod::AllTime | ReportPeriod::Custom => return None,
        };
        Some(DateRange {
            start: Some(previous_start),
            end,
        })
    }
}

impl FromStr for ReportPeriod {
    type Err = UnknownChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownChoice::new("report period", value))
    }
}

/// Inclusive date range, unbounded at the start when `start` is `None`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && date <= self.end
    }

    /// Start used when a concrete date must be stored, e.g. on a saved report.
    pub fn start_or(&self, fallback: NaiveDate) -> NaiveDate {
        self.start.unwrap_or(fallback)
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn previous_month_start(date: NaiveDate) -> NaiveDate {
    let start = month_start(date);
    let (year, month) = if start.month() == 1 {
        (start.year() - 1, 12)
    } else {
        (start.year(), start.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(start)
}

/// Saved report with its JSON snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub report_type: ReportType,
    pub description: Option<String>,
    pub data: serde_json::Value,
    /// Email of the user who created the report.
    pub created_by: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub hub_id: i32,
    pub title: String,
    pub report_type: ReportType,
    pub description: Option<String>,
    pub data: serde_json::Value,
    pub created_by: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl NewReport {
    #[must_use]
    pub fn new(
        hub_id: i32,
        title: impl Into<String>,
        report_type: ReportType,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Self {
        Self {
            hub_id,
            title: title.into(),
            report_type,
            description: None,
            data: serde_json::Value::Object(serde_json::Map::new()),
            created_by: None,
            period_start,
            period_end,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn created_by(mut self, email: impl Into<String>) -> Self {
        self.created_by = Some(email.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReportListQuery {
    pub hub_id: i32,
    /// Matched against title and description.
    pub search: Option<String>,
    pub report_type: Option<ReportType>,
    pub pagination: Option<Pagination>,
}

impl ReportListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            report_type: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn report_type(mut self, report_type: ReportType) -> Self {
        self.report_type = Some(report_type);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Raw counters for one reporting window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeriodMetrics {
    /// Orders created in the window.
    pub orders: usize,
    /// Sum of totals of orders created in the window, any status.
    pub revenue_cents: i64,
    pub completed: usize,
    pub overdue: usize,
    pub new_customers: usize,
    /// Mean days from start to completion of finished orders.
    pub avg_completion_days: Option<f64>,
}

/// Period counters together with their change against the previous window.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PeriodSummary {
    pub metrics: PeriodMetrics,
    pub completion_rate: f64,
    pub order_change_percent: f64,
    pub revenue_change_percent: f64,
    pub customers_change_percent: f64,
}

impl PeriodSummary {
    /// A missing previous window compares against zero.
    pub fn compare(current: PeriodMetrics, previous: Option<&PeriodMetrics>) -> Self {
        let zero = PeriodMetrics::default();
        let previous = previous.unwrap_or(&zero);

        let completion_rate = if current.orders > 0 {
            current.completed as f64 / current.orders as f64 * 100.0
        } else {
            0.0
        };

        Self {
            completion_rate,
            order_change_percent: percent_change(current.orders as f64, previous.orders as f64),
            revenue_change_percent: percent_change(
                current.revenue_cents as f64,
                previous.revenue_cents as f64,
            ),
            customers_change_percent: percent_change(
                current.new_customers as f64,
                previous.new_customers as f64,
            ),
            metrics: current,
        }
    }
}

/// Assigned-order counters of one active employee.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmployeeWorkload {
    pub employee_id: i32,
    pub name: String,
    pub role_label: &'static str,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl EmployeeWorkload {
    /// Counts the orders each employee is assigned to in any slot, busiest first.
    pub fn tally(employees: &[Employee], orders: &[Order], today: NaiveDate) -> Vec<Self> {
        let mut workload: Vec<Self> = employees
            .iter()
            .filter(|employee| employee.is_active)
            .map(|employee| {
                let assigned = orders
                    .iter()
                    .filter(|order| order.assigned_employee_ids().contains(&employee.id));
                let mut entry = Self {
                    employee_id: employee.id,
                    name: employee.full_name(),
                    role_label: employee.role.label(),
                    active: 0,
                    completed: 0,
                    overdue: 0,
                };
                for order in assigned {
                    if order.is_finished() {
                        entry.completed += 1;
                    } else {
                        entry.active += 1;
                        if order.is_overdue(today) {
                            entry.overdue += 1;
                        }
                    }
                }
                entry
            })
            .collect();

        workload.sort_by(|a, b| b.active.cmp(&a.active).then_with(|| a.name.cmp(&b.name)));
        workload
    }
}

/// Completed assigned orders of one employee.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmployeePerformance {
    pub employee_id: i32,
    pub name: String,
    pub role_label: &'static str,
    pub completed: usize,
}

impl EmployeePerformance {
    /// Active employees with at least one finished order, best first.
    pub fn top(employees: &[Employee], orders: &[Order], limit: usize) -> Vec<Self> {
        let mut ranking: Vec<Self> = employees
            .iter()
            .filter(|employee| employee.is_active)
            .map(|employee| Self {
                employee_id: employee.id,
                name: employee.full_name(),
                role_label: employee.role.label(),
                completed: orders
                    .iter()
                    .filter(|order| order.is_finished())
                    .filter(|order| order.assigned_employee_ids().contains(&employee.id))
                    .count(),
            })
            .filter(|entry| entry.completed > 0)
            .collect();

        ranking.sort_by(|a, b| b.completed.cmp(&a.completed).then_with(|| a.name.cmp(&b.name)));
        ranking.truncate(limit);
        ranking
    }
}

/// Activity of customers from one province.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProvinceStats {
    pub province: Province,
    pub label: &'static str,
    pub customers: usize,
    pub orders: usize,
    pub revenue_cents: i64,
}

impl ProvinceStats {
    /// Groups customer provinces and `(province, order total)` rows.
    ///
    /// Provinces without any activity are left out.
    pub fn tally(customers: &[Province], orders: &[(Province, i32)]) -> Vec<Self> {
        fn slot(map: &mut HashMap<Province, ProvinceStats>, province: Province) -> &mut ProvinceStats {
            map.entry(province).or_insert_with(|| ProvinceStats {
                province,
                label: province.label(),
                customers: 0,
                orders: 0,
                revenue_cents: 0,
            })
        }

        let mut by_province: HashMap<Province, Self> = HashMap::new();
        for province in customers {
            slot(&mut by_province, *province).customers += 1;
        }
        for (province, amount) in orders {
            let stats = slot(&mut by_province, *province);
            stats.orders += 1;
            stats.revenue_cents += i64::from(*amount);
        }

        let mut stats: Vec<Self> = Province::ALL
            .iter()
            .filter_map(|province| by_province.remove(province))
            .collect();
        stats.sort_by(|a, b| {
            b.revenue_cents
                .cmp(&a.revenue_cents)
                .then_with(|| b.customers.cmp(&a.customers))
        });
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::EmployeeRole;
    use crate::domain::order::{ItemType, OrderStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee(id: i32, name: &str, is_active: bool) -> Employee {
        Employee {
            id,
            hub_id: 1,
            first_name: name.to_string(),
            last_name: String::new(),
            phone: format!("9911{id:04}"),
            role: EmployeeRole::ShirtSewer,
            is_active,
            login_email: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn order(id: i32, tailor: Option<i32>, status: OrderStatus, due: NaiveDate) -> Order {
        Order {
            id,
            hub_id: 1,
            order_number: format!("ORD-202503-{id:03}"),
            customer_id: 1,
            item_type: ItemType::CasualShirt,
            material_code: None,
            assigned_tailor_id: tailor,
            assigned_cutter_id: None,
            assigned_trouser_maker_id: None,
            total_amount_cents: 100,
            advance_amount_cents: 0,
            status,
            start_date: date(2025, 3, 1),
            due_date: due,
            completed_date: None,
            notes: None,
            is_rated: false,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn periods_cover_expected_ranges() {
        let today = date(2025, 5, 20);

        let month = ReportPeriod::ThisMonth.range(today, None);
        assert_eq!(month, DateRange::new(date(2025, 5, 1), today));
        assert_eq!(
            ReportPeriod::ThisMonth.previous_range(&month),
            Some(DateRange::new(date(2025, 4, 1), date(2025, 4, 30)))
        );

        let quarter = ReportPeriod::Quarter.range(today, None);
        assert_eq!(quarter.start, Some(date(2025, 4, 1)));

        let year = ReportPeriod::ThisYear.range(today, None);
        assert_eq!(
            ReportPeriod::ThisYear.previous_range(&year),
            Some(DateRange::new(date(2024, 1, 1), date(2024, 12, 31)))
        );

        let all = ReportPeriod::AllTime.range(today, None);
        assert_eq!(all.start, None);
        assert_eq!(ReportPeriod::AllTime.previous_range(&all), None);
    }

    #[test]
    fn custom_period_without_dates_is_this_month() {
        let today = date(2025, 1, 9);
        assert_eq!(
            ReportPeriod::Custom.range(today, None),
            DateRange::new(date(2025, 1, 1), today)
        );
        assert_eq!(previous_month_start(today), date(2024, 12, 1));
    }

    #[test]
    fn summary_compares_against_zero_baseline() {
        let current = PeriodMetrics {
            orders: 4,
            revenue_cents: 1_000,
            completed: 1,
            new_customers: 0,
            ..PeriodMetrics::default()
        };

        let summary = PeriodSummary::compare(current, None);

        assert_eq!(summary.completion_rate, 25.0);
        assert_eq!(summary.order_change_percent, 100.0);
        assert_eq!(summary.revenue_change_percent, 100.0);
        assert_eq!(summary.customers_change_percent, 0.0);
    }

    #[test]
    fn workload_and_ranking_count_assigned_orders() {
        let today = date(2025, 3, 20);
        let employees = vec![employee(1, "Bat", true), employee(2, "Dorj", false)];
        let orders = vec![
            order(1, Some(1), OrderStatus::CutterCutting, date(2025, 3, 10)),
            order(2, Some(1), OrderStatus::SeamstressFinished, date(2025, 3, 10)),
            order(3, Some(2), OrderStatus::SeamstressFinished, date(2025, 3, 10)),
        ];

        let workload = EmployeeWorkload::tally(&employees, &orders, today);
        assert_eq!(workload.len(), 1);
        assert_eq!(workload[0].active, 1);
        assert_eq!(workload[0].overdue, 1);
        assert_eq!(workload[0].completed, 1);

        let top = EmployeePerformance::top(&employees, &orders, TOP_EMPLOYEES);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].employee_id, 1);
    }

    #[test]
    fn province_tally_groups_rows() {
        let stats = ProvinceStats::tally(
            &[Province::Ulaanbaatar, Province::Darkhan, Province::Darkhan],
            &[(Province::Darkhan, 500), (Province::Darkhan, 250)],
        );

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].province, Province::Darkhan);
        assert_eq!(stats[0].customers, 2);
        assert_eq!(stats[0].orders, 2);
        assert_eq!(stats[0].revenue_cents, 750);
    }
}
