use chrono::NaiveDate;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::customer::Province,
    domain::order::OrderStatus,
    domain::report::{DateRange, PeriodMetrics, ProvinceStats},
    models::decode_choice,
    repository::{DieselRepository, StatsReader, day_after, day_start},
    schema::{customers, orders},
};

/// Orders of the hub created inside `range`.
fn orders_created_in(hub_id: i32, range: &DateRange) -> orders::BoxedQuery<'static, Sqlite> {
    let mut items = orders::table
        .filter(orders::hub_id.eq(hub_id))
        .filter(orders::created_at.lt(day_after(range.end)))
        .into_boxed::<Sqlite>();

    if let Some(start) = range.start {
        items = items.filter(orders::created_at.ge(day_start(start)));
    }

    items
}

fn customers_created_in(hub_id: i32, range: &DateRange) -> customers::BoxedQuery<'static, Sqlite> {
    let mut items = customers::table
        .filter(customers::hub_id.eq(hub_id))
        .filter(customers::created_at.lt(day_after(range.end)))
        .into_boxed::<Sqlite>();

    if let Some(start) = range.start {
        items = items.filter(customers::created_at.ge(day_start(start)));
    }

    items
}

impl StatsReader for DieselRepository {
    fn period_metrics(
        &self,
        hub_id: i32,
        range: &DateRange,
        today: NaiveDate,
    ) -> RepositoryResult<PeriodMetrics> {
        let mut conn = self.conn()?;
        let final_status = OrderStatus::FINAL.as_str();

        let orders_count = orders_created_in(hub_id, range)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let revenue_cents = orders_created_in(hub_id, range)
            .select(sum(orders::total_amount_cents))
            .first::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        let completed = orders_created_in(hub_id, range)
            .filter(orders::status.eq(final_status))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let overdue = orders_created_in(hub_id, range)
            .filter(orders::status.ne(final_status))
            .filter(orders::due_date.lt(today))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let new_customers = customers_created_in(hub_id, range)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let durations = orders_created_in(hub_id, range)
            .filter(orders::status.eq(final_status))
            .filter(orders::completed_date.is_not_null())
            .select((orders::start_date, orders::completed_date.assume_not_null()))
            .load::<(NaiveDate, NaiveDate)>(&mut conn)?;

        let avg_completion_days = if durations.is_empty() {
            None
        } else {
            let total_days: i64 = durations
                .iter()
                .map(|(start, completed)| (*completed - *start).num_days())
                .sum();
            Some(total_days as f64 / durations.len() as f64)
        };

        Ok(PeriodMetrics {
            orders: orders_count,
            revenue_cents,
            completed,
            overdue,
            new_customers,
            avg_completion_days,
        })
    }

    fn completed_revenue(&self, hub_id: i32, range: Option<&DateRange>) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;

        let mut items = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::status.eq(OrderStatus::FINAL.as_str()))
            .into_boxed::<Sqlite>();

        if let Some(range) = range {
            items = items.filter(orders::completed_date.le(range.end));
            if let Some(start) = range.start {
                items = items.filter(orders::completed_date.ge(start));
            }
        }

        let revenue = items
            .select(sum(orders::total_amount_cents))
            .first::<Option<i64>>(&mut conn)?;

        Ok(revenue.unwrap_or(0))
    }

    fn province_activity(
        &self,
        hub_id: i32,
        range: &DateRange,
    ) -> RepositoryResult<Vec<ProvinceStats>> {
        let mut conn = self.conn()?;

        let customer_provinces = customers_created_in(hub_id, range)
            .select(customers::province)
            .load::<String>(&mut conn)?
            .iter()
            .map(|raw| decode_choice(raw, Province::default()))
            .collect::<Vec<_>>();

        let mut order_rows = orders::table
            .inner_join(customers::table)
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::created_at.lt(day_after(range.end)))
            .into_boxed::<Sqlite>();
        if let Some(start) = range.start {
            order_rows = order_rows.filter(orders::created_at.ge(day_start(start)));
        }

        let order_provinces = order_rows
            .select((customers::province, orders::total_amount_cents))
            .load::<(String, i32)>(&mut conn)?
            .iter()
            .map(|(raw, amount)| (decode_choice(raw, Province::default()), *amount))
            .collect::<Vec<_>>();

        Ok(ProvinceStats::tally(&customer_provinces, &order_provinces))
    }
}
