use chrono::{Local, NaiveDate};
use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::order::{
        NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery, OrderStatus,
        OrderSummary, OrderWithCustomer, UpdateOrder as DomainUpdateOrder, next_order_number,
    },
    domain::order_status_history::{
        NewOrderStatusHistory as DomainNewOrderStatusHistory,
        OrderStatusHistory as DomainOrderStatusHistory,
    },
    models::customer::Customer as DbCustomer,
    models::order::{NewOrder as DbNewOrder, Order as DbOrder, UpdateOrder as DbUpdateOrder},
    models::order_status_history::{
        NewOrderStatusHistory as DbNewOrderStatusHistory,
        OrderStatusHistory as DbOrderStatusHistory,
    },
    repository::{DieselRepository, OrderReader, OrderWriter, page_bounds},
    schema::{customers, orders},
};

type OrderRows = IntoBoxed<'static, InnerJoin<orders::table, customers::table>, Sqlite>;

fn filtered_orders(query: &OrderListQuery) -> OrderRows {
    let mut items = orders::table
        .inner_join(customers::table)
        .filter(orders::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(status) = query.status {
        items = items.filter(orders::status.eq(status.as_str()));
    }

    if let Some(item_type) = query.item_type {
        items = items.filter(orders::item_type.eq(item_type.as_str()));
    }

    if let Some(customer_id) = query.customer_id {
        items = items.filter(orders::customer_id.eq(customer_id));
    }

    if let Some(employee_id) = query.employee_id {
        items = items.filter(
            orders::assigned_tailor_id
                .eq(employee_id)
                .or(orders::assigned_cutter_id.eq(employee_id))
                .or(orders::assigned_trouser_maker_id.eq(employee_id))
                .assume_not_null(),
        );
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(
            orders::order_number
                .like(pattern.clone())
                .or(customers::first_name.like(pattern.clone()))
                .or(customers::last_name.like(pattern)),
        );
    }

    if let Some(phone) = query.customer_phone.as_ref() {
        items = items.filter(customers::phone.like(format!("%{}%", phone)));
    }

    if query.active_only {
        items = items.filter(orders::status.ne(OrderStatus::FINAL.as_str()));
    }

    items
}

fn load_history(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> RepositoryResult<Vec<DomainOrderStatusHistory>> {
    use crate::schema::order_status_history;

    let rows = order_status_history::table
        .filter(order_status_history::order_id.eq(order_id))
        .order((
            order_status_history::completed_at.asc(),
            order_status_history::id.asc(),
        ))
        .load::<DbOrderStatusHistory>(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::hub_id.eq(hub_id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        Ok(order.map(Into::into))
    }

    fn list_orders(
        &self,
        query: OrderListQuery,
    ) -> RepositoryResult<(usize, Vec<OrderWithCustomer>)> {
        let mut conn = self.conn()?;

        let total = filtered_orders(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let overdue = orders::due_date
            .lt(query.today)
            .and(orders::status.ne(OrderStatus::FINAL.as_str()));

        let mut items = filtered_orders(&query).order((
            overdue.desc(),
            orders::created_at.desc(),
            orders::id.desc(),
        ));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .select((DbOrder::as_select(), DbCustomer::as_select()))
            .load::<(DbOrder, DbCustomer)>(&mut conn)?;

        let orders = rows
            .into_iter()
            .map(|(order, customer)| OrderWithCustomer {
                order: order.into(),
                customer: customer.into(),
            })
            .collect();

        Ok((total, orders))
    }

    fn order_summary(&self, hub_id: i32, today: NaiveDate) -> RepositoryResult<OrderSummary> {
        let mut conn = self.conn()?;
        let final_status = OrderStatus::FINAL.as_str();

        let total = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let completed = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::status.eq(final_status))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let overdue = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::status.ne(final_status))
            .filter(orders::due_date.lt(today))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let pending = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::status.eq(OrderStatus::OrderPlaced.as_str()))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        Ok(OrderSummary {
            total,
            active: total - completed,
            completed,
            overdue,
            pending,
        })
    }

    fn list_status_history(&self, order_id: i32) -> RepositoryResult<Vec<DomainOrderStatusHistory>> {
        let mut conn = self.conn()?;
        load_history(&mut conn, order_id)
    }

    fn list_material_codes(
        &self,
        hub_id: i32,
        search: Option<&str>,
    ) -> RepositoryResult<Vec<(String, bool)>> {
        let mut conn = self.conn()?;

        let mut items = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::material_code.is_not_null())
            .filter(orders::material_code.ne(""))
            .into_boxed::<Sqlite>();

        if let Some(term) = search {
            items = items.filter(orders::material_code.like(format!("%{}%", term)));
        }

        let rows = items
            .select((orders::material_code.assume_not_null(), orders::status))
            .order(orders::material_code.asc())
            .load::<(String, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(code, status)| (code, status == OrderStatus::FINAL.as_str()))
            .collect())
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let prefix = new_order.number_prefix();

            // As text `-999` sorts above `-1000`, so sequences are compared after parsing.
            let month_numbers = orders::table
                .filter(orders::hub_id.eq(new_order.hub_id))
                .filter(orders::order_number.like(format!("{prefix}%")))
                .select(orders::order_number)
                .load::<String>(conn)?;

            let order_number =
                next_order_number(&prefix, month_numbers.iter().map(String::as_str));
            let db_new = DbNewOrder::from_domain(new_order, &order_number);

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            Ok(created.into())
        })
    }

    fn update_order(
        &self,
        order_id: i32,
        hub_id: i32,
        updates: &DomainUpdateOrder,
    ) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateOrder::from(updates);

        let target = orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbOrder>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    fn delete_order(&self, order_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{employee_ratings, order_ratings, order_status_history};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let exists = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::hub_id.eq(hub_id))
                .select(orders::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                order_status_history::table.filter(order_status_history::order_id.eq(order_id)),
            )
            .execute(conn)?;
            diesel::delete(employee_ratings::table.filter(employee_ratings::order_id.eq(order_id)))
                .execute(conn)?;
            diesel::delete(order_ratings::table.filter(order_ratings::order_id.eq(order_id)))
                .execute(conn)?;
            diesel::delete(orders::table.filter(orders::id.eq(order_id))).execute(conn)?;

            Ok(())
        })
    }

    fn advance_order_status(
        &self,
        hub_id: i32,
        history: &DomainNewOrderStatusHistory,
        next: OrderStatus,
        completed_date: Option<NaiveDate>,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::order_status_history;

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            // Only move the order if it is still at the stage being recorded.
            let target = orders::table
                .filter(orders::id.eq(history.order_id))
                .filter(orders::hub_id.eq(hub_id))
                .filter(orders::status.eq(history.status.as_str()));

            let updated = diesel::update(target)
                .set((
                    orders::status.eq(next.as_str()),
                    orders::completed_date.eq(completed_date),
                    orders::updated_at.eq(Local::now().naive_utc()),
                ))
                .get_result::<DbOrder>(conn)
                .optional()?;

            let Some(updated) = updated else {
                return Err(RepositoryError::NotFound);
            };

            let db_history = DbNewOrderStatusHistory::from(history);
            diesel::insert_into(order_status_history::table)
                .values(&db_history)
                .execute(conn)?;

            Ok(updated.into())
        })
    }
}
