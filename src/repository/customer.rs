use chrono::NaiveDate;
use diesel::dsl::count_distinct;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::customer::{
        Customer as DomainCustomer, CustomerListQuery, CustomerSummary, CustomerType,
        NewCustomer as DomainNewCustomer, UpdateCustomer as DomainUpdateCustomer,
    },
    models::customer::{
        Customer as DbCustomer, NewCustomer as DbNewCustomer, UpdateCustomer as DbUpdateCustomer,
    },
    repository::{CustomerReader, CustomerWriter, DieselRepository, day_start, page_bounds},
    schema::customers,
};

fn filtered_customers(query: &CustomerListQuery) -> customers::BoxedQuery<'static, Sqlite> {
    let mut items = customers::table
        .filter(customers::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(
            customers::first_name
                .like(pattern.clone())
                .or(customers::last_name.like(pattern.clone()))
                .or(customers::phone.like(pattern.clone()))
                .or(customers::email.like(pattern).assume_not_null()),
        );
    }

    if let Some(phone) = query.phone.as_ref() {
        items = items.filter(customers::phone.like(format!("%{}%", phone)));
    }

    if let Some(customer_type) = query.customer_type {
        items = items.filter(customers::customer_type.eq(customer_type.as_str()));
    }

    items
}

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainCustomer>> {
        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::id.eq(id))
            .filter(customers::hub_id.eq(hub_id))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn get_customer_by_phone(
        &self,
        phone: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCustomer>> {
        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::phone.eq(phone))
            .filter(customers::hub_id.eq(hub_id))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCustomer>)> {
        let mut conn = self.conn()?;

        let total = filtered_customers(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_customers(&query).order((customers::created_at.desc(), customers::id.desc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_customers = items.load::<DbCustomer>(&mut conn)?;

        Ok((total, db_customers.into_iter().map(Into::into).collect()))
    }

    fn customer_summary(
        &self,
        hub_id: i32,
        month_start: NaiveDate,
    ) -> RepositoryResult<CustomerSummary> {
        let mut conn = self.conn()?;

        let types = customers::table
            .filter(customers::hub_id.eq(hub_id))
            .select(customers::customer_type)
            .load::<String>(&mut conn)?;

        let vip = types
            .iter()
            .filter(|value| value.as_str() == CustomerType::Vip.as_str())
            .count();

        let created_this_month = customers::table
            .filter(customers::hub_id.eq(hub_id))
            .filter(customers::created_at.ge(day_start(month_start)))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        Ok(CustomerSummary {
            total: types.len(),
            vip,
            regular: types.len() - vip,
            created_this_month,
        })
    }

    fn count_active_customers(&self, hub_id: i32, since: NaiveDate) -> RepositoryResult<usize> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let active = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::created_at.ge(day_start(since)))
            .select(count_distinct(orders::customer_id))
            .get_result::<i64>(&mut conn)?;

        Ok(active as usize)
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(
        &self,
        new_customer: &DomainNewCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        let mut conn = self.conn()?;
        let db_new = DbNewCustomer::from(new_customer);

        let created = diesel::insert_into(customers::table)
            .values(&db_new)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(created.into())
    }

    fn update_customer(
        &self,
        customer_id: i32,
        hub_id: i32,
        updates: &DomainUpdateCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateCustomer::from(updates);

        let target = customers::table
            .filter(customers::id.eq(customer_id))
            .filter(customers::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbCustomer>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    fn delete_customer(&self, customer_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = customers::table
            .filter(customers::id.eq(customer_id))
            .filter(customers::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
