use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::employee::{
        Employee as DomainEmployee, EmployeeListQuery, EmployeeRole,
        NewEmployee as DomainNewEmployee, UpdateEmployee as DomainUpdateEmployee,
    },
    models::decode_choice,
    models::employee::{
        Employee as DbEmployee, NewEmployee as DbNewEmployee, UpdateEmployee as DbUpdateEmployee,
    },
    repository::{DieselRepository, EmployeeReader, EmployeeWriter, page_bounds},
    schema::employees,
};

fn filtered_employees(query: &EmployeeListQuery) -> employees::BoxedQuery<'static, Sqlite> {
    let mut items = employees::table
        .filter(employees::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(
            employees::first_name
                .like(pattern.clone())
                .or(employees::last_name.like(pattern.clone()))
                .or(employees::phone.like(pattern)),
        );
    }

    if let Some(role) = query.role {
        items = items.filter(employees::role.eq(role.as_str()));
    }

    if let Some(roles) = query.roles.as_ref() {
        let codes: Vec<&'static str> = roles.iter().map(|role| role.as_str()).collect();
        items = items.filter(employees::role.eq_any(codes));
    }

    if query.active_only {
        items = items.filter(employees::is_active.eq(true));
    }

    items
}

impl EmployeeReader for DieselRepository {
    fn get_employee_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainEmployee>> {
        let mut conn = self.conn()?;
        let employee = employees::table
            .filter(employees::id.eq(id))
            .filter(employees::hub_id.eq(hub_id))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        Ok(employee.map(Into::into))
    }

    fn get_employee_by_phone(
        &self,
        phone: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainEmployee>> {
        let mut conn = self.conn()?;
        let employee = employees::table
            .filter(employees::phone.eq(phone))
            .filter(employees::hub_id.eq(hub_id))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        Ok(employee.map(Into::into))
    }

    fn get_employee_by_login_email(
        &self,
        email: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainEmployee>> {
        let normalized_email = email.to_lowercase();

        let mut conn = self.conn()?;
        let employee = employees::table
            .filter(employees::login_email.eq(normalized_email))
            .filter(employees::hub_id.eq(hub_id))
            .first::<DbEmployee>(&mut conn)
            .optional()?;

        Ok(employee.map(Into::into))
    }

    fn list_employees(
        &self,
        query: EmployeeListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainEmployee>)> {
        let mut conn = self.conn()?;

        let total = filtered_employees(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_employees(&query).order((
            employees::last_name.asc(),
            employees::first_name.asc(),
            employees::id.asc(),
        ));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_employees = items.load::<DbEmployee>(&mut conn)?;

        Ok((total, db_employees.into_iter().map(Into::into).collect()))
    }

    fn list_employee_roles(&self, hub_id: i32) -> RepositoryResult<Vec<(EmployeeRole, bool)>> {
        let mut conn = self.conn()?;
        let rows = employees::table
            .filter(employees::hub_id.eq(hub_id))
            .select((employees::role, employees::is_active))
            .load::<(String, bool)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(role, is_active)| (decode_choice(&role, EmployeeRole::ShirtSewer), is_active))
            .collect())
    }
}

impl EmployeeWriter for DieselRepository {
    fn create_employee(
        &self,
        new_employee: &DomainNewEmployee,
    ) -> RepositoryResult<DomainEmployee> {
        let mut conn = self.conn()?;
        let db_new = DbNewEmployee::from(new_employee);

        let created = diesel::insert_into(employees::table)
            .values(&db_new)
            .get_result::<DbEmployee>(&mut conn)?;

        Ok(created.into())
    }

    fn update_employee(
        &self,
        employee_id: i32,
        hub_id: i32,
        updates: &DomainUpdateEmployee,
    ) -> RepositoryResult<DomainEmployee> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateEmployee::from(updates);

        let target = employees::table
            .filter(employees::id.eq(employee_id))
            .filter(employees::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbEmployee>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    fn delete_employee(&self, employee_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{employee_ratings, order_status_history, orders};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let exists = employees::table
                .filter(employees::id.eq(employee_id))
                .filter(employees::hub_id.eq(hub_id))
                .select(employees::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            diesel::update(orders::table.filter(orders::assigned_tailor_id.eq(employee_id)))
                .set(orders::assigned_tailor_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::update(orders::table.filter(orders::assigned_cutter_id.eq(employee_id)))
                .set(orders::assigned_cutter_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::update(
                orders::table.filter(orders::assigned_trouser_maker_id.eq(employee_id)),
            )
            .set(orders::assigned_trouser_maker_id.eq(None::<i32>))
            .execute(conn)?;

            diesel::update(
                order_status_history::table
                    .filter(order_status_history::completed_by.eq(employee_id)),
            )
            .set(order_status_history::completed_by.eq(None::<i32>))
            .execute(conn)?;

            diesel::delete(
                employee_ratings::table.filter(employee_ratings::employee_id.eq(employee_id)),
            )
            .execute(conn)?;

            diesel::delete(employees::table.filter(employees::id.eq(employee_id)))
                .execute(conn)?;

            Ok(())
        })
    }
}
