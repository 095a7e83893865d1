use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::employee::{
    Employee as DomainEmployee, EmployeeRole, NewEmployee as DomainNewEmployee,
    UpdateEmployee as DomainUpdateEmployee,
};
use crate::models::decode_choice;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::employees)]
pub struct Employee {
    pub id: i32,
    pub hub_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: String,
    pub is_active: bool,
    pub login_email: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::employees)]
pub struct NewEmployee<'a> {
    pub hub_id: i32,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub role: &'a str,
    pub is_active: bool,
    pub login_email: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::employees)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateEmployee<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub role: &'a str,
    pub is_active: bool,
    pub login_email: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Employee> for DomainEmployee {
    fn from(value: Employee) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            role: decode_choice(&value.role, EmployeeRole::ShirtSewer),
            is_active: value.is_active,
            login_email: value.login_email,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewEmployee> for NewEmployee<'a> {
    fn from(value: &'a DomainNewEmployee) -> Self {
        Self {
            hub_id: value.hub_id,
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            phone: value.phone.as_str(),
            role: value.role.as_str(),
            is_active: value.is_active,
            login_email: value.login_email.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateEmployee> for UpdateEmployee<'a> {
    fn from(value: &'a DomainUpdateEmployee) -> Self {
        Self {
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            phone: value.phone.as_str(),
            role: value.role.as_str(),
            is_active: value.is_active,
            login_email: value.login_email.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
