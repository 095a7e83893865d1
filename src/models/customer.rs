use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, CustomerType, NewCustomer as DomainNewCustomer, Province,
    UpdateCustomer as DomainUpdateCustomer,
};
use crate::models::decode_choice;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub id: i32,
    pub hub_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub province: String,
    pub customer_type: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer<'a> {
    pub hub_id: i32,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub province: &'a str,
    pub customer_type: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCustomer<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub province: &'a str,
    pub customer_type: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<Customer> for DomainCustomer {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            email: value.email,
            province: decode_choice(&value.province, Province::default()),
            customer_type: decode_choice(&value.customer_type, CustomerType::default()),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(value: &'a DomainNewCustomer) -> Self {
        Self {
            hub_id: value.hub_id,
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            phone: value.phone.as_str(),
            email: value.email.as_deref(),
            province: value.province.as_str(),
            customer_type: value.customer_type.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(value: &'a DomainUpdateCustomer) -> Self {
        Self {
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            phone: value.phone.as_str(),
            email: value.email.as_deref(),
            province: value.province.as_str(),
            customer_type: value.customer_type.as_str(),
            updated_at: value.updated_at,
        }
    }
}
