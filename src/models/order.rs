use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::order::{
    ItemType, NewOrder as DomainNewOrder, Order as DomainOrder, OrderStatus,
    UpdateOrder as DomainUpdateOrder,
};
use crate::models::decode_choice;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::orders,
    belongs_to(super::customer::Customer, foreign_key = customer_id)
)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    pub order_number: String,
    pub customer_id: i32,
    pub item_type: String,
    pub material_code: Option<String>,
    pub assigned_tailor_id: Option<i32>,
    pub assigned_cutter_id: Option<i32>,
    pub assigned_trouser_maker_id: Option<i32>,
    pub total_amount_cents: i32,
    pub advance_amount_cents: i32,
    pub status: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_rated: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub hub_id: i32,
    pub order_number: &'a str,
    pub customer_id: i32,
    pub item_type: &'a str,
    pub material_code: Option<&'a str>,
    pub assigned_tailor_id: Option<i32>,
    pub assigned_cutter_id: Option<i32>,
    pub assigned_trouser_maker_id: Option<i32>,
    pub total_amount_cents: i32,
    pub advance_amount_cents: i32,
    pub status: &'a str,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateOrder<'a> {
    pub customer_id: i32,
    pub item_type: &'a str,
    pub material_code: Option<&'a str>,
    pub assigned_tailor_id: Option<i32>,
    pub assigned_cutter_id: Option<i32>,
    pub assigned_trouser_maker_id: Option<i32>,
    pub total_amount_cents: i32,
    pub advance_amount_cents: i32,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Order> for DomainOrder {
    fn from(value: Order) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            order_number: value.order_number,
            customer_id: value.customer_id,
            item_type: decode_choice(&value.item_type, ItemType::default()),
            material_code: value.material_code,
            assigned_tailor_id: value.assigned_tailor_id,
            assigned_cutter_id: value.assigned_cutter_id,
            assigned_trouser_maker_id: value.assigned_trouser_maker_id,
            total_amount_cents: value.total_amount_cents,
            advance_amount_cents: value.advance_amount_cents,
            status: decode_choice(&value.status, OrderStatus::default()),
            start_date: value.start_date,
            due_date: value.due_date,
            completed_date: value.completed_date,
            notes: value.notes,
            is_rated: value.is_rated,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewOrder<'a> {
    pub fn from_domain(value: &'a DomainNewOrder, order_number: &'a str) -> Self {
        Self {
            hub_id: value.hub_id,
            order_number,
            customer_id: value.customer_id,
            item_type: value.item_type.as_str(),
            material_code: value.material_code.as_deref(),
            assigned_tailor_id: value.assigned_tailor_id,
            assigned_cutter_id: value.assigned_cutter_id,
            assigned_trouser_maker_id: value.assigned_trouser_maker_id,
            total_amount_cents: value.total_amount_cents,
            advance_amount_cents: value.advance_amount_cents,
            status: value.status.as_str(),
            start_date: value.start_date,
            due_date: value.due_date,
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateOrder> for UpdateOrder<'a> {
    fn from(value: &'a DomainUpdateOrder) -> Self {
        Self {
            customer_id: value.customer_id,
            item_type: value.item_type.as_str(),
            material_code: value.material_code.as_deref(),
            assigned_tailor_id: value.assigned_tailor_id,
            assigned_cutter_id: value.assigned_cutter_id,
            assigned_trouser_maker_id: value.assigned_trouser_maker_id,
            total_amount_cents: value.total_amount_cents,
            advance_amount_cents: value.advance_amount_cents,
            start_date: value.start_date,
            due_date: value.due_date,
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
