use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::OrderStatus;
use crate::domain::order_status_history::{
    NewOrderStatusHistory as DomainNewOrderStatusHistory,
    OrderStatusHistory as DomainOrderStatusHistory,
};
use crate::models::decode_choice;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::order_status_history,
    belongs_to(super::order::Order, foreign_key = order_id)
)]
pub struct OrderStatusHistory {
    pub id: i32,
    pub order_id: i32,
    pub status: String,
    pub completed_by: Option<i32>,
    pub completed_at: NaiveDateTime,
    pub notes: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_status_history)]
pub struct NewOrderStatusHistory<'a> {
    pub order_id: i32,
    pub status: &'a str,
    pub completed_by: Option<i32>,
    pub completed_at: NaiveDateTime,
    pub notes: Option<&'a str>,
}

impl From<OrderStatusHistory> for DomainOrderStatusHistory {
    fn from(value: OrderStatusHistory) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            status: decode_choice(&value.status, OrderStatus::default()),
            completed_by: value.completed_by,
            completed_at: value.completed_at,
            notes: value.notes,
        }
    }
}

impl<'a> From<&'a DomainNewOrderStatusHistory> for NewOrderStatusHistory<'a> {
    fn from(value: &'a DomainNewOrderStatusHistory) -> Self {
        Self {
            order_id: value.order_id,
            status: value.status.as_str(),
            completed_by: value.completed_by,
            completed_at: value.completed_at,
            notes: value.notes.as_deref(),
        }
    }
}
