use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::rating::{
    EmployeeRating as DomainEmployeeRating, NewEmployeeRating as DomainNewEmployeeRating,
    NewOrderRating as DomainNewOrderRating, OrderRating as DomainOrderRating,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::employee_ratings,
    belongs_to(super::order::Order, foreign_key = order_id),
    belongs_to(super::employee::Employee, foreign_key = employee_id)
)]
pub struct EmployeeRating {
    pub id: i32,
    pub order_id: i32,
    pub employee_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::employee_ratings)]
#[diesel(treat_none_as_null = true)]
pub struct NewEmployeeRating<'a> {
    pub order_id: i32,
    pub employee_id: i32,
    pub rating: i32,
    pub comment: Option<&'a str>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::order_ratings,
    belongs_to(super::order::Order, foreign_key = order_id)
)]
pub struct OrderRating {
    pub id: i32,
    pub order_id: i32,
    pub overall_rating: i32,
    pub quality_rating: i32,
    pub service_rating: i32,
    pub timing_rating: i32,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::order_ratings)]
#[diesel(treat_none_as_null = true)]
pub struct NewOrderRating<'a> {
    pub order_id: i32,
    pub overall_rating: i32,
    pub quality_rating: i32,
    pub service_rating: i32,
    pub timing_rating: i32,
    pub comments: Option<&'a str>,
}

impl From<EmployeeRating> for DomainEmployeeRating {
    fn from(value: EmployeeRating) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            employee_id: value.employee_id,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewEmployeeRating> for NewEmployeeRating<'a> {
    fn from(value: &'a DomainNewEmployeeRating) -> Self {
        Self {
            order_id: value.order_id,
            employee_id: value.employee_id,
            rating: value.rating,
            comment: value.comment.as_deref(),
        }
    }
}

impl From<OrderRating> for DomainOrderRating {
    fn from(value: OrderRating) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            overall_rating: value.overall_rating,
            quality_rating: value.quality_rating,
            service_rating: value.service_rating,
            timing_rating: value.timing_rating,
            comments: value.comments,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewOrderRating> for NewOrderRating<'a> {
    fn from(value: &'a DomainNewOrderRating) -> Self {
        Self {
            order_id: value.order_id,
            overall_rating: value.overall_rating,
            quality_rating: value.quality_rating,
            service_rating: value.service_rating,
            timing_rating: value.timing_rating,
            comments: value.comments.as_deref(),
        }
    }
}
