use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::order::OrderStatus;

/// Append-only record of a completed production stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderStatusHistory {
    pub id: i32,
    pub order_id: i32,
    /// Stage that was completed.
    pub status: OrderStatus,
    /// Employee credited with the stage, if any.
    pub completed_by: Option<i32>,
    pub completed_at: NaiveDateTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrderStatusHistory {
    pub order_id: i32,
    pub status: OrderStatus,
    pub completed_by: Option<i32>,
    pub completed_at: NaiveDateTime,
    pub notes: Option<String>,
}

impl NewOrderStatusHistory {
    #[must_use]
    pub fn new(order_id: i32, status: OrderStatus) -> Self {
        Self {
            order_id,
            status,
            completed_by: None,
            completed_at: Local::now().naive_utc(),
            notes: Some(format!("Stage completed: {}", status.label())),
        }
    }

    #[must_use]
    pub fn completed_by(mut self, employee_id: Option<i32>) -> Self {
        self.completed_by = employee_id;
        self
    }
}
