use std::ops::RangeInclusive;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Accepted score range for every rating.
pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

/// Score given to one employee for their work on one order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeRating {
    pub id: i32,
    pub order_id: i32,
    pub employee_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Upsert payload keyed by `(order_id, employee_id)`.
#[derive(Debug, Clone)]
pub struct NewEmployeeRating {
    pub order_id: i32,
    pub employee_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

impl NewEmployeeRating {
    #[must_use]
    pub fn new(order_id: i32, employee_id: i32, rating: i32) -> Self {
        Self {
            order_id,
            employee_id,
            rating,
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Customer feedback for a whole order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

impl OrderRating {
    pub fn average(&self) -> f64 {
        f64::from(
            self.overall_rating + self.quality_rating + self.service_rating + self.timing_rating,
        ) / 4.0
    }
}

/// Upsert payload keyed by `order_id`.
#[derive(Debug, Clone)]
pub struct NewOrderRating {
    pub order_id: i32,
    pub overall_rating: i32,
    pub quality_rating: i32,
    pub service_rating: i32,
    pub timing_rating: i32,
    pub comments: Option<String>,
}

/// Average score of an employee across all their ratings.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct RatingStats {
    pub average: Option<f64>,
    pub count: usize,
}

impl RatingStats {
    pub fn from_scores(scores: &[i32]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let sum: i32 = scores.iter().sum();
        Self {
            average: Some(f64::from(sum) / scores.len() as f64),
            count: scores.len(),
        }
    }
}

pub fn is_valid_score(score: i32) -> bool {
    RATING_RANGE.contains(&score)
}
