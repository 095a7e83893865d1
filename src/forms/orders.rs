use chrono::NaiveDate;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{ItemType, NewOrder, UpdateOrder};
use crate::domain::rating::{NewEmployeeRating, NewOrderRating, RATING_RANGE};
use crate::forms::{
    FieldError, optional_text, parse_amount_cents, parse_choice, parse_optional_amount_cents,
    sanitize_inline_text,
};

const MATERIAL_CODE_MAX_LEN: u64 = 50;
const NOTES_MAX_LEN: u64 = 4096;
const COMMENT_MAX_LEN: u64 = 2048;

/// Result type returned by the order form helpers.
pub type OrderFormResult<T> = Result<T, OrderFormError>;

/// Errors that can occur while processing order and rating forms.
#[derive(Debug, Error)]
pub enum OrderFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("invalid {field} `{value}`")]
    InvalidIdentifier { field: &'static str, value: String },
    #[error("due date cannot be before the start date")]
    DueBeforeStart,
    #[error("advance cannot exceed the order total")]
    AdvanceExceedsTotal,
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Payload of the add/edit order forms.
#[derive(Debug, Deserialize, Validate)]
pub struct OrderForm {
    #[validate(range(min = 1))]
    pub customer_id: i32,
    pub item_type: String,
    #[validate(length(max = MATERIAL_CODE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub material_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub assigned_tailor_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub assigned_cutter_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub assigned_trouser_maker_id: Option<String>,
    pub total_amount: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub advance_amount: Option<String>,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(length(max = NOTES_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
}

impl OrderForm {
    /// Validates and sanitizes the payload into a domain `NewOrder`.
    pub fn into_new_order(self, hub_id: i32) -> OrderFormResult<NewOrder> {
        self.validate()?;

        if self.due_date < self.start_date {
            return Err(OrderFormError::DueBeforeStart);
        }

        let item_type: ItemType = parse_choice(Some(self.item_type.as_str()))?;
        let total = parse_amount_cents("total amount", &self.total_amount)?;
        let advance = parse_optional_amount_cents("advance amount", self.advance_amount.as_deref())?;
        if advance > total {
            return Err(OrderFormError::AdvanceExceedsTotal);
        }

        let tailor_id = parse_optional_id(self.assigned_tailor_id.as_deref(), "tailor")?;
        let cutter_id = parse_optional_id(self.assigned_cutter_id.as_deref(), "cutter")?;
        let trouser_maker_id =
            parse_optional_id(self.assigned_trouser_maker_id.as_deref(), "trouser maker")?;

        let mut order = NewOrder::new(
            hub_id,
            self.customer_id,
            item_type,
            self.start_date,
            self.due_date,
        )
        .with_assignments(tailor_id, cutter_id, trouser_maker_id)
        .with_amounts(total, advance);

        if let Some(code) = self
            .material_code
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|code| !code.is_empty())
        {
            order = order.with_material_code(code);
        }
        if let Some(notes) = optional_text(self.notes.as_deref(), true) {
            order = order.with_notes(notes);
        }

        Ok(order)
    }

    /// Validates and sanitizes the payload into a domain `UpdateOrder`.
    pub fn into_update_order(self, hub_id: i32) -> OrderFormResult<UpdateOrder> {
        self.into_new_order(hub_id).map(UpdateOrder::from)
    }

    /// Employees referenced by the assignment slots.
    pub fn assigned_ids(&self) -> Vec<i32> {
        [
            &self.assigned_tailor_id,
            &self.assigned_cutter_id,
            &self.assigned_trouser_maker_id,
        ]
        .into_iter()
        .filter_map(|raw| raw.as_deref().and_then(|value| value.trim().parse::<i32>().ok()))
        .filter(|id| *id > 0)
        .collect()
    }
}

/// Payload of the "rate employee" form on the order page.
#[derive(Debug, Deserialize, Validate)]
pub struct RateEmployeeForm {
    #[validate(range(min = 1))]
    pub employee_id: i32,
    pub rating: i32,
    #[validate(length(max = COMMENT_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub comment: Option<String>,
}

impl RateEmployeeForm {
    pub fn into_new_rating(self, order_id: i32) -> OrderFormResult<NewEmployeeRating> {
        self.validate()?;
        check_score(self.rating)?;

        let mut rating = NewEmployeeRating::new(order_id, self.employee_id, self.rating);
        if let Some(comment) = optional_text(self.comment.as_deref(), true) {
            rating = rating.with_comment(comment);
        }

        Ok(rating)
    }
}

/// Payload of the customer feedback form for a whole order.
#[derive(Debug, Deserialize, Validate)]
pub struct RateOrderForm {
    pub overall_rating: i32,
    pub quality_rating: i32,
    pub service_rating: i32,
    pub timing_rating: i32,
    #[validate(length(max = COMMENT_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub comments: Option<String>,
}

impl RateOrderForm {
    pub fn into_new_rating(self, order_id: i32) -> OrderFormResult<NewOrderRating> {
        self.validate()?;
        for score in [
            self.overall_rating,
            self.quality_rating,
            self.service_rating,
            self.timing_rating,
        ] {
            check_score(score)?;
        }

        Ok(NewOrderRating {
            order_id,
            overall_rating: self.overall_rating,
            quality_rating: self.quality_rating,
            service_rating: self.service_rating,
            timing_rating: self.timing_rating,
            comments: optional_text(self.comments.as_deref(), true),
        })
    }
}

fn check_score(score: i32) -> OrderFormResult<()> {
    if RATING_RANGE.contains(&score) {
        Ok(())
    } else {
        Err(OrderFormError::RatingOutOfRange)
    }
}

fn parse_optional_id(value: Option<&str>, field: &'static str) -> OrderFormResult<Option<i32>> {
    let Some(trimmed) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    match trimmed.parse::<i32>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        Ok(_) => Ok(None),
        Err(_) => Err(OrderFormError::InvalidIdentifier {
            field,
            value: trimmed.to_string(),
        }),
    }
}
