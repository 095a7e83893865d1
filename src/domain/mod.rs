use thiserror::Error;

pub mod customer;
pub mod employee;
pub mod material;
pub mod money;
pub mod order;
pub mod order_status_history;
pub mod rating;
pub mod report;
pub mod setting;

/// Returned when a stored or submitted code does not match any fixed choice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownChoice {
    /// Human-readable name of the choice set, e.g. `order status`.
    pub kind: &'static str,
    /// Offending raw value.
    pub value: String,
}

impl UnknownChoice {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A `(code, label)` pair rendered in select boxes and filters.
#[derive(Debug, Clone, Copy, serde::Serialize, PartialEq, Eq)]
pub struct ChoiceOption {
    pub code: &'static str,
    pub label: &'static str,
}
