use chrono::NaiveDate;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::report::{ReportPeriod, ReportType};
use crate::forms::{FieldError, optional_text, parse_choice, sanitize_inline_text};

const TITLE_MAX_LEN: u64 = 200;
const DESCRIPTION_MAX_LEN: u64 = 2048;

/// Result type returned by the report form helpers.
pub type ReportFormResult<T> = Result<T, ReportFormError>;

/// Errors that can occur while processing report forms.
#[derive(Debug, Error)]
pub enum ReportFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("report title cannot be empty")]
    EmptyTitle,
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("period end cannot be before its start")]
    EndBeforeStart,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Normalized request to generate and store a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub title: String,
    pub report_type: ReportType,
    pub period: ReportPeriod,
    /// Both bounds of a custom period, when supplied.
    pub custom_range: Option<(NaiveDate, NaiveDate)>,
    pub description: Option<String>,
}

/// Payload of the "new report" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddReportForm {
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    pub report_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub end_date: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

impl AddReportForm {
    pub fn into_request(self) -> ReportFormResult<ReportRequest> {
        self.validate()?;

        let title = sanitize_inline_text(&self.title);
        if title.is_empty() {
            return Err(ReportFormError::EmptyTitle);
        }

        let report_type: ReportType = parse_choice(Some(self.report_type.as_str()))?;
        let period: ReportPeriod = parse_choice(self.period.as_deref())?;
        let custom_range =
            parse_custom_range(self.start_date.as_deref(), self.end_date.as_deref())?;

        Ok(ReportRequest {
            title,
            report_type,
            period,
            custom_range,
            description: optional_text(self.description.as_deref(), true),
        })
    }
}

/// Parses the optional bounds of a custom period; only a complete pair is kept.
pub fn parse_custom_range(
    start: Option<&str>,
    end: Option<&str>,
) -> ReportFormResult<Option<(NaiveDate, NaiveDate)>> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ReportFormError::EndBeforeStart),
        (Some(start), Some(end)) => Ok(Some((start, end))),
        _ => Ok(None),
    }
}

fn parse_date(raw: Option<&str>) -> ReportFormResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ReportFormError::InvalidDate(value.to_string())),
        None => Ok(None),
    }
}
