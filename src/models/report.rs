use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::report::{NewReport as DomainNewReport, Report as DomainReport, ReportType};
use crate::models::decode_choice;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reports)]
pub struct Report {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub report_type: String,
    pub description: Option<String>,
    pub data: String,
    pub created_by: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reports)]
pub struct NewReport<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub report_type: &'a str,
    pub description: Option<&'a str>,
    pub data: String,
    pub created_by: Option<&'a str>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl From<Report> for DomainReport {
    fn from(value: Report) -> Self {
        let data = serde_json::from_str(&value.data).unwrap_or_else(|err| {
            log::warn!("Malformed data in report {}: {err}", value.id);
            serde_json::Value::Null
        });

        Self {
            id: value.id,
            hub_id: value.hub_id,
            title: value.title,
            report_type: decode_choice(&value.report_type, ReportType::default()),
            description: value.description,
            data,
            created_by: value.created_by,
            period_start: value.period_start,
            period_end: value.period_end,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewReport> for NewReport<'a> {
    fn from(value: &'a DomainNewReport) -> Self {
        Self {
            hub_id: value.hub_id,
            title: value.title.as_str(),
            report_type: value.report_type.as_str(),
            description: value.description.as_deref(),
            data: value.data.to_string(),
            created_by: value.created_by.as_deref(),
            period_start: value.period_start,
            period_end: value.period_end,
        }
    }
}
