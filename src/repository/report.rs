use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::report::{NewReport as DomainNewReport, Report as DomainReport, ReportListQuery},
    models::report::{NewReport as DbNewReport, Report as DbReport},
    repository::{DieselRepository, ReportReader, ReportWriter, page_bounds},
    schema::reports,
};

fn filtered_reports(query: &ReportListQuery) -> reports::BoxedQuery<'static, Sqlite> {
    let mut items = reports::table
        .filter(reports::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(
            reports::title
                .like(pattern.clone())
                .or(reports::description.like(pattern).assume_not_null()),
        );
    }

    if let Some(report_type) = query.report_type {
        items = items.filter(reports::report_type.eq(report_type.as_str()));
    }

    items
}

impl ReportReader for DieselRepository {
    fn get_report_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainReport>> {
        let mut conn = self.conn()?;
        let report = reports::table
            .filter(reports::id.eq(id))
            .filter(reports::hub_id.eq(hub_id))
            .first::<DbReport>(&mut conn)
            .optional()?;

        Ok(report.map(Into::into))
    }

    fn list_reports(&self, query: ReportListQuery) -> RepositoryResult<(usize, Vec<DomainReport>)> {
        let mut conn = self.conn()?;

        let total = filtered_reports(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered_reports(&query).order((reports::created_at.desc(), reports::id.desc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_reports = items.load::<DbReport>(&mut conn)?;

        Ok((total, db_reports.into_iter().map(Into::into).collect()))
    }
}

impl ReportWriter for DieselRepository {
    fn create_report(&self, new_report: &DomainNewReport) -> RepositoryResult<DomainReport> {
        let mut conn = self.conn()?;
        let db_new = DbNewReport::from(new_report);

        let created = diesel::insert_into(reports::table)
            .values(&db_new)
            .get_result::<DbReport>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_report(&self, report_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = reports::table
            .filter(reports::id.eq(report_id))
            .filter(reports::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
