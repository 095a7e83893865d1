use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::report::{ReportPeriod, ReportType};
use crate::forms::reports::AddReportForm;
use crate::repository::DieselRepository;
use crate::routes::{deny_access, render_not_found};
use crate::services::reports::{
    PeriodQuery, ReportsQuery, create_report, load_employee_workload, load_province_breakdown,
    load_report_detail, load_reports, remove_report,
};
use crate::services::{ServiceError, ensure_manager};

#[get("/reports")]
pub async fn show_reports(
    params: web::Query<ReportsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_reports(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "reports",
                &server_config.auth_service_url,
            );
            context.insert("reports", &data.reports);
            context.insert("overview", &data.overview);
            context.insert("search", &data.search);
            context.insert("report_type", &data.report_type);
            context.insert("report_types", &ReportType::options());
            context.insert("periods", &ReportPeriod::options());
            render_template(&tera, "reports/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to load reports: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/reports/new")]
pub async fn new_report(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if ensure_manager(&user).is_err() {
        return deny_access(&user);
    }

    let mut context = base_context(
        &flash_messages,
        &user,
        "reports",
        &server_config.auth_service_url,
    );
    context.insert("report_types", &ReportType::options());
    context.insert("periods", &ReportPeriod::options());
    render_template(&tera, "reports/form.html", &context)
}

#[post("/reports/add")]
pub async fn add_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddReportForm>,
) -> impl Responder {
    match create_report(repo.get_ref(), &user, form.into_inner()) {
        Ok(report) => {
            FlashMessage::success(format!("Report \"{}\" generated.", report.title)).send();
            redirect(&format!("/reports/{}", report.id))
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/reports/new")
        }
        Err(err) => {
            log::error!("Failed to generate report: {err}");
            FlashMessage::error("Failed to generate the report.").send();
            redirect("/reports")
        }
    }
}

#[get("/reports/workload")]
pub async fn show_workload(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_employee_workload(repo.get_ref(), &user) {
        Ok(workload) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "reports",
                &server_config.auth_service_url,
            );
            context.insert("workload", &workload);
            render_template(&tera, "reports/workload.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to load employee workload: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/reports/provinces")]
pub async fn show_provinces(
    params: web::Query<PeriodQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_province_breakdown(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "reports",
                &server_config.auth_service_url,
            );
            context.insert("period", &data.period);
            context.insert("range", &data.range);
            context.insert("provinces", &data.provinces);
            context.insert("total_customers", &data.total_customers);
            context.insert("total_orders", &data.total_orders);
            context.insert("total_revenue_display", &data.total_revenue_display);
            context.insert("periods", &ReportPeriod::options());
            render_template(&tera, "reports/provinces.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to load province breakdown: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/reports/{report_id}")]
pub async fn show_report(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let report_id = path.into_inner();

    match load_report_detail(repo.get_ref(), &user, report_id) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "reports",
                &server_config.auth_service_url,
            );
            context.insert("report", &data.report);
            context.insert("data_pretty", &data.data_pretty);
            render_template(&tera, "reports/detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => render_not_found(
            &tera,
            &flash_messages,
            &user,
            "reports",
            &server_config,
            "Report not found.",
        ),
        Err(err) => {
            log::error!("Failed to load report {report_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/reports/{report_id}/delete")]
pub async fn delete_report(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let report_id = path.into_inner();

    match remove_report(repo.get_ref(), &user, report_id) {
        Ok(()) => {
            FlashMessage::success("Report deleted.").send();
            redirect("/reports")
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Report not found or already deleted.").send();
            redirect("/reports")
        }
        Err(err) => {
            log::error!("Failed to delete report {report_id}: {err}");
            FlashMessage::error("Failed to delete the report.").send();
            redirect("/reports")
        }
    }
}
