use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::deny_access;
use crate::services::ServiceError;
use crate::services::reports::load_dashboard;

#[get("/")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "dashboard",
                &server_config.auth_service_url,
            );
            context.insert("recent_orders", &data.recent_orders);
            context.insert("orders", &data.orders);
            context.insert("revenue", &data.revenue);
            context.insert("customers", &data.customers);
            context.insert("active_employees", &data.active_employees);
            context.insert("materials", &data.materials);
            render_template(&tera, "dashboard/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
