use actix_web::HttpResponse;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, check_role, redirect};
use tera::Tera;

use crate::SERVICE_ACCESS_ROLE;

pub mod api;
pub mod customers;
pub mod dashboard;
pub mod employees;
pub mod materials;
pub mod orders;
pub mod reports;
pub mod settings;

/// Response for a user lacking a role required by the page.
///
/// Tailors without the manager role land on the order list, anyone else on `/na`.
pub(crate) fn deny_access(user: &AuthenticatedUser) -> HttpResponse {
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        FlashMessage::warning("This page is available to managers only.").send();
        redirect("/orders")
    } else {
        FlashMessage::error("Insufficient permissions.").send();
        redirect("/na")
    }
}

/// Renders the shared "not found" page with a 404 status.
pub(crate) fn render_not_found(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    server_config: &CommonServerConfig,
    message: &str,
) -> HttpResponse {
    let mut context = base_context(
        flash_messages,
        user,
        current_page,
        &server_config.auth_service_url,
    );
    context.insert("message", message);

    match tera.render("errors/not_found.html", &context) {
        Ok(body) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render not found page: {err}");
            HttpResponse::NotFound().finish()
        }
    }
}
