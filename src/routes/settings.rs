use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::settings::SaveSettingForm;
use crate::repository::DieselRepository;
use crate::routes::deny_access;
use crate::services::ServiceError;
use crate::services::settings::{load_settings, save_setting};

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_settings(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "settings",
                &server_config.auth_service_url,
            );
            context.insert("settings", &data.settings);
            context.insert("order_defaults", &data.order_defaults);
            render_template(&tera, "settings/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to load settings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/settings/save")]
pub async fn save_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<SaveSettingForm>,
) -> impl Responder {
    match save_setting(repo.get_ref(), &user, form.into_inner()) {
        Ok(setting) => {
            FlashMessage::success(format!("Setting {} saved.", setting.key)).send();
            redirect("/settings")
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/settings")
        }
        Err(err) => {
            log::error!("Failed to save setting: {err}");
            FlashMessage::error("Failed to save the setting.").send();
            redirect("/settings")
        }
    }
}
