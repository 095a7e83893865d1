use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::materials::MaterialForm;
use crate::repository::DieselRepository;
use crate::routes::deny_access;
use crate::services::ServiceError;
use crate::services::materials::{
    MaterialsQuery, create_material, load_material_usage, load_materials, modify_material,
    remove_material,
};

#[get("/materials")]
pub async fn show_materials(
    params: web::Query<MaterialsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_materials(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "materials",
                &server_config.auth_service_url,
            );
            context.insert("materials", &data.materials);
            context.insert("search", &data.search);
            render_template(&tera, "materials/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to list materials: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/materials/usage")]
pub async fn show_material_usage(
    params: web::Query<MaterialsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_material_usage(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "materials",
                &server_config.auth_service_url,
            );
            context.insert("usage", &data.usage);
            context.insert("summary", &data.summary);
            context.insert("search", &data.search);
            render_template(&tera, "materials/usage.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to load material usage: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/materials/add")]
pub async fn add_material(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<MaterialForm>,
) -> impl Responder {
    match create_material(repo.get_ref(), &user, form.into_inner()) {
        Ok(material) => {
            FlashMessage::success(format!("Material \"{}\" added.", material.name)).send();
            redirect("/materials")
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/materials")
        }
        Err(err) => {
            log::error!("Failed to create material: {err}");
            FlashMessage::error("Failed to add the material.").send();
            redirect("/materials")
        }
    }
}

#[post("/materials/{material_id}/edit")]
pub async fn edit_material(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<MaterialForm>,
) -> impl Responder {
    let material_id = path.into_inner();

    match modify_material(repo.get_ref(), &user, material_id, form.into_inner()) {
        Ok(material) => {
            FlashMessage::success(format!("Material \"{}\" updated.", material.name)).send();
            redirect("/materials")
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/materials")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Material not found.").send();
            redirect("/materials")
        }
        Err(err) => {
            log::error!("Failed to update material {material_id}: {err}");
            FlashMessage::error("Failed to update the material.").send();
            redirect("/materials")
        }
    }
}

#[post("/materials/{material_id}/delete")]
pub async fn delete_material(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let material_id = path.into_inner();

    match remove_material(repo.get_ref(), &user, material_id) {
        Ok(()) => {
            FlashMessage::success("Material deleted.").send();
            redirect("/materials")
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Material not found or already deleted.").send();
            redirect("/materials")
        }
        Err(err) => {
            log::error!("Failed to delete material {material_id}: {err}");
            FlashMessage::error("Failed to delete the material.").send();
            redirect("/materials")
        }
    }
}
