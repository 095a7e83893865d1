use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::employee::EmployeeRole;
use crate::forms::employees::EmployeeForm;
use crate::repository::DieselRepository;
use crate::routes::{deny_access, render_not_found};
use crate::services::employees::{
    EmployeeView, EmployeesQuery, create_employee, load_employee, load_employee_detail,
    load_employees, modify_employee, remove_employee,
};
use crate::services::{ServiceError, ensure_manager};

#[get("/employees")]
pub async fn show_employees(
    params: web::Query<EmployeesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_employees(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "employees",
                &server_config.auth_service_url,
            );
            context.insert("employees", &data.employees);
            context.insert("summary", &data.summary);
            context.insert("search", &data.search);
            context.insert("role", &data.role);
            context.insert("include_inactive", &data.include_inactive);
            context.insert("roles", &EmployeeRole::options());
            render_template(&tera, "employees/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to list employees: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/employees/new")]
pub async fn new_employee(
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
        "employees",
        &server_config.auth_service_url,
    );
    context.insert("employee", &Option::<EmployeeView>::None);
    context.insert("roles", &EmployeeRole::options());
    render_template(&tera, "employees/form.html", &context)
}

#[post("/employees/add")]
pub async fn add_employee(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EmployeeForm>,
) -> impl Responder {
    match create_employee(repo.get_ref(), &user, form.into_inner()) {
        Ok(employee) => {
            FlashMessage::success(format!("Employee {} added.", employee.full_name())).send();
            redirect(&format!("/employees/{}", employee.id))
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/employees/new")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("An employee with this phone or login already exists.").send();
            redirect("/employees/new")
        }
        Err(err) => {
            log::error!("Failed to create employee: {err}");
            FlashMessage::error("Failed to add the employee.").send();
            redirect("/employees")
        }
    }
}

#[get("/employees/{employee_id}")]
pub async fn show_employee(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match load_employee_detail(repo.get_ref(), &user, employee_id) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "employees",
                &server_config.auth_service_url,
            );
            context.insert("employee", &data.employee);
            context.insert("recent_orders", &data.recent_orders);
            context.insert("total_orders", &data.total_orders);
            context.insert("completed_orders", &data.completed_orders);
            context.insert("in_progress_orders", &data.in_progress_orders);
            context.insert("rating", &data.rating);
            render_template(&tera, "employees/detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => render_not_found(
            &tera,
            &flash_messages,
            &user,
            "employees",
            &server_config,
            "Employee not found.",
        ),
        Err(err) => {
            log::error!("Failed to load employee {employee_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/employees/{employee_id}/edit")]
pub async fn edit_employee_page(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match load_employee(repo.get_ref(), &user, employee_id) {
        Ok(employee) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "employees",
                &server_config.auth_service_url,
            );
            context.insert("employee", &Some(EmployeeView::from(employee)));
            context.insert("roles", &EmployeeRole::options());
            render_template(&tera, "employees/form.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => render_not_found(
            &tera,
            &flash_messages,
            &user,
            "employees",
            &server_config,
            "Employee not found.",
        ),
        Err(err) => {
            log::error!("Failed to load employee {employee_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/employees/{employee_id}/edit")]
pub async fn edit_employee(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EmployeeForm>,
) -> impl Responder {
    let employee_id = path.into_inner();
    let edit_url = format!("/employees/{employee_id}/edit");

    match modify_employee(repo.get_ref(), &user, employee_id, form.into_inner()) {
        Ok(employee) => {
            FlashMessage::success(format!("Employee {} updated.", employee.full_name())).send();
            redirect(&format!("/employees/{employee_id}"))
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&edit_url)
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Another employee already uses this phone or login.").send();
            redirect(&edit_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Employee not found.").send();
            redirect("/employees")
        }
        Err(err) => {
            log::error!("Failed to update employee {employee_id}: {err}");
            FlashMessage::error("Failed to update the employee.").send();
            redirect(&edit_url)
        }
    }
}

#[post("/employees/{employee_id}/delete")]
pub async fn delete_employee(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match remove_employee(repo.get_ref(), &user, employee_id) {
        Ok(()) => {
            FlashMessage::success("Employee deleted.").send();
            redirect("/employees")
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Employee not found or already deleted.").send();
            redirect("/employees")
        }
        Err(err) => {
            log::error!("Failed to delete employee {employee_id}: {err}");
            FlashMessage::error("Failed to delete the employee.").send();
            redirect("/employees")
        }
    }
}
