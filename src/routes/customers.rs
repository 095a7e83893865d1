use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::customer::{CustomerType, Province};
use crate::forms::customers::CustomerForm;
use crate::repository::DieselRepository;
use crate::routes::{deny_access, render_not_found};
use crate::services::{ServiceError, ensure_access};
use crate::services::customers::{
    CustomerView, CustomersQuery, create_customer, load_customer, load_customer_detail,
    load_customers, modify_customer, remove_customer,
};

#[get("/customers")]
pub async fn show_customers(
    params: web::Query<CustomersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_customers(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "customers",
                &server_config.auth_service_url,
            );
            context.insert("customers", &data.customers);
            context.insert("summary", &data.summary);
            context.insert("search", &data.search);
            context.insert("customer_type", &data.customer_type);
            context.insert("customer_types", &CustomerType::options());
            render_template(&tera, "customers/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to list customers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/customers/new")]
pub async fn new_customer(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if ensure_access(&user).is_err() {
        return deny_access(&user);
    }

    let mut context = base_context(
        &flash_messages,
        &user,
        "customers",
        &server_config.auth_service_url,
    );
    context.insert("customer", &Option::<CustomerView>::None);
    context.insert("provinces", &Province::options());
    context.insert("customer_types", &CustomerType::options());
    render_template(&tera, "customers/form.html", &context)
}

#[post("/customers/add")]
pub async fn add_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<CustomerForm>,
) -> impl Responder {
    match create_customer(repo.get_ref(), &user, form.into_inner()) {
        Ok(customer) => {
            FlashMessage::success(format!("Customer {} added.", customer.full_name())).send();
            redirect(&format!("/customers/{}", customer.id))
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/customers/new")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("A customer with this phone already exists.").send();
            redirect("/customers/new")
        }
        Err(err) => {
            log::error!("Failed to create customer: {err}");
            FlashMessage::error("Failed to add the customer.").send();
            redirect("/customers")
        }
    }
}

#[get("/customers/{customer_id}")]
pub async fn show_customer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let customer_id = path.into_inner();

    match load_customer_detail(repo.get_ref(), &user, customer_id) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "customers",
                &server_config.auth_service_url,
            );
            context.insert("customer", &data.customer);
            context.insert("orders", &data.orders);
            context.insert("total_orders", &data.total_orders);
            context.insert("completed_orders", &data.completed_orders);
            context.insert("active_orders", &data.active_orders);
            render_template(&tera, "customers/detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => render_not_found(
            &tera,
            &flash_messages,
            &user,
            "customers",
            &server_config,
            "Customer not found.",
        ),
        Err(err) => {
            log::error!("Failed to load customer {customer_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/customers/{customer_id}/edit")]
pub async fn edit_customer_page(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let customer_id = path.into_inner();

    match load_customer(repo.get_ref(), &user, customer_id) {
        Ok(customer) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "customers",
                &server_config.auth_service_url,
            );
            context.insert("customer", &Some(CustomerView::from(customer)));
            context.insert("provinces", &Province::options());
            context.insert("customer_types", &CustomerType::options());
            render_template(&tera, "customers/form.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => render_not_found(
            &tera,
            &flash_messages,
            &user,
            "customers",
            &server_config,
            "Customer not found.",
        ),
        Err(err) => {
            log::error!("Failed to load customer {customer_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/customers/{customer_id}/edit")]
pub async fn edit_customer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<CustomerForm>,
) -> impl Responder {
    let customer_id = path.into_inner();
    let edit_url = format!("/customers/{customer_id}/edit");

    match modify_customer(repo.get_ref(), &user, customer_id, form.into_inner()) {
        Ok(customer) => {
            FlashMessage::success(format!("Customer {} updated.", customer.full_name())).send();
            redirect(&format!("/customers/{customer_id}"))
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&edit_url)
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Another customer already uses this phone.").send();
            redirect(&edit_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Customer not found.").send();
            redirect("/customers")
        }
        Err(err) => {
            log::error!("Failed to update customer {customer_id}: {err}");
            FlashMessage::error("Failed to update the customer.").send();
            redirect(&edit_url)
        }
    }
}

#[post("/customers/{customer_id}/delete")]
pub async fn delete_customer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let customer_id = path.into_inner();

    match remove_customer(repo.get_ref(), &user, customer_id) {
        Ok(()) => {
            FlashMessage::success("Customer deleted.").send();
            redirect("/customers")
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Conflict) => {
            FlashMessage::error("The customer has orders and cannot be deleted.").send();
            redirect(&format!("/customers/{customer_id}"))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Customer not found or already deleted.").send();
            redirect("/customers")
        }
        Err(err) => {
            log::error!("Failed to delete customer {customer_id}: {err}");
            FlashMessage::error("Failed to delete the customer.").send();
            redirect("/customers")
        }
    }
}
