use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::customers::CustomerForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::api::{
    CustomerSearchQuery, EmployeeSearchQuery, create_customer_json, customer_json,
    search_customers, search_employees,
};

#[get("/v1/customers/search")]
/// Customers whose phone contains the `phone` fragment.
///
/// Users without the role stored in `crate::SERVICE_ACCESS_ROLE` receive a `401 Unauthorized` response.
pub async fn api_v1_search_customers(
    params: web::Query<CustomerSearchQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match search_customers(repo.get_ref(), &user, params.into_inner()) {
        Ok(customers) => HttpResponse::Ok().json(customers),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to search customers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/customers/{customer_id}")]
pub async fn api_v1_customer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let customer_id = path.into_inner();

    match customer_json(repo.get_ref(), &user, customer_id) {
        Ok(customer) => HttpResponse::Ok().json(customer),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load customer {customer_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/customers")]
/// Creates a customer from the order form and answers with `{success, customer_id, customer_name}`.
pub async fn api_v1_create_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<CustomerForm>,
) -> impl Responder {
    match create_customer_json(repo.get_ref(), &user, form.into_inner()) {
        Ok(response) if response.success => HttpResponse::Ok().json(response),
        Ok(response) => HttpResponse::BadRequest().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to create customer: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/employees/search")]
pub async fn api_v1_search_employees(
    params: web::Query<EmployeeSearchQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match search_employees(repo.get_ref(), &user, params.into_inner()) {
        Ok(employees) => HttpResponse::Ok().json(employees),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to search employees: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
