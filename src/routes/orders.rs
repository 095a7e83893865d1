use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::order::{ItemType, OrderStatus, StatusAdvance};
use crate::forms::orders::{OrderForm, RateEmployeeForm, RateOrderForm};
use crate::repository::DieselRepository;
use crate::routes::{deny_access, render_not_found};
use crate::services::ServiceError;
use crate::services::orders::{
    ActiveOrdersQuery, OrderFormData, OrdersQuery, advance_order_status, create_order,
    load_active_orders, load_order_detail, load_order_form, load_orders, modify_order,
    rate_employee, rate_order, remove_order,
};

#[get("/orders")]
pub async fn show_orders(
    params: web::Query<OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "orders",
                &server_config.auth_service_url,
            );
            context.insert("orders", &data.orders);
            context.insert("summary", &data.summary);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            context.insert("item_type", &data.item_type);
            context.insert("statuses", &OrderStatus::options());
            context.insert("item_types", &ItemType::options());
            render_template(&tera, "orders/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to list orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/orders/active")]
pub async fn show_active_orders(
    params: web::Query<ActiveOrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_active_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "active_orders",
                &server_config.auth_service_url,
            );
            context.insert("orders", &data.orders);
            context.insert("total", &data.total);
            context.insert("overdue", &data.overdue);
            context.insert("phone", &data.phone);
            render_template(&tera, "orders/active.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to list active orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn render_order_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    server_config: &CommonServerConfig,
    data: OrderFormData,
) -> HttpResponse {
    let mut context = base_context(
        flash_messages,
        user,
        "orders",
        &server_config.auth_service_url,
    );
    context.insert("order", &data.order);
    context.insert("values", &data.values);
    context.insert("customers", &data.customers);
    context.insert("employees", &data.employees);
    context.insert("item_types", &ItemType::options());
    render_template(tera, "orders/form.html", &context)
}

#[get("/orders/new")]
pub async fn new_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_order_form(repo.get_ref(), &user, None) {
        Ok(data) => render_order_form(&tera, &flash_messages, &user, &server_config, data),
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(err) => {
            log::error!("Failed to prepare order form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/orders/add")]
pub async fn add_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<OrderForm>,
) -> impl Responder {
    match create_order(repo.get_ref(), &user, form.into_inner()) {
        Ok(order) => {
            FlashMessage::success(format!("Order {} created.", order.order_number)).send();
            redirect(&format!("/orders/{}", order.id))
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/orders/new")
        }
        Err(err) => {
            log::error!("Failed to create order: {err}");
            FlashMessage::error("Failed to create the order.").send();
            redirect("/orders")
        }
    }
}

#[get("/orders/{order_id}")]
pub async fn show_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let order_id = path.into_inner();

    match load_order_detail(repo.get_ref(), &user, order_id) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "orders",
                &server_config.auth_service_url,
            );
            context.insert("order", &data.order);
            context.insert("customer", &data.customer);
            context.insert("assignments", &data.assignments);
            context.insert("timeline", &data.timeline);
            context.insert("history", &data.history);
            context.insert("employee_ratings", &data.employee_ratings);
            context.insert("order_rating", &data.order_rating);
            context.insert("rateable_employees", &data.rateable_employees);
            context.insert(
                "next_status_label",
                &data.next_status.map(OrderStatus::label),
            );
            render_template(&tera, "orders/detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => render_not_found(
            &tera,
            &flash_messages,
            &user,
            "orders",
            &server_config,
            "Order not found.",
        ),
        Err(err) => {
            log::error!("Failed to load order {order_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/orders/{order_id}/edit")]
pub async fn edit_order_page(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let order_id = path.into_inner();

    match load_order_form(repo.get_ref(), &user, Some(order_id)) {
        Ok(data) => render_order_form(&tera, &flash_messages, &user, &server_config, data),
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => render_not_found(
            &tera,
            &flash_messages,
            &user,
            "orders",
            &server_config,
            "Order not found.",
        ),
        Err(err) => {
            log::error!("Failed to prepare form for order {order_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/orders/{order_id}/edit")]
pub async fn edit_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<OrderForm>,
) -> impl Responder {
    let order_id = path.into_inner();
    let edit_url = format!("/orders/{order_id}/edit");

    match modify_order(repo.get_ref(), &user, order_id, form.into_inner()) {
        Ok(order) => {
            FlashMessage::success(format!("Order {} updated.", order.order_number)).send();
            redirect(&format!("/orders/{order_id}"))
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&edit_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Order not found.").send();
            redirect("/orders")
        }
        Err(err) => {
            log::error!("Failed to update order {order_id}: {err}");
            FlashMessage::error("Failed to update the order.").send();
            redirect(&edit_url)
        }
    }
}

#[post("/orders/{order_id}/delete")]
pub async fn delete_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = path.into_inner();

    match remove_order(repo.get_ref(), &user, order_id) {
        Ok(()) => {
            FlashMessage::success("Order deleted.").send();
            redirect("/orders")
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Order not found or already deleted.").send();
            redirect("/orders")
        }
        Err(err) => {
            log::error!("Failed to delete order {order_id}: {err}");
            FlashMessage::error("Failed to delete the order.").send();
            redirect("/orders")
        }
    }
}

#[post("/orders/{order_id}/advance")]
pub async fn advance_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = path.into_inner();
    let detail_url = format!("/orders/{order_id}");

    match advance_order_status(repo.get_ref(), &user, order_id) {
        Ok(StatusAdvance::Advanced { order, from }) => {
            FlashMessage::success(format!(
                "{} completed. Order {} is now at \"{}\".",
                from.label(),
                order.order_number,
                order.status.label()
            ))
            .send();
            redirect(&detail_url)
        }
        Ok(StatusAdvance::AlreadyFinished(order)) => {
            FlashMessage::info(format!("Order {} is already finished.", order.order_number))
                .send();
            redirect(&detail_url)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Order not found.").send();
            redirect("/orders")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::warning("The order status was changed meanwhile. Please try again.")
                .send();
            redirect(&detail_url)
        }
        Err(err) => {
            log::error!("Failed to advance order {order_id}: {err}");
            FlashMessage::error("Failed to update the order status.").send();
            redirect(&detail_url)
        }
    }
}

#[post("/orders/{order_id}/rate-employee")]
pub async fn rate_order_employee(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<RateEmployeeForm>,
) -> impl Responder {
    let order_id = path.into_inner();
    let detail_url = format!("/orders/{order_id}");

    match rate_employee(repo.get_ref(), &user, order_id, form.into_inner()) {
        Ok(_) => {
            FlashMessage::success("Employee rating saved.").send();
            redirect(&detail_url)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&detail_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Order or employee not found.").send();
            redirect(&detail_url)
        }
        Err(err) => {
            log::error!("Failed to rate employee on order {order_id}: {err}");
            FlashMessage::error("Failed to save the rating.").send();
            redirect(&detail_url)
        }
    }
}

#[post("/orders/{order_id}/rate")]
pub async fn rate_whole_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<RateOrderForm>,
) -> impl Responder {
    let order_id = path.into_inner();
    let detail_url = format!("/orders/{order_id}");

    match rate_order(repo.get_ref(), &user, order_id, form.into_inner()) {
        Ok(_) => {
            FlashMessage::success("Order rating saved.").send();
            redirect(&detail_url)
        }
        Err(ServiceError::Unauthorized) => deny_access(&user),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&detail_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Order not found.").send();
            redirect("/orders")
        }
        Err(err) => {
            log::error!("Failed to rate order {order_id}: {err}");
            FlashMessage::error("Failed to save the rating.").send();
            redirect(&detail_url)
        }
    }
}
