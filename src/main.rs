use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{logout, not_assigned};
use tera::Tera;

use tailor_shop::repository::DieselRepository;
use tailor_shop::routes::api::{
    api_v1_create_customer, api_v1_customer, api_v1_search_customers, api_v1_search_employees,
};
use tailor_shop::routes::customers::{
    add_customer, delete_customer, edit_customer, edit_customer_page, new_customer,
    show_customer, show_customers,
};
use tailor_shop::routes::dashboard::show_dashboard;
use tailor_shop::routes::employees::{
    add_employee, delete_employee, edit_employee, edit_employee_page, new_employee,
    show_employee, show_employees,
};
use tailor_shop::routes::materials::{
    add_material, delete_material, edit_material, show_material_usage, show_materials,
};
use tailor_shop::routes::orders::{
    add_order, advance_order, delete_order, edit_order, edit_order_page, new_order,
    rate_order_employee, rate_whole_order, show_active_orders, show_order, show_orders,
};
use tailor_shop::routes::reports::{
    add_report, delete_report, new_report, show_provinces, show_report, show_reports,
    show_workload,
};
use tailor_shop::routes::settings::{save_settings, show_settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = match env::var("AUTH_SERVICE_URL") {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let common_config = CommonServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    log::info!("Starting tailor shop on {address}:{port}");

    // Literal paths are registered before `{id}` paths sharing their prefix.
    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(
                web::scope("/api")
                    .service(api_v1_search_customers)
                    .service(api_v1_customer)
                    .service(api_v1_create_customer)
                    .service(api_v1_search_employees),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_dashboard)
                    .service(show_customers)
                    .service(new_customer)
                    .service(add_customer)
                    .service(show_customer)
                    .service(edit_customer_page)
                    .service(edit_customer)
                    .service(delete_customer)
                    .service(show_employees)
                    .service(new_employee)
                    .service(add_employee)
                    .service(show_employee)
                    .service(edit_employee_page)
                    .service(edit_employee)
                    .service(delete_employee)
                    .service(show_orders)
                    .service(show_active_orders)
                    .service(new_order)
                    .service(add_order)
                    .service(show_order)
                    .service(edit_order_page)
                    .service(edit_order)
                    .service(delete_order)
                    .service(advance_order)
                    .service(rate_order_employee)
                    .service(rate_whole_order)
                    .service(show_materials)
                    .service(show_material_usage)
                    .service(add_material)
                    .service(edit_material)
                    .service(delete_material)
                    .service(show_reports)
                    .service(new_report)
                    .service(add_report)
                    .service(show_workload)
                    .service(show_provinces)
                    .service(show_report)
                    .service(delete_report)
                    .service(show_settings)
                    .service(save_settings)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
