pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role granting access to the shop pages.
pub const SERVICE_ACCESS_ROLE: &str = "tailor";

/// Role unlocking employees, materials, reports and settings.
pub const MANAGER_ROLE: &str = "manager";
