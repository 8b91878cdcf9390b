pub mod admin;

pub mod auth;

pub mod materials;

pub mod students;

pub mod system;

pub mod frontend;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use frontend::configure_frontend_routes;
pub use materials::configure_materials_routes;
pub use students::configure_students_routes;
pub use system::configure_system_routes;

use actix_web::web;

/// 全部 API 路由（不含前端 fallback）
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_materials_routes)
        .configure(configure_students_routes)
        .configure(configure_admin_routes)
        .configure(configure_system_routes);
}
