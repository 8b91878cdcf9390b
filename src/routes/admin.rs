use actix_web::web;

use super::{materials, students};
use crate::middlewares;
use crate::models::users::entities::UserRole;

// 管理后台：同一前缀下统一做认证与角色校验
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .configure(materials::configure_admin_material_routes)
                    .configure(students::configure_admin_student_routes),
            ),
    );
}
