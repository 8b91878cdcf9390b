/*!
 * 基于角色的访问控制中间件
 *
 * 必须放在 RequireJWT 之内使用：先认证，再校验角色。
 *
 * ```rust,ignore
 * web::scope("/api/v1/admin")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::scope("")
 *             .wrap(RequireRole::new_any(UserRole::admin_roles()))
 *             .route("/students", web::post().to(create_student)),
 *     )
 * ```
 *
 * 未认证返回 401，角色不符返回 403。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Rc<[UserRole]>,
}

impl RequireRole {
    /// 仅允许指定角色
    pub fn new(role: &UserRole) -> Self {
        Self::new_any(&[role])
    }

    /// 允许其中任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(allowed: &[UserRole], role: &UserRole) -> bool {
        allowed.contains(role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            let current = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role.clone()));

            let Some((user_id, role)) = current else {
                info!("Role check without an authenticated user on {}", req.path());
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if RequireRole::permits(&allowed_roles, &role) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "Access denied for user {} (role: {}) on {}",
                user_id,
                role,
                req.path()
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "Administrator privileges required",
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_only() {
        let admin_only = RequireRole::new_any(UserRole::admin_roles());
        assert!(RequireRole::permits(&admin_only.allowed_roles, &UserRole::Admin));
        assert!(!RequireRole::permits(&admin_only.allowed_roles, &UserRole::User));

        let anyone = RequireRole::new_any(UserRole::all_roles());
        assert!(RequireRole::permits(&anyone.allowed_roles, &UserRole::User));
    }
}
