//! 路径参数提取器
//!
//! 非法的路径参数直接返回统一格式的 400 响应，而不是 actix 默认的纯文本错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 解析正整数路径参数
fn parse_positive_i64(req: &HttpRequest, name: &str) -> Option<i64> {
    req.match_info()
        .get(name)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|id| *id > 0)
}

/// 路径中的 `{id}`，必须为正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            parse_positive_i64(req, "id")
                .map(SafeIDI64)
                .ok_or_else(|| bad_path_param("Invalid ID parameter")),
        )
    }
}

/// 路径中的 `{kind}`，学生附件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeStudentFileKind(pub crate::models::students::entities::StudentFileKind);

impl FromRequest for SafeStudentFileKind {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.match_info()
                .get("kind")
                .and_then(|s| s.parse().ok())
                .map(SafeStudentFileKind)
                .ok_or_else(|| bad_path_param("Invalid file kind, expected 'profile' or 'resume'")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::StudentFileKind;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_id_extraction() {
        let req = TestRequest::default().param("id", "15").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(15));

        for bad in ["0", "-3", "abc", ""] {
            let req = TestRequest::default().param("id", bad).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{bad} accepted");
        }
    }

    #[actix_web::test]
    async fn test_kind_extraction() {
        let req = TestRequest::default().param("kind", "resume").to_http_request();
        let kind = SafeStudentFileKind::extract(&req).await.unwrap();
        assert_eq!(kind.0, StudentFileKind::Resume);

        let req = TestRequest::default().param("kind", "photo").to_http_request();
        assert!(SafeStudentFileKind::extract(&req).await.is_err());
    }
}
