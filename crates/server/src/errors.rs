use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

/// JSON error body: `{"status": 404, "title": "Not Found", "detail": "..."}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": self.status.as_u16(),
            "title": self.title,
            "detail": self.detail,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(m)),
            ServiceError::BadRequest(m) => Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(m)),
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(m)),
            // 内部错误只记录日志，不向客户端暴露细节
            ServiceError::Concurrency(_) | ServiceError::Db(_) => {
                error!(err = %e, "employee request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Bad Request")
}

// 请求体/路径参数解析失败同样返回 JSON 错误体，不回显 serde 内部信息
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        debug!(status = status.as_u16(), error = %rejection.body_text(), "request body rejected");
        let detail = match rejection {
            JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
            JsonRejection::JsonDataError(_) => "request body does not match the employee shape",
            JsonRejection::MissingJsonContentType(_) => "expected `Content-Type: application/json`",
            _ => "request body could not be read",
        };
        Self::new(status, reason(status), Some(detail.to_string()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(e) => {
                debug!(error = %e.body_text(), "path rejected");
                Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some("id must be an integer".to_string()))
            }
            other => {
                error!(error = %other.body_text(), "path extraction failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_detail() {
        let e = JsonApiError::from(ServiceError::NotFound("employee 3 not found".into()));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.detail.as_deref(), Some("employee 3 not found"));

        let e = JsonApiError::from(ServiceError::BadRequest("mismatch".into()));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);

        let e = JsonApiError::from(ServiceError::Validation("firstName is required".into()));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.title, "Validation Error");
    }

    #[test]
    fn infrastructure_errors_are_opaque() {
        let e = JsonApiError::from(ServiceError::Db("connection refused on 10.0.0.5".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(e.detail.is_none());

        let e = JsonApiError::from(ServiceError::Concurrency("employee 1".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(e.detail.is_none());
    }
}
