use std::{path::Path, sync::Arc};

use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use service::employee::{EmployeeService, SeaOrmEmployeeRepository};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod employees;

/// Shared per-process handles. Holds no request state.
#[derive(Clone)]
pub struct ServerState {
    pub employees: Arc<EmployeeService<SeaOrmEmployeeRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection) -> Self {
        let repo = Arc::new(SeaOrmEmployeeRepository::new(db));
        Self { employees: Arc::new(EmployeeService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Alive", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: employee API, health, OpenAPI document
/// and the static front-end as fallback for every other path.
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: &str) -> Router {
    let index = Path::new(static_dir).join("index.html");
    let static_files = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let api = Router::new()
        .route(
            employees::BASE_PATH,
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/employee/:id",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        );

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .fallback_service(static_files)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
