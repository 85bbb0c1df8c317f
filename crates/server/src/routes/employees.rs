use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    Json,
};
use service::employee::{Employee, EmployeePayload};
use tracing::info;

use crate::{errors::JsonApiError, routes::ServerState};

pub const BASE_PATH: &str = "/api/employee";

#[utoipa::path(
    get, path = "/api/employee", tag = "employee",
    responses(
        (status = 200, description = "All employees", body = [crate::openapi::EmployeeDoc]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_employees(State(state): State<ServerState>) -> Result<Json<Vec<Employee>>, JsonApiError> {
    let list = state.employees.get_all().await?;
    info!(count = list.len(), "list employees");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/employee/{id}", tag = "employee",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::EmployeeDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_employee(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Employee>, JsonApiError> {
    let Path(id) = path?;
    Ok(Json(state.employees.get_one(id).await?))
}

#[utoipa::path(
    post, path = "/api/employee", tag = "employee",
    request_body = crate::openapi::EmployeePayloadDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::EmployeeDoc),
        (status = 400, description = "Validation Error or malformed JSON"),
        (status = 415, description = "Missing JSON content type"),
        (status = 422, description = "Undecodable JSON")
    )
)]
pub async fn create_employee(
    State(state): State<ServerState>,
    body: Result<Json<EmployeePayload>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Employee>), JsonApiError> {
    let Json(input) = body?;
    let created = state.employees.create(input).await?;
    let location = format!("{}/{}", BASE_PATH, created.employee_id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    put, path = "/api/employee/{id}", tag = "employee",
    params(("id" = i32, Path, description = "Employee id; must equal employeeId in the body")),
    request_body = crate::openapi::EmployeePayloadDoc,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Id mismatch or Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Undecodable JSON")
    )
)]
pub async fn update_employee(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<EmployeePayload>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = path?;
    let Json(input) = body?;
    state.employees.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/api/employee/{id}", tag = "employee",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_employee(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = path?;
    state.employees.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
