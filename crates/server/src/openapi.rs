use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Stored employee.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct EmployeeDoc {
    pub employee_id: i32,
    #[schema(max_length = 50)]
    pub first_name: String,
    #[schema(max_length = 50)]
    pub last_name: String,
    #[schema(max_length = 100)]
    pub email: String,
    #[schema(max_length = 50)]
    pub department: Option<String>,
}

/// Create/update body. `employeeId` is ignored on create and must match the path on update.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct EmployeePayloadDoc {
    pub employee_id: Option<i32>,
    #[schema(max_length = 50)]
    pub first_name: String,
    #[schema(max_length = 50)]
    pub last_name: String,
    #[schema(max_length = 100)]
    pub email: String,
    #[schema(max_length = 50)]
    pub department: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Employee API", version = "v1"),
    paths(
        crate::routes::health,
        crate::routes::employees::list_employees,
        crate::routes::employees::get_employee,
        crate::routes::employees::create_employee,
        crate::routes::employees::update_employee,
        crate::routes::employees::delete_employee,
    ),
    components(
        schemas(
            HealthResponse,
            EmployeeDoc,
            EmployeePayloadDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "employee")
    )
)]
pub struct ApiDoc;
