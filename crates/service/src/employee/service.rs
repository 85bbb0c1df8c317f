use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::domain::{Employee, EmployeePayload};
use super::repository::EmployeeRepository;
use crate::errors::ServiceError;

/// Employee operations independent of the web framework.
///
/// Holds nothing but the repository handle, so concurrent requests only meet
/// inside the database.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: Arc<R>,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn get_all(&self) -> Result<Vec<Employee>, ServiceError> {
        self.repo.list_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_one(&self, id: i32) -> Result<Employee, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("employee", id))
    }

    /// Validate and insert. Any `employeeId` in the payload is ignored.
    ///
    /// # Examples
    /// ```
    /// use service::employee::{domain::EmployeePayload, repository::mock::MockEmployeeRepository, service::EmployeeService};
    /// use std::sync::Arc;
    /// let svc = EmployeeService::new(Arc::new(MockEmployeeRepository::default()));
    /// let payload = EmployeePayload { employee_id: 99, first_name: "Ann".into(), last_name: "Lee".into(), email: "a@x.com".into(), department: Some("Eng".into()) };
    /// let created = tokio_test::block_on(svc.create(payload)).unwrap();
    /// assert_eq!(created.employee_id, 1);
    /// assert_eq!(created.first_name, "Ann");
    /// ```
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: EmployeePayload) -> Result<Employee, ServiceError> {
        let fields = payload.into_new_employee();
        fields.validate()?;
        let created = self.repo.insert(fields).await?;
        info!(employee_id = created.employee_id, "employee_created");
        Ok(created)
    }

    /// Replace every field of employee `id`.
    ///
    /// The body must carry the same identifier as the path. When the row turns
    /// out to be gone at write time its absence is confirmed once: a confirmed
    /// absence is `NotFound`, a row that is still there is a `Concurrency` fault.
    #[instrument(skip(self, payload), fields(body_id = payload.employee_id))]
    pub async fn update(&self, id: i32, payload: EmployeePayload) -> Result<(), ServiceError> {
        if payload.employee_id != id {
            return Err(ServiceError::BadRequest(format!(
                "path id {} does not match body employeeId {}",
                id, payload.employee_id
            )));
        }
        let employee = payload.into_employee();
        models::employee::validate_fields(
            &employee.first_name,
            &employee.last_name,
            &employee.email,
            employee.department.as_deref(),
        )?;

        match self.repo.replace(employee).await {
            Ok(_) => {
                info!(employee_id = id, "employee_updated");
                Ok(())
            }
            Err(ServiceError::NotFound(_)) => {
                if self.repo.exists(id).await? {
                    warn!(employee_id = id, "employee_update_conflict");
                    Err(ServiceError::Concurrency(format!("employee {} was modified concurrently", id)))
                } else {
                    Err(ServiceError::not_found("employee", id))
                }
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.exists(id).await? {
            return Err(ServiceError::not_found("employee", id));
        }
        self.repo.delete_by_id(id).await.map_err(|e| match e {
            ServiceError::NotFound(_) => ServiceError::not_found("employee", id),
            other => other,
        })?;
        info!(employee_id = id, "employee_deleted");
        Ok(())
    }
}
