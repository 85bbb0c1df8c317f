use serde::{Deserialize, Serialize};

use models::employee::NewEmployee;

/// Stored employee as exposed to callers.
pub type Employee = models::employee::Model;

/// Request body for create and update.
///
/// Missing fields decode to their defaults so that an absent name is reported
/// as a validation failure, and an absent `employeeId` on update (0) as a
/// path/body mismatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeePayload {
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
}

impl EmployeePayload {
    /// Drop the identifier; create assigns its own.
    pub fn into_new_employee(self) -> NewEmployee {
        NewEmployee {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department: self.department,
        }
    }

    pub fn into_employee(self) -> Employee {
        let id = self.employee_id;
        self.into_new_employee().with_id(id)
    }
}

impl From<Employee> for EmployeePayload {
    fn from(e: Employee) -> Self {
        Self {
            employee_id: e.employee_id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            department: e.department,
        }
    }
}
