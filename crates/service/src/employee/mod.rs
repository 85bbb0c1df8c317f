//! Employee records: wire payloads, repository seam and the service that maps
//! store outcomes onto the request/response contract.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{Employee, EmployeePayload};
pub use repository::{EmployeeRepository, SeaOrmEmployeeRepository};
pub use service::EmployeeService;
