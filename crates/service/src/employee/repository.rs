use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::employee::{self, NewEmployee};

use super::domain::Employee;
use crate::errors::ServiceError;

/// Identifier-keyed employee persistence.
///
/// `replace` and `delete_by_id` report a missing row as [`ServiceError::NotFound`];
/// `replace` never inserts.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Employee>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, ServiceError>;
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, ServiceError>;
    async fn replace(&self, employee: Employee) -> Result<Employee, ServiceError>;
    async fn delete_by_id(&self, id: i32) -> Result<(), ServiceError>;
    async fn exists(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmEmployeeRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl EmployeeRepository for SeaOrmEmployeeRepository {
    async fn list_all(&self) -> Result<Vec<Employee>, ServiceError> {
        Ok(employee::list_all(&self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, ServiceError> {
        Ok(employee::find_by_id(&self.db, id).await?)
    }

    async fn insert(&self, new: NewEmployee) -> Result<Employee, ServiceError> {
        Ok(employee::insert(&self.db, new).await?)
    }

    async fn replace(&self, e: Employee) -> Result<Employee, ServiceError> {
        Ok(employee::replace(&self.db, e).await?)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), ServiceError> {
        Ok(employee::delete_by_id(&self.db, id).await?)
    }

    async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(employee::exists(&self.db, id).await?)
    }
}

/// Simple in-memory mock repository for tests and doc examples.
///
/// The `race_*` switches reproduce interleavings that are hard to hit against a
/// real database.
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    struct Table {
        rows: BTreeMap<i32, Employee>,
        last_id: i32,
    }

    #[derive(Default)]
    pub struct MockEmployeeRepository {
        table: Mutex<Table>,
        race_delete_before_replace: AtomicBool,
        race_spurious_replace_miss: AtomicBool,
        race_delete_before_delete: AtomicBool,
    }

    impl MockEmployeeRepository {
        /// Another writer deletes the row just before the next `replace`.
        pub fn race_delete_before_replace(&self) {
            self.race_delete_before_replace.store(true, Ordering::SeqCst);
        }

        /// Next `replace` reports the row missing although it is still stored.
        pub fn race_spurious_replace_miss(&self) {
            self.race_spurious_replace_miss.store(true, Ordering::SeqCst);
        }

        /// Another writer deletes the row just before the next `delete_by_id`.
        pub fn race_delete_before_delete(&self) {
            self.race_delete_before_delete.store(true, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.table.lock().map(|t| t.rows.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        fn lock(&self) -> Result<MutexGuard<'_, Table>, ServiceError> {
            self.table.lock().map_err(|_| ServiceError::Db("mock table poisoned".into()))
        }
    }

    #[async_trait]
    impl EmployeeRepository for MockEmployeeRepository {
        async fn list_all(&self) -> Result<Vec<Employee>, ServiceError> {
            Ok(self.lock()?.rows.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, ServiceError> {
            Ok(self.lock()?.rows.get(&id).cloned())
        }

        async fn insert(&self, new: NewEmployee) -> Result<Employee, ServiceError> {
            new.validate()?;
            let mut t = self.lock()?;
            t.last_id += 1;
            let created = new.with_id(t.last_id);
            t.rows.insert(created.employee_id, created.clone());
            Ok(created)
        }

        async fn replace(&self, e: Employee) -> Result<Employee, ServiceError> {
            models::employee::validate_fields(&e.first_name, &e.last_name, &e.email, e.department.as_deref())?;
            let mut t = self.lock()?;
            if self.race_delete_before_replace.swap(false, Ordering::SeqCst) {
                t.rows.remove(&e.employee_id);
            }
            if self.race_spurious_replace_miss.swap(false, Ordering::SeqCst) {
                return Err(ServiceError::NotFound(format!("employee {}", e.employee_id)));
            }
            match t.rows.get_mut(&e.employee_id) {
                Some(row) => {
                    *row = e.clone();
                    Ok(e)
                }
                None => Err(ServiceError::NotFound(format!("employee {}", e.employee_id))),
            }
        }

        async fn delete_by_id(&self, id: i32) -> Result<(), ServiceError> {
            let mut t = self.lock()?;
            if self.race_delete_before_delete.swap(false, Ordering::SeqCst) {
                t.rows.remove(&id);
            }
            t.rows
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| ServiceError::NotFound(format!("employee {id}")))
        }

        async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.lock()?.rows.contains_key(&id))
        }
    }
}
