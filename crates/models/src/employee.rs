use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, QueryOrder, Set, Unchanged};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

pub const FIRST_NAME_MAX: usize = 50;
pub const LAST_NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 100;
pub const DEPARTMENT_MAX: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Employee fields without the store-assigned identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_fields(&self.first_name, &self.last_name, &self.email, self.department.as_deref())
    }

    pub fn with_id(self, employee_id: i32) -> Model {
        Model {
            employee_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department: self.department,
        }
    }
}

fn required(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    bounded(field, value, max)
}

fn bounded(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

/// Required-ness and length rules shared by insert and replace.
pub fn validate_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    department: Option<&str>,
) -> Result<(), ModelError> {
    required("firstName", first_name, FIRST_NAME_MAX)?;
    required("lastName", last_name, LAST_NAME_MAX)?;
    required("email", email, EMAIL_MAX)?;
    if let Some(d) = department {
        bounded("department", d, DEPARTMENT_MAX)?;
    }
    Ok(())
}

fn db_err(e: DbErr) -> ModelError {
    errors::ModelError::Db(e.to_string())
}

/// All rows, ordered by identifier.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_asc(Column::EmployeeId)
        .all(db)
        .await
        .map_err(db_err)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(db_err)
}

pub async fn exists(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    Ok(find_by_id(db, id).await?.is_some())
}

/// Insert a row; the identifier is assigned by the database.
pub async fn insert(db: &DatabaseConnection, new: NewEmployee) -> Result<Model, ModelError> {
    new.validate()?;
    let am = ActiveModel {
        employee_id: NotSet,
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        email: Set(new.email),
        department: Set(new.department),
    };
    am.insert(db).await.map_err(db_err)
}

/// Overwrite every column of an existing row.
///
/// A zero-row update means the row is gone (possibly deleted after the caller
/// read it); that comes back as [`ModelError::NotFound`] and nothing is inserted.
pub async fn replace(db: &DatabaseConnection, employee: Model) -> Result<Model, ModelError> {
    validate_fields(
        &employee.first_name,
        &employee.last_name,
        &employee.email,
        employee.department.as_deref(),
    )?;
    let id = employee.employee_id;
    let am = ActiveModel {
        employee_id: Unchanged(id),
        first_name: Set(employee.first_name),
        last_name: Set(employee.last_name),
        email: Set(employee.email),
        department: Set(employee.department),
    };
    match am.update(db).await {
        Ok(m) => Ok(m),
        Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => {
            Err(ModelError::NotFound(format!("employee {id}")))
        }
        Err(e) => Err(db_err(e)),
    }
}

pub async fn delete_by_id(db: &DatabaseConnection, id: i32) -> Result<(), ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    if res.rows_affected == 0 {
        return Err(ModelError::NotFound(format!("employee {id}")));
    }
    Ok(())
}
