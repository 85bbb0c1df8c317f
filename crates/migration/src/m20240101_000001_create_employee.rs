//! Create `employee` table.
//!
//! Column widths mirror the field limits enforced by `models::employee`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(pk_auto(Employee::EmployeeId))
                    .col(string_len(Employee::FirstName, 50))
                    .col(string_len(Employee::LastName, 50))
                    .col(string_len(Employee::Email, 100))
                    .col(string_len_null(Employee::Department, 50))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Employee::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Employee { Table, EmployeeId, FirstName, LastName, Email, Department }
