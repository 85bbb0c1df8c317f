//! Persistence layer: SeaORM entities, field validation and the
//! row-level store operations built on them.

pub mod errors;
pub mod db;
pub mod employee;
