//! Service layer providing the employee operations on top of models.
//! - Separates business rules (existence checks, id agreement) from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod runtime;
pub mod employee;
#[cfg(test)]
pub mod test_support;
