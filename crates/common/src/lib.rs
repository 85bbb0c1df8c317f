//! Shared building blocks for the employee service crates:
//! logging setup, startup environment checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;
