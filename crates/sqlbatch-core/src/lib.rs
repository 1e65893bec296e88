//! sqlbatch Core - Core abstractions shared by the batching engine and drivers
//!
//! This crate provides the fundamental traits and types that the other
//! sqlbatch crates depend on. It defines:
//!
//! - `Connection` / `Transaction` - Traits for executing parameterized SQL
//! - `DatabaseDriver` - Trait for driver implementations and their capabilities
//! - `Dialect` - Per-dialect limits such as the bound parameter ceiling
//! - Common types like `Value`, `Row`, `StatementResult`, etc.

mod connection;
mod dialect;
mod driver;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use connection::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use types::*;
