//! SQLite database driver implementation

mod connection;
mod driver;

#[cfg(test)]
mod tests;

pub use connection::{SqliteConnection, SqliteTransaction};
pub use driver::SqliteDriver;
