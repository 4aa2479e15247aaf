//! Persistence layer split across logical submodules. Each call opens its own
//! connection through a [`ConnectionFactory`] and runs exactly one statement.

mod books;
mod connection;

pub use books::{insert, list_all, search, set_borrowed};
pub use connection::{ensure_schema, register_unicode_lower, ConnectionFactory, SqliteConnector};
