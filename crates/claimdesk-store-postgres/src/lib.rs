//! PostgreSQL backend for the Claimdesk claim store.
//!
//! Talks to the server through [`tokio_postgres`] with a
//! [`deadpool_postgres`] pool. A client is checked out per call and handed
//! back on drop, on every exit path, so a failed query never leaks a
//! connection.

mod schema;
mod sql;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::PostgresStore;
