//! Configuration, loaded from environment variables (a `.env` file is read
//! at startup when present).
//!
//! - [`cors`]: allowed CORS origins
//! - [`database`]: PostgreSQL connection pool and migrations
//! - [`server`]: bind host and port

pub mod cors;
pub mod database;
pub mod server;
