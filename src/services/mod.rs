//! Service layer for business logic
//!
//! Shared between the HTTP API and the CLI commands.

mod url_service;

pub use url_service::*;
