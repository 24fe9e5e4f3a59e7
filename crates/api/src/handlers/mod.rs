//! Axum handler functions, one module per resource.

pub mod accounts;
pub mod auth;
pub mod products;
