//! Authentication and authorization middleware.
//!
//! - [`auth::require_auth`] / [`auth::AuthUser`] -- verify the bearer token
//!   and attach the caller's identity to the request.
//! - [`rbac::require_admin`] -- require the `admin` role.

pub mod auth;
pub mod rbac;
