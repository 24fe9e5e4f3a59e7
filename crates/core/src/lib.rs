//! Domain primitives shared by the store and the HTTP layer.

pub mod email;
pub mod error;
pub mod roles;
pub mod types;
