//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT issuance and verification with role-dependent lifetimes.

pub mod jwt;
pub mod password;
