//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod account_repo;
pub mod product_repo;

pub use account_repo::AccountRepo;
pub use product_repo::ProductRepo;
