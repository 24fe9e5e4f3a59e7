//! Store abstractions the HTTP layer is written against.
//!
//! - [`PgStore`] -- PostgreSQL, backed by the repositories in
//!   [`crate::repositories`].
//! - [`MemoryStore`] -- process-local maps, used by tests and local runs.
//!
//! Both enforce email uniqueness atomically: a duplicate insert or update
//! fails with [`StoreError::DuplicateEmail`] and leaves no row behind.

use async_trait::async_trait;
use tienda_core::types::DbId;

use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::product::{CreateProduct, Product, UpdateProduct};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Name of the unique constraint guarding `accounts.email`.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "uq_accounts_email";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for account records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::DuplicateEmail`] if the
    /// email is already taken.
    async fn insert_account(&self, input: &CreateAccount) -> Result<Account, StoreError>;

    async fn find_account(&self, id: DbId) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Apply a partial update. Returns `None` if `id` does not exist.
    async fn update_account(
        &self,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, StoreError>;

    /// Returns `true` if an account was removed.
    async fn delete_account(&self, id: DbId) -> Result<bool, StoreError>;

    /// Cheap reachability probe for `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Persistence for product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, input: &CreateProduct) -> Result<Product, StoreError>;

    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Apply a partial update. Returns `None` if `id` does not exist.
    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError>;

    /// Returns `true` if a product was removed.
    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError>;
}
