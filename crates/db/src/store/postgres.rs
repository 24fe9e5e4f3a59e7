use async_trait::async_trait;
use sqlx::PgPool;
use tienda_core::types::DbId;

use super::{AccountStore, ProductStore, StoreError, EMAIL_UNIQUE_CONSTRAINT};
use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::repositories::{AccountRepo, ProductRepo};

/// PostgreSQL-backed store. Cheap to clone (the pool is reference counted).
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a violation of `uq_accounts_email` (SQLSTATE 23505) into
/// [`StoreError::DuplicateEmail`]; everything else stays a database error.
fn classify_account_write(err: sqlx::Error, email: Option<&str>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
        {
            tracing::debug!(constraint = EMAIL_UNIQUE_CONSTRAINT, "Duplicate email rejected by database");
            return StoreError::DuplicateEmail(email.unwrap_or_default().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert_account(&self, input: &CreateAccount) -> Result<Account, StoreError> {
        AccountRepo::create(&self.pool, input)
            .await
            .map_err(|e| classify_account_write(e, Some(&input.email)))
    }

    async fn find_account(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::find_by_email(&self.pool, email).await?)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(AccountRepo::list(&self.pool).await?)
    }

    async fn update_account(
        &self,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, StoreError> {
        AccountRepo::update(&self.pool, id, input)
            .await
            .map_err(|e| classify_account_write(e, input.email.as_deref()))
    }

    async fn delete_account(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(AccountRepo::delete(&self.pool, id).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn insert_product(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        Ok(ProductRepo::create(&self.pool, input).await?)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(ProductRepo::list(&self.pool).await?)
    }

    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError> {
        Ok(ProductRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ProductRepo::delete(&self.pool, id).await?)
    }
}
