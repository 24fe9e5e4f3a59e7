use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tienda_core::types::DbId;
use tokio::sync::RwLock;

use super::{AccountStore, ProductStore, StoreError};
use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::models::product::{CreateProduct, Product, UpdateProduct};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<DbId, Account>,
    products: BTreeMap<DbId, Product>,
    last_account_id: DbId,
    last_product_id: DbId,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.accounts
            .values()
            .any(|a| a.email == email && Some(a.id) != except)
    }
}

/// In-process store with the same observable behaviour as [`super::PgStore`].
///
/// Ids are assigned sequentially starting at 1. The uniqueness check and the
/// write happen under one write lock, so concurrent inserts of the same email
/// cannot both succeed. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, input: &CreateAccount) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&input.email, None) {
            return Err(StoreError::DuplicateEmail(input.email.clone()));
        }

        tables.last_account_id += 1;
        let now = Utc::now();
        let account = Account {
            id: tables.last_account_id,
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.tables.read().await.accounts.values().cloned().collect())
    }

    async fn update_account(
        &self,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &input.email {
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }

        let Some(account) = tables.accounts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            account.name = name.clone();
        }
        if let Some(email) = &input.email {
            account.email = email.clone();
        }
        if let Some(hash) = &input.password_hash {
            account.password_hash = hash.clone();
        }
        if let Some(role) = input.role {
            account.role = role;
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn delete_account(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.accounts.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert_product(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: tables.last_product_id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            product.name = name.clone();
        }
        if let Some(description) = &input.description {
            product.description = description.clone();
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }
}
