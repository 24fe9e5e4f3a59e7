use std::sync::Arc;

use tienda_db::{AccountStore, ProductStore};

use crate::auth::jwt::TokenService;
use crate::config::ServerConfig;
use crate::services::AccountService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Everything in it is built once at startup from [`ServerConfig`] and never
/// mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Token issuance/verification, shared with [`AccountService`].
    pub tokens: TokenService,
    pub accounts: AccountService,
    /// Account persistence, used directly only by the health check.
    pub account_store: Arc<dyn AccountStore>,
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(
        config: &ServerConfig,
        account_store: Arc<dyn AccountStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt);
        let accounts = AccountService::new(Arc::clone(&account_store), tokens.clone());
        Self {
            tokens,
            accounts,
            account_store,
            products,
        }
    }
}
