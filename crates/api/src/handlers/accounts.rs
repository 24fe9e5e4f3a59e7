//! Handlers for `/auth/usuarios` account management.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tienda_core::types::DbId;
use tienda_db::models::account::AccountResponse;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::services::account::UpdateAccountInput;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AccountList {
    pub accounts: Vec<AccountResponse>,
}

#[derive(Debug, Serialize)]
pub struct AccountUpdated {
    pub mensaje: &'static str,
    pub account: AccountResponse,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub mensaje: &'static str,
}

/// GET /auth/usuarios
///
/// Any authenticated caller may list accounts.
pub async fn list_accounts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<AccountList>> {
    let accounts = state.accounts.list_accounts().await?;
    Ok(Json(AccountList { accounts }))
}

/// PUT /auth/usuarios/{id}
pub async fn update_account(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateAccountInput>,
) -> AppResult<Json<AccountUpdated>> {
    let account = state.accounts.update_account(id, input, user.role).await?;
    tracing::info!(account_id = id, by = user.account_id, "Account modified");
    Ok(Json(AccountUpdated {
        mensaje: "Usuario actualizado",
        account,
    }))
}

/// DELETE /auth/usuarios/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Message>> {
    state.accounts.delete_account(id, user.role).await?;
    tracing::info!(account_id = id, by = user.account_id, "Account removed");
    Ok(Json(Message {
        mensaje: "Usuario eliminado correctamente",
    }))
}
