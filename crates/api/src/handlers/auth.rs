//! Handlers for the public `/auth` endpoints (login and self-registration).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tienda_core::roles::Role;
use tienda_db::models::account::AccountResponse;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::services::account::{LoginInput, RegisterInput};
use crate::state::AppState;

/// Response body for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub mensaje: &'static str,
    pub token: String,
    pub role: Role,
}

/// Response body for `POST /auth/usuarios`.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub mensaje: &'static str,
    pub account: AccountResponse,
    pub token: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state.accounts.login(input).await?;
    Ok(Json(LoginResponse {
        mensaje: "Login exitoso",
        token: outcome.token,
        role: outcome.role,
    }))
}

/// POST /auth/usuarios
///
/// Open self-registration. Always creates a `usuario`.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterInput>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let registration = state.accounts.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            mensaje: "Usuario creado",
            account: registration.account,
            token: registration.token,
        }),
    ))
}
