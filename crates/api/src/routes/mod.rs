pub mod auth;
pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree. Everything is mounted at the server root.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                 login (public)
/// /auth/usuarios              register (POST, public), list (GET, token)
/// /auth/usuarios/{id}         update, delete (token + admin)
///
/// /productos                  list (GET, public), create (POST, token + admin)
/// /productos/{id}             update, delete (token + admin)
/// ```
///
/// `state` is needed up front because the authentication layers are built
/// with [`axum::middleware::from_fn_with_state`].
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(state))
        .merge(products::router(state))
}
