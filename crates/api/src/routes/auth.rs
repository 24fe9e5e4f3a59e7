use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{accounts, auth};
use crate::middleware::auth::require_auth;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /login             login (public)
/// POST   /usuarios          register (public)
/// GET    /usuarios          list accounts (token)
/// PUT    /usuarios/{id}     update account (token + admin)
/// DELETE /usuarios/{id}     delete account (token + admin)
/// ```
pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/usuarios", post(auth::register));

    let authenticated = Router::new()
        .route("/usuarios", get(accounts::list_accounts))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    // Layers run outermost-last: require_auth attaches the identity before
    // require_admin inspects it.
    let admin = Router::new()
        .route(
            "/usuarios/{id}",
            put(accounts::update_account).delete(accounts::delete_account),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    public.merge(authenticated).merge(admin)
}
