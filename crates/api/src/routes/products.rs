use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::products;
use crate::middleware::auth::require_auth;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// Product routes.
///
/// ```text
/// GET    /productos         list (public)
/// POST   /productos         create (token + admin)
/// PUT    /productos/{id}    update (token + admin)
/// DELETE /productos/{id}    delete (token + admin)
/// ```
pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/productos", get(products::list_products));

    let admin = Router::new()
        .route("/productos", post(products::create_product))
        .route(
            "/productos/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    public.merge(admin)
}
