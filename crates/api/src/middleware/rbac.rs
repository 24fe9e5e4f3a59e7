//! Role-based access control.
//!
//! [`require_admin`] is a route layer and must sit inside
//! [`super::auth::require_auth`]. Handlers behind it read the checked
//! identity with the [`AuthUser`] extractor.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tienda_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;

const NOT_ADMIN: &str = "Acceso denegado. No eres administrador.";

/// Pass only an identity carrying the `admin` role.
///
/// A missing identity means the layer was wired without authentication in
/// front of it; that is rejected as 403 rather than let through.
pub fn ensure_admin(user: Option<&AuthUser>) -> Result<&AuthUser, AppError> {
    match user {
        Some(user) if user.role.is_admin() => Ok(user),
        Some(user) => {
            tracing::info!(account_id = user.account_id, role = %user.role, "Admin route refused");
            Err(AppError::Core(CoreError::Forbidden(NOT_ADMIN.into())))
        }
        None => {
            tracing::warn!("Admin check reached without an authenticated identity");
            Err(AppError::Core(CoreError::Forbidden(NOT_ADMIN.into())))
        }
    }
}

/// Route layer that rejects non-admin callers with 403.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    ensure_admin(req.extensions().get::<AuthUser>())?;
    Ok(next.run(req).await)
}
