//! Token verification for protected routes.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tienda_core::error::CoreError;
use tienda_core::roles::Role;
use tienda_core::types::DbId;

use crate::auth::jwt::TokenService;
use crate::error::AppError;
use crate::state::AppState;

/// Identity of the caller, taken from a verified token.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(account_id = user.account_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account's internal database id (from `claims.sub`).
    pub account_id: DbId,
    /// Role at the time the token was issued.
    pub role: Role,
}

/// Pull the token out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` (scheme matched case-insensitively) or the bare
/// token. Blank values yield `None`.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let value = header.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Verify the request's token and resolve the caller.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthUser, AppError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer)
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Acceso denegado. No hay token.".into(),
            ))
        })?;

    let claims = tokens
        .verify(token)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Token no válido.".into())))?;

    Ok(AuthUser {
        account_id: claims.sub,
        role: claims.role,
    })
}

/// Route layer that rejects unauthenticated requests with 401 and stores the
/// resolved [`AuthUser`] in the request extensions for later stages.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(req.headers(), &state.tokens)?;
    tracing::debug!(account_id = user.account_id, role = %user.role, "Request authenticated");
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        authenticate(&parts.headers, &state.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use crate::auth::jwt::JwtConfig;

    fn tokens() -> TokenService {
        TokenService::new(&JwtConfig::new("middleware-test-secret").unwrap())
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extract_bearer_accepts_both_forms() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("bearer   abc"), Some("abc"));
        assert_eq!(extract_bearer("abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("  "), None);
        assert_eq!(extract_bearer("Bearer "), None);
    }

    #[test]
    fn authenticate_resolves_claims() {
        let tokens = tokens();
        let token = tokens.issue(9, Role::Admin).unwrap();

        let bearer = authenticate(&headers(&format!("Bearer {token}")), &tokens).unwrap();
        assert_eq!(bearer.account_id, 9);
        assert_eq!(bearer.role, Role::Admin);

        let raw = authenticate(&headers(&token), &tokens).unwrap();
        assert_eq!(raw.account_id, 9);
    }

    #[test]
    fn missing_or_bad_token_is_unauthorized() {
        let tokens = tokens();
        assert_matches!(
            authenticate(&HeaderMap::new(), &tokens),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
        assert_matches!(
            authenticate(&headers("Bearer not.a.jwt"), &tokens),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );

        let foreign = TokenService::new(&JwtConfig::new("another-secret").unwrap())
            .issue(1, Role::Admin)
            .unwrap();
        assert_matches!(
            authenticate(&headers(&foreign), &tokens),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }
}
