//! JWT issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying a [`Claims`] payload. The payload is
//! authenticated, not encrypted: nothing beyond the account id and role goes
//! in it. Tokens are stateless and stay valid until `exp`, even if the
//! account's role changes or the account is deleted in the meantime.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tienda_core::roles::Role;
use tienda_core::types::DbId;
use uuid::Uuid;

use crate::config::{env_or, ConfigError};

/// Default lifetime of a `usuario` token.
const DEFAULT_USER_EXPIRY_MINS: i64 = 60;
/// Default lifetime of an `admin` token.
const DEFAULT_ADMIN_EXPIRY_DAYS: i64 = 30;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject -- the account's internal database id.
    pub sub: DbId,
    pub role: Role,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier, kept for audit and a future denylist.
    pub jti: String,
}

/// Signing secret and per-role token lifetimes.
///
/// Lifetimes are validated on construction: always positive and within
/// `chrono::Duration`'s range.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    user_ttl: Duration,
    admin_ttl: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("user_ttl", &self.user_ttl)
            .field("admin_ttl", &self.admin_ttl)
            .finish()
    }
}

impl JwtConfig {
    /// Build a config with the default lifetimes (1 hour / 30 days).
    ///
    /// An empty or whitespace-only secret is rejected: tokens must never be
    /// signed with a blank key.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Self {
            secret,
            user_ttl: Duration::zero(),
            admin_ttl: Duration::zero(),
        }
        .with_lifetimes(DEFAULT_USER_EXPIRY_MINS, DEFAULT_ADMIN_EXPIRY_DAYS)
    }

    /// Replace the token lifetimes. Zero, negative or out-of-range values
    /// are rejected with [`ConfigError::Invalid`].
    pub fn with_lifetimes(
        mut self,
        user_expiry_mins: i64,
        admin_expiry_days: i64,
    ) -> Result<Self, ConfigError> {
        self.user_ttl =
            positive_ttl("JWT_USER_EXPIRY_MINS", user_expiry_mins, Duration::try_minutes)?;
        self.admin_ttl =
            positive_ttl("JWT_ADMIN_EXPIRY_DAYS", admin_expiry_days, Duration::try_days)?;
        Ok(self)
    }

    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `JWT_SECRET`            | **yes**  | --      |
    /// | `JWT_USER_EXPIRY_MINS`  | no       | `60`    |
    /// | `JWT_ADMIN_EXPIRY_DAYS` | no       | `30`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        Self::new(secret)?.with_lifetimes(
            env_or("JWT_USER_EXPIRY_MINS", DEFAULT_USER_EXPIRY_MINS)?,
            env_or("JWT_ADMIN_EXPIRY_DAYS", DEFAULT_ADMIN_EXPIRY_DAYS)?,
        )
    }

    pub fn user_ttl(&self) -> Duration {
        self.user_ttl
    }

    pub fn admin_ttl(&self) -> Duration {
        self.admin_ttl
    }
}

fn positive_ttl(
    key: &'static str,
    value: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError> {
    to_duration(value)
        .filter(|ttl| *ttl > Duration::zero())
        .ok_or_else(|| ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Malformed, tampered or expired. Callers are not told which.
    #[error("Invalid or expired token")]
    Invalid,

    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies access tokens. Cheap to clone.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    user_ttl: Duration,
    admin_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            user_ttl: config.user_ttl,
            admin_ttl: config.admin_ttl,
        }
    }

    /// Lifetime of a token issued for `role`.
    pub fn ttl_for(&self, role: Role) -> Duration {
        match role {
            Role::Admin => self.admin_ttl,
            Role::User => self.user_ttl,
        }
    }

    /// Sign a token for `subject` with an expiry that depends on `role`.
    pub fn issue(&self, subject: DbId, role: Role) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject,
            role,
            exp: now + self.ttl_for(role).num_seconds(),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Check signature and expiry and return the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::Invalid
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_service() -> TokenService {
        let config = JwtConfig::new("test-secret-that-is-long-enough-for-hmac").unwrap();
        TokenService::new(&config)
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = test_service();
        let token = tokens.issue(42, Role::Admin).expect("token generation should succeed");

        let claims = tokens.verify(&token).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_user_token_lasts_one_hour() {
        let tokens = test_service();
        let before = Utc::now().timestamp();
        let claims = tokens.verify(&tokens.issue(1, Role::User).unwrap()).unwrap();

        let expected = before + 3600;
        assert!((claims.exp - expected).abs() <= 5, "exp {} vs {expected}", claims.exp);
    }

    #[test]
    fn test_admin_token_lasts_thirty_days() {
        let tokens = test_service();
        let before = Utc::now().timestamp();
        let claims = tokens.verify(&tokens.issue(1, Role::Admin).unwrap()).unwrap();

        let expected = before + 30 * 24 * 3600;
        assert!((claims.exp - expected).abs() <= 5, "exp {} vs {expected}", claims.exp);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = JwtConfig::new("test-secret-that-is-long-enough-for-hmac").unwrap();
        let tokens = TokenService::new(&config);

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: Role::User,
            exp: now - 120,
            iat: now - 3720,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-that-is-long-enough-for-hmac"),
        )
        .expect("encoding should succeed");

        assert_matches!(tokens.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_different_secrets_fail() {
        let a = TokenService::new(&JwtConfig::new("secret-alpha").unwrap());
        let b = TokenService::new(&JwtConfig::new("secret-bravo").unwrap());

        let token = a.issue(1, Role::User).unwrap();
        assert_matches!(b.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_malformed_token_fails() {
        let tokens = test_service();
        assert_matches!(tokens.verify("not.a.jwt"), Err(TokenError::Invalid));
        assert_matches!(tokens.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let tokens = test_service();
        let token = tokens.issue(7, Role::User).unwrap();

        // Swap in the payload of an admin token, keeping the user token's signature.
        let admin = tokens.issue(7, Role::Admin).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

        assert_matches!(tokens.verify(&forged), Err(TokenError::Invalid));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert_matches!(JwtConfig::new(""), Err(ConfigError::EmptySecret));
        assert_matches!(JwtConfig::new("   "), Err(ConfigError::EmptySecret));
    }

    #[test]
    fn test_non_positive_lifetimes_are_rejected() {
        let config = JwtConfig::new("secret").unwrap();
        assert_matches!(
            config.clone().with_lifetimes(60, -1),
            Err(ConfigError::Invalid { key: "JWT_ADMIN_EXPIRY_DAYS", ref value }) if value == "-1"
        );
        assert_matches!(
            config.with_lifetimes(0, 30),
            Err(ConfigError::Invalid { key: "JWT_USER_EXPIRY_MINS", .. })
        );
    }

    #[test]
    fn test_overflowing_lifetime_is_an_error_not_a_panic() {
        let config = JwtConfig::new("secret").unwrap();
        assert_matches!(
            config.clone().with_lifetimes(60, 200_000_000_000),
            Err(ConfigError::Invalid { key: "JWT_ADMIN_EXPIRY_DAYS", .. })
        );
        assert_matches!(
            config.with_lifetimes(i64::MAX, 30),
            Err(ConfigError::Invalid { key: "JWT_USER_EXPIRY_MINS", .. })
        );
    }

    #[test]
    fn test_custom_lifetimes_drive_expiry() {
        let config = JwtConfig::new("secret").unwrap().with_lifetimes(5, 2).unwrap();
        assert_eq!(config.user_ttl(), Duration::minutes(5));
        assert_eq!(config.admin_ttl(), Duration::days(2));

        let tokens = TokenService::new(&config);
        let claims = tokens.verify(&tokens.issue(1, Role::Admin).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 2 * 24 * 3600);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new("super-secret-value").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-value"));
    }
}
