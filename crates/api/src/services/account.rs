//! Registration, login and account management.
//!
//! Every operation returns [`CoreError`] so the service can be driven from
//! tests without an HTTP stack. Role checks here are the authoritative ones;
//! route middleware only rejects earlier.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tienda_core::email::{normalize_email, validate_email};
use tienda_core::error::CoreError;
use tienda_core::roles::Role;
use tienda_core::types::DbId;
use tienda_db::models::account::{AccountResponse, CreateAccount, UpdateAccount};
use tienda_db::{AccountStore, StoreError};

use crate::auth::jwt::{TokenError, TokenService};
use crate::auth::password::{hash_password, verify_password};

/// Body of a self-registration request. Every field is optional so a missing
/// one becomes a 400 with a readable message instead of a deserialization
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(alias = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Accepted for compatibility and ignored: self-registration always
    /// creates a `usuario`.
    #[serde(alias = "rol")]
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial account update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountInput {
    #[serde(alias = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "rol")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Registration {
    pub account: AccountResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Create a `usuario` account and return it together with a fresh token.
    pub async fn register(&self, input: RegisterInput) -> Result<Registration, CoreError> {
        let (Some(name), Some(email), Some(password)) = (
            non_blank(input.name),
            non_blank(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(CoreError::Validation(
                "Todos los campos son obligatorios".into(),
            ));
        };

        let email = validate_email(&email)?;

        if self
            .store
            .find_account_by_email(&email)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(duplicate_email());
        }

        if let Some(requested) = input.role.as_deref() {
            if requested.parse::<Role>() != Ok(Role::User) {
                tracing::warn!(
                    email = %email,
                    requested_role = requested,
                    "Ignoring caller-supplied role on self-registration"
                );
            }
        }

        let password_hash = hash_password(&password)
            .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;

        // The store's unique constraint is the real duplicate guard; the
        // lookup above only covers the common case.
        let account = self
            .store
            .insert_account(&CreateAccount {
                name,
                email,
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(store_error)?;

        let token = self.tokens.issue(account.id, account.role).map_err(token_error)?;
        tracing::info!(account_id = account.id, "Account registered");

        Ok(Registration {
            account: account.into(),
            token,
        })
    }

    /// Check credentials and issue a token scoped to the account's current role.
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutcome, CoreError> {
        let (Some(email), Some(password)) = (
            non_blank(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(CoreError::Validation(
                "Correo y contraseña son obligatorios".into(),
            ));
        };

        let email = normalize_email(&email);
        let account = self
            .store
            .find_account_by_email(&email)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::InvalidCredentials("Usuario no encontrado".into()))?;

        let valid = verify_password(&password, &account.password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
        if !valid {
            tracing::info!(account_id = account.id, "Login rejected: wrong password");
            return Err(CoreError::InvalidCredentials("Contraseña incorrecta".into()));
        }

        let token = self.tokens.issue(account.id, account.role).map_err(token_error)?;
        tracing::info!(account_id = account.id, role = %account.role, "Login succeeded");

        Ok(LoginOutcome {
            token,
            role: account.role,
        })
    }

    /// All accounts, without password hashes.
    pub async fn list_accounts(&self) -> Result<Vec<AccountResponse>, CoreError> {
        let accounts = self.store.list_accounts().await.map_err(store_error)?;
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    /// Apply a partial update on behalf of a requester with `requester_role`.
    ///
    /// An unknown id is reported before the permission check.
    pub async fn update_account(
        &self,
        id: DbId,
        input: UpdateAccountInput,
        requester_role: Role,
    ) -> Result<AccountResponse, CoreError> {
        let existing = self
            .store
            .find_account(id)
            .await
            .map_err(store_error)?
            .ok_or(CoreError::NotFound {
                entity: "Account",
                id,
            })?;

        if !requester_role.is_admin() {
            return Err(CoreError::Forbidden(
                "No tienes permisos para actualizar usuarios".into(),
            ));
        }

        let mut changes = UpdateAccount::default();

        if let Some(name) = input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(CoreError::Validation("El nombre no puede estar vacío".into()));
            }
            changes.name = Some(name.to_string());
        }

        if let Some(email) = input.email {
            changes.email = Some(validate_email(&email)?);
        }

        if let Some(password) = input.password {
            if password.is_empty() {
                return Err(CoreError::Validation(
                    "La contraseña no puede estar vacía".into(),
                ));
            }
            let hash = hash_password(&password)
                .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;
            changes.password_hash = Some(hash);
        }

        if let Some(role) = input.role {
            let role = role
                .parse::<Role>()
                .map_err(|e| CoreError::Validation(e.to_string()))?;
            changes.role = Some(role);
        }

        if changes.is_empty() {
            return Ok(existing.into());
        }

        let updated = self
            .store
            .update_account(id, &changes)
            .await
            .map_err(store_error)?
            .ok_or(CoreError::NotFound {
                entity: "Account",
                id,
            })?;

        tracing::info!(account_id = id, role = %updated.role, "Account updated");
        Ok(updated.into())
    }

    /// Hard-delete an account. The permission check comes first.
    pub async fn delete_account(&self, id: DbId, requester_role: Role) -> Result<(), CoreError> {
        if !requester_role.is_admin() {
            return Err(CoreError::Forbidden(
                "No tienes permisos para eliminar usuarios".into(),
            ));
        }

        let deleted = self.store.delete_account(id).await.map_err(store_error)?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "Account",
                id,
            });
        }

        tracing::info!(account_id = id, "Account deleted");
        Ok(())
    }

    /// Create the bootstrap admin unless an account with `email` already exists.
    ///
    /// Returns `true` when a new account was created.
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, CoreError> {
        let email = validate_email(email)?;

        if let Some(existing) = self
            .store
            .find_account_by_email(&email)
            .await
            .map_err(store_error)?
        {
            if !existing.role.is_admin() {
                tracing::warn!(
                    account_id = existing.id,
                    "Bootstrap admin email belongs to a non-admin account; leaving it unchanged"
                );
            }
            return Ok(false);
        }

        let name = name.trim();
        if name.is_empty() || password.is_empty() {
            return Err(CoreError::Validation(
                "Bootstrap admin needs a name and a password".into(),
            ));
        }

        let password_hash = hash_password(password)
            .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;

        let result = self
            .store
            .insert_account(&CreateAccount {
                name: name.to_string(),
                email,
                password_hash,
                role: Role::Admin,
            })
            .await;

        match result {
            Ok(account) => {
                tracing::info!(account_id = account.id, "Bootstrap admin account created");
                Ok(true)
            }
            // Another instance created it between the lookup and the insert.
            Err(StoreError::DuplicateEmail(_)) => Ok(false),
            Err(e) => Err(store_error(e)),
        }
    }
}

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn duplicate_email() -> CoreError {
    CoreError::Conflict("El usuario ya existe".into())
}

fn store_error(err: StoreError) -> CoreError {
    match err {
        StoreError::DuplicateEmail(_) => duplicate_email(),
        StoreError::Database(e) => CoreError::Internal(e.to_string()),
    }
}

fn token_error(err: TokenError) -> CoreError {
    CoreError::Internal(err.to_string())
}
