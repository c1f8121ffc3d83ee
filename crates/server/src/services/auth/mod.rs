//! Authentication service.
//!
//! Local email and password accounts with Argon2id hashes.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::SqlitePool;

use visa_desk_core::Email;

use crate::config::BootstrapAdmin;
use crate::db::{AdminRepository, RepositoryError};
use crate::models::Admin;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Argon2id hash with default parameters that no password matches.
///
/// Verified against when the email is unknown, so a failed login costs the
/// same whether or not the account exists.
const UNKNOWN_ADMIN_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$QCEkicgmCbX8uhK7rSA0+nW1qx4lEz7hQzM+4fcLe3M";

/// Input for creating an admin account.
#[derive(Debug, Clone, Copy)]
pub struct NewAdmin<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: &'a str,
}

/// Authentication service.
///
/// Handles admin registration and login.
pub struct AuthService<'a> {
    admins: AdminRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            admins: AdminRepository::new(pool),
        }
    }

    /// Register a new admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::MissingName` if the name is blank.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AdminAlreadyExists` if the email is already registered.
    pub async fn register(&self, new_admin: NewAdmin<'_>) -> Result<Admin, AuthError> {
        let email = Email::parse(new_admin.email)?;

        let name = new_admin.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }

        validate_password(new_admin.password)?;
        let password_hash = hash_password(new_admin.password)?;

        let admin = self
            .admins
            .create(&email, name, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AdminAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(admin_id = %admin.id, "Admin account created");
        Ok(admin)
    }

    /// Register from the signup form, which asks for the password twice.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` if the two passwords differ,
    /// otherwise the same errors as [`AuthService::register`].
    pub async fn signup(
        &self,
        new_admin: NewAdmin<'_>,
        password_confirm: &str,
    ) -> Result<Admin, AuthError> {
        if new_admin.password != password_confirm {
            return Err(AuthError::PasswordMismatch);
        }
        self.register(new_admin).await
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Admin, AuthError> {
        let found = match Email::parse(email) {
            Ok(email) => self.admins.get_password_hash(&email).await?,
            Err(_) => None,
        };

        let Some((admin, password_hash)) = found else {
            // Pay the hashing cost anyway; the result is always a mismatch
            let _ = verify_password(password, UNKNOWN_ADMIN_HASH);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(admin)
    }

    /// Create the configured bootstrap admin unless that email already exists.
    ///
    /// Returns `true` if an account was created.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the configured credentials are invalid or the
    /// database operation fails.
    pub async fn ensure_bootstrap_admin(&self, bootstrap: &BootstrapAdmin) -> Result<bool, AuthError> {
        let email = Email::parse(&bootstrap.email)?;
        if self.admins.get_by_email(&email).await?.is_some() {
            return Ok(false);
        }

        let created = self
            .register(NewAdmin {
                email: email.as_str(),
                name: &bootstrap.name,
                password: bootstrap.password.expose_secret(),
            })
            .await;

        match created {
            Ok(_) => Ok(true),
            // Another instance seeded it between the lookup and the insert
            Err(AuthError::AdminAlreadyExists) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ADMIN_PASSWORD_GUESS: &str = "correct horse battery";

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("eight-ch").is_ok());
    }

    #[test]
    fn test_hash_is_argon2id_phc() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse battery", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_admin_hash_is_verified_not_skipped() {
        // A parse failure would return before any Argon2 work
        let parsed = PasswordHash::new(UNKNOWN_ADMIN_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(matches!(
            verify_password(ADMIN_PASSWORD_GUESS, UNKNOWN_ADMIN_HASH),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
