//! Admin account repository.

use sqlx::SqlitePool;

use visa_desk_core::{AdminId, Email};

use super::{RepositoryError, map_unique_violation, parse_timestamp};
use crate::models::Admin;

/// Raw `admin` row.
#[derive(sqlx::FromRow)]
struct AdminRow {
    id: AdminId,
    email: String,
    name: String,
    created_at: String,
}

impl TryFrom<AdminRow> for Admin {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            name: row.name,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Raw `admin` row including the password hash.
#[derive(sqlx::FromRow)]
struct AdminWithHashRow {
    #[sqlx(flatten)]
    admin: AdminRow,
    password_hash: String,
}

/// Repository for admin account operations.
pub struct AdminRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an admin by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, name, created_at FROM admin WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Admin::try_from)
        .transpose()
    }

    /// Get an admin by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, name, created_at FROM admin WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .map(Admin::try_from)
        .transpose()
    }

    /// Get an admin together with their password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Admin, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminWithHashRow>(
            "SELECT id, email, name, created_at, password_hash FROM admin WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((Admin::try_from(r.admin)?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Create a new admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<Admin, RepositoryError> {
        sqlx::query_as::<_, AdminRow>(
            r"
            INSERT INTO admin (email, name, password_hash)
            VALUES (?, ?, ?)
            RETURNING id, email, name, created_at
            ",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email"))?
        .try_into()
    }
}
