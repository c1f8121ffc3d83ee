//! Contact submission repository.

use sqlx::SqlitePool;

use visa_desk_core::{ContactId, ContactIntake};

use super::{RepositoryError, parse_timestamp};
use crate::models::ContactSubmission;

/// Raw `contact_submission` row.
#[derive(sqlx::FromRow)]
struct ContactRow {
    id: ContactId,
    name: String,
    email: String,
    phone: String,
    subject: String,
    message: String,
    created_at: String,
}

impl TryFrom<ContactRow> for ContactSubmission {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            subject: row.subject,
            message: row.message,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Repository for contact submissions.
pub struct ContactRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a validated contact submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, intake: &ContactIntake) -> Result<ContactSubmission, RepositoryError> {
        sqlx::query_as::<_, ContactRow>(
            r"
            INSERT INTO contact_submission (name, email, phone, subject, message)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, phone, subject, message, created_at
            ",
        )
        .bind(&intake.name)
        .bind(&intake.email)
        .bind(&intake.phone)
        .bind(&intake.subject)
        .bind(&intake.message)
        .fetch_one(self.pool)
        .await?
        .try_into()
    }

    /// List contact submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self) -> Result<Vec<ContactSubmission>, RepositoryError> {
        sqlx::query_as::<_, ContactRow>(
            r"
            SELECT id, name, email, phone, subject, message, created_at
            FROM contact_submission
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(ContactSubmission::try_from)
        .collect()
    }
}
