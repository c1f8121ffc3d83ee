//! Visa application repository.

use sqlx::SqlitePool;

use visa_desk_core::{ApplicationId, ApplicationStatus, FormType, VisaIntake};

use super::{RepositoryError, parse_timestamp};
use crate::models::VisaApplication;

const COLUMNS: &str = "id, name, email, phone, visa_type, nationality, source_country, \
                       destination, travel_date, communication_method, message, form_type, \
                       status, submitted_at";

/// Raw `visa_application` row.
#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: ApplicationId,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    visa_type: Option<String>,
    nationality: Option<String>,
    source_country: Option<String>,
    destination: Option<String>,
    travel_date: Option<String>,
    communication_method: Option<String>,
    message: Option<String>,
    form_type: String,
    status: String,
    submitted_at: String,
}

impl TryFrom<ApplicationRow> for VisaApplication {
    type Error = RepositoryError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<ApplicationStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("application {}: {e}", row.id))
        })?;
        let form_type = row.form_type.parse::<FormType>().map_err(|e| {
            RepositoryError::DataCorruption(format!("application {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            visa_type: row.visa_type,
            nationality: row.nationality,
            source_country: row.source_country,
            destination: row.destination,
            travel_date: row.travel_date,
            communication_method: row.communication_method,
            message: row.message,
            form_type,
            status,
            submitted_at: parse_timestamp(&row.submitted_at)?,
        })
    }
}

/// Repository for visa application operations.
pub struct ApplicationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ApplicationRepository<'a> {
    /// Create a new application repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a normalized submission. New records always start as `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, intake: &VisaIntake) -> Result<VisaApplication, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO visa_application (
                name, email, phone, visa_type, nationality, source_country,
                destination, travel_date, communication_method, message, form_type, status
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "
        );

        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(intake.name.as_deref())
            .bind(intake.email.as_deref())
            .bind(intake.phone.as_deref())
            .bind(intake.visa_type.as_deref())
            .bind(intake.nationality.as_deref())
            .bind(intake.source_country.as_deref())
            .bind(intake.destination.as_deref())
            .bind(intake.travel_date.as_deref())
            .bind(intake.communication_method.as_deref())
            .bind(intake.message.as_deref())
            .bind(intake.form_type.as_str())
            .bind(ApplicationStatus::New.as_str())
            .fetch_one(self.pool)
            .await?
            .try_into()
    }

    /// List applications, newest first, optionally narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<VisaApplication>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {COLUMNS}
            FROM visa_application
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY submitted_at DESC, id DESC
            "
        );

        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(status.as_ref().map(ApplicationStatus::as_str))
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(VisaApplication::try_from)
            .collect()
    }

    /// Get an application by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: ApplicationId) -> Result<Option<VisaApplication>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM visa_application WHERE id = ?");

        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(VisaApplication::try_from)
            .transpose()
    }

    /// Set the status of one application, returning the updated record.
    ///
    /// Returns `None` if no application has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Option<VisaApplication>, RepositoryError> {
        let sql = format!("UPDATE visa_application SET status = ? WHERE id = ? RETURNING {COLUMNS}");

        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(VisaApplication::try_from)
            .transpose()
    }

    /// Delete an application.
    ///
    /// # Returns
    ///
    /// Returns `true` if a record was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ApplicationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM visa_application WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
