//! Admin account domain type.

use chrono::{DateTime, Utc};

use visa_desk_core::{AdminId, Email};

/// A dashboard account (domain type). The password hash never leaves the
/// repository layer.
#[derive(Debug, Clone)]
pub struct Admin {
    /// Unique admin ID.
    pub id: AdminId,
    /// Login email, stored lowercased.
    pub email: Email,
    /// Display name shown in the dashboard header.
    pub name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
