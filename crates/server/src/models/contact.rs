//! Contact form submission domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use visa_desk_core::ContactId;

/// A stored contact form post.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
