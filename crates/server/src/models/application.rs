//! Visa application domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use visa_desk_core::{ApplicationId, ApplicationStatus, FormType};

/// A stored visa application or quick-apply request.
///
/// Descriptive fields are whatever the public form sent; only `status`
/// changes after creation.
#[derive(Debug, Clone, Serialize)]
pub struct VisaApplication {
    pub id: ApplicationId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub visa_type: Option<String>,
    pub nationality: Option<String>,
    pub source_country: Option<String>,
    pub destination: Option<String>,
    pub travel_date: Option<String>,
    pub communication_method: Option<String>,
    pub message: Option<String>,
    pub form_type: FormType,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Per-status counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub new: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl ApplicationStats {
    /// Count applications per status.
    #[must_use]
    pub fn tally(applications: &[VisaApplication]) -> Self {
        applications
            .iter()
            .fold(Self::default(), |mut stats, application| {
                stats.total += 1;
                match application.status {
                    ApplicationStatus::New => stats.new += 1,
                    ApplicationStatus::InProgress => stats.in_progress += 1,
                    ApplicationStatus::Completed => stats.completed += 1,
                }
                stats
            })
    }

    /// Count for a single status.
    #[must_use]
    pub const fn count(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::New => self.new,
            ApplicationStatus::InProgress => self.in_progress,
            ApplicationStatus::Completed => self.completed,
        }
    }
}
