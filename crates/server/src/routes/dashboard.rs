//! Admin dashboard pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use visa_desk_core::{ApplicationId, ApplicationStatus};

use crate::{
    db::{ApplicationRepository, ContactRepository},
    error::AppError,
    filters,
    middleware::RequireAdminAuth,
    models::{ApplicationStats, ContactSubmission, CurrentAdmin, VisaApplication},
    state::AppState,
};

/// Timestamp format for table cells.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Logged-in admin shown in the page header.
#[derive(Debug, Clone)]
pub struct AdminView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
        }
    }
}

/// One status tab with its count.
#[derive(Debug, Clone)]
pub struct StatusTab {
    pub value: String,
    pub label: String,
    pub count: usize,
    pub active: bool,
}

/// Entry in the detail page's status select.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Application row for templates. Missing fields render as empty strings.
#[derive(Debug, Clone)]
pub struct ApplicationView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub visa_type: String,
    pub nationality: String,
    pub source_country: String,
    pub destination: String,
    pub travel_date: String,
    pub communication_method: String,
    pub message: String,
    pub form_type: String,
    pub status: String,
    pub status_label: String,
    pub submitted_at: String,
}

impl From<&VisaApplication> for ApplicationView {
    fn from(application: &VisaApplication) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            id: application.id.as_i64(),
            name: text(&application.name),
            email: text(&application.email),
            phone: text(&application.phone),
            visa_type: text(&application.visa_type),
            nationality: text(&application.nationality),
            source_country: text(&application.source_country),
            destination: text(&application.destination),
            travel_date: text(&application.travel_date),
            communication_method: text(&application.communication_method),
            message: text(&application.message),
            form_type: application.form_type.to_string(),
            status: application.status.as_str().to_string(),
            status_label: application.status.label().to_string(),
            submitted_at: application.submitted_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Contact message row for templates.
#[derive(Debug, Clone)]
pub struct ContactView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub created_at: String,
}

impl From<&ContactSubmission> for ContactView {
    fn from(contact: &ContactSubmission) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            subject: contact.subject.clone(),
            message: contact.message.clone(),
            created_at: contact.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin: AdminView,
    pub stats: ApplicationStats,
    pub tabs: Vec<StatusTab>,
    pub filter: String,
    pub applications: Vec<ApplicationView>,
    pub contacts: Vec<ContactView>,
}

/// Application detail template.
#[derive(Template, WebTemplate)]
#[template(path = "application_detail.html")]
pub struct ApplicationDetailTemplate {
    pub admin: AdminView,
    pub application: ApplicationView,
    pub statuses: Vec<StatusOption>,
}

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub admin: AdminView,
    pub message: String,
}

/// Query parameters for the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
}

/// Build the status tabs. Counts always come from the full list.
fn status_tabs(stats: &ApplicationStats, active: Option<ApplicationStatus>) -> Vec<StatusTab> {
    ApplicationStatus::ALL
        .iter()
        .map(|status| StatusTab {
            value: status.as_str().to_string(),
            label: status.label().to_string(),
            count: stats.count(*status),
            active: active == Some(*status),
        })
        .collect()
}

/// Every status, with the current one selected.
fn status_options(current: ApplicationStatus) -> Vec<StatusOption> {
    ApplicationStatus::ALL
        .iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: *status == current,
        })
        .collect()
}

/// Dashboard page handler.
///
/// GET /admin?status=
///
/// An unrecognized status filter is ignored and the full list is shown.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<DashboardTemplate, AppError> {
    let filter = query
        .status
        .as_deref()
        .and_then(|raw| raw.parse::<ApplicationStatus>().ok());

    let all = ApplicationRepository::new(state.pool()).list(None).await?;
    let stats = ApplicationStats::tally(&all);

    let applications = all
        .iter()
        .filter(|application| filter.is_none_or(|status| application.status == status))
        .map(ApplicationView::from)
        .collect();

    let contacts = ContactRepository::new(state.pool())
        .list()
        .await?
        .iter()
        .map(ContactView::from)
        .collect();

    Ok(DashboardTemplate {
        admin: AdminView::from(&admin),
        tabs: status_tabs(&stats, filter),
        filter: filter.map(|s| s.as_str().to_string()).unwrap_or_default(),
        stats,
        applications,
        contacts,
    })
}

/// Application detail page handler.
///
/// GET /admin/applications/{id}
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
) -> Result<Response, AppError> {
    let admin = AdminView::from(&admin);

    let Some(application) = ApplicationRepository::new(state.pool()).get(id).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            NotFoundTemplate {
                admin,
                message: format!("Application {id} does not exist or was deleted."),
            },
        )
            .into_response());
    };

    Ok(ApplicationDetailTemplate {
        admin,
        statuses: status_options(application.status),
        application: ApplicationView::from(&application),
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};
    use visa_desk_core::FormType;

    use super::*;

    #[test]
    fn test_status_tabs_mark_active() {
        let stats = ApplicationStats {
            total: 4,
            new: 2,
            in_progress: 1,
            completed: 1,
        };
        let tabs = status_tabs(&stats, Some(ApplicationStatus::InProgress));

        assert_eq!(tabs.len(), 3);
        assert_eq!(tabs[0].value, "new");
        assert_eq!(tabs[0].count, 2);
        assert!(!tabs[0].active);
        assert!(tabs[1].active);
        assert_eq!(tabs.iter().map(|t| t.count).sum::<usize>(), stats.total);
    }

    #[test]
    fn test_status_options_select_current() {
        let options = status_options(ApplicationStatus::Completed);

        assert_eq!(
            options.iter().map(|o| o.value).collect::<Vec<_>>(),
            ["new", "in_progress", "completed"]
        );
        assert_eq!(
            options.iter().filter(|o| o.selected).map(|o| o.value).collect::<Vec<_>>(),
            ["completed"]
        );
    }

    #[test]
    fn test_application_view_blanks_missing_fields() {
        let application = VisaApplication {
            id: ApplicationId::new(7),
            name: Some("Amara Obi".to_string()),
            email: None,
            phone: None,
            visa_type: Some("tourist".to_string()),
            nationality: None,
            source_country: None,
            destination: Some("Canada".to_string()),
            travel_date: None,
            communication_method: None,
            message: None,
            form_type: FormType::Callback,
            status: ApplicationStatus::InProgress,
            submitted_at: Utc.with_ymd_and_hms(2026, 5, 2, 14, 30, 0).unwrap(),
        };

        let view = ApplicationView::from(&application);
        assert_eq!(view.id, 7);
        assert_eq!(view.email, "");
        assert_eq!(view.form_type, "callback");
        assert_eq!(view.status, "in_progress");
        assert_eq!(view.status_label, "In Progress");
        assert_eq!(view.submitted_at, "2026-05-02 14:30");
    }
}
