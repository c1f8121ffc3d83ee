//! Public form intake endpoints.
//!
//! The marketing site posts visa, quick-apply and contact forms here, either
//! as JSON or urlencoded. Field names vary between forms and are normalized
//! by [`visa_desk_core::intake`].

use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use visa_desk_core::{ContactIntake, IntakeFields, VisaIntake};

use crate::db::{ApplicationRepository, ContactRepository};
use crate::error::AppError;
use crate::state::AppState;

/// Raw submitted fields, decoded according to the request content type.
///
/// - `application/json`: the body must be a JSON object
/// - `application/x-www-form-urlencoded`: decoded as key/value pairs
/// - anything else: 415
pub struct IntakePayload(pub IntakeFields);

enum BodyFormat {
    Json,
    Form,
    Unsupported(String),
}

fn body_format(content_type: Option<&str>) -> BodyFormat {
    let Some(content_type) = content_type else {
        return BodyFormat::Unsupported("missing content type".to_string());
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => BodyFormat::Json,
        "application/x-www-form-urlencoded" => BodyFormat::Form,
        _ => BodyFormat::Unsupported(format!("unsupported content type '{mime}'")),
    }
}

impl<S> FromRequest<S> for IntakePayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());

        match body_format(content_type) {
            BodyFormat::Json => {
                let Json(value) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(Self(IntakeFields::from_json(&value)?))
            }
            BodyFormat::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(Self(IntakeFields::from_pairs(pairs)))
            }
            BodyFormat::Unsupported(reason) => Err(AppError::UnsupportedMediaType(reason)),
        }
    }
}

/// Response for a stored submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: i64,
}

/// Store a visa application or quick-apply request.
///
/// POST /api/visa (also /api/visa-submissions, /api/quick-apply)
///
/// Every field is optional, so any well-formed body is stored.
#[instrument(skip_all)]
pub async fn submit_visa(
    State(state): State<AppState>,
    IntakePayload(fields): IntakePayload,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let intake = VisaIntake::from_fields(&fields);

    let application = ApplicationRepository::new(state.pool())
        .create(&intake)
        .await?;

    tracing::info!(
        application_id = %application.id,
        form_type = %application.form_type,
        "Visa application received"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            message: "Application submitted successfully. We will contact you soon!",
            id: application.id.as_i64(),
        }),
    ))
}

/// Store a contact form message.
///
/// POST /api/contact
///
/// Name, email, phone, subject and message are all required; nothing is
/// stored if any is missing.
#[instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<AppState>,
    IntakePayload(fields): IntakePayload,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let intake = ContactIntake::from_fields(&fields).inspect_err(|e| {
        tracing::info!(error = %e, "Contact submission rejected");
    })?;

    let contact = ContactRepository::new(state.pool()).create(&intake).await?;

    tracing::info!(contact_id = %contact.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            message: "Contact form submitted successfully",
            id: contact.id.as_i64(),
        }),
    ))
}
