//! Normalization of public form submissions.
//!
//! The public site posts the same logical fields under several spellings
//! (`fullName`, `full_name`, `name`, ...), sometimes as JSON and sometimes
//! form-encoded. [`IntakeFields`] holds the raw trimmed values and the intake
//! types below resolve them into canonical records.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::types::FormType;

/// Accepted keys per canonical field, in priority order.
mod aliases {
    pub const NAME: &[&str] = &["fullName", "full_name", "name"];
    pub const EMAIL: &[&str] = &["emailAddress", "email_address", "email"];
    pub const PHONE: &[&str] = &["phoneNumber", "phone_number", "phone"];
    pub const VISA_TYPE: &[&str] = &["visaType", "visa_type"];
    pub const NATIONALITY: &[&str] = &["nationality", "passportCountry", "passport_country"];
    pub const SOURCE_COUNTRY: &[&str] =
        &["countryApplyingFrom", "country_applying_from", "country"];
    pub const DESTINATION: &[&str] = &["destination"];
    pub const TRAVEL_DATE: &[&str] = &["travelDate", "travel_date", "returnDate", "return_date"];
    pub const COMMUNICATION_METHOD: &[&str] = &["communicationMethod", "communication_method"];
    pub const MESSAGE: &[&str] = &["message"];
    pub const SUBJECT: &[&str] = &["subject"];
    pub const FORM_TYPE: &[&str] = &["form_type", "formType"];
}

/// Errors produced while reading a submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// A JSON body was something other than an object.
    #[error("request body must be a JSON object")]
    NotAnObject,
    /// One or more required fields were absent after normalization.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Raw submitted values keyed by the name the client used.
///
/// Values are trimmed and empty values are dropped on construction. When a key
/// repeats, the first value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeFields(BTreeMap<String, String>);

impl IntakeFields {
    /// Build from decoded key/value pairs, such as a urlencoded body.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut fields = BTreeMap::new();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            fields.entry(key.into()).or_insert_with(|| value.to_owned());
        }
        Self(fields)
    }

    /// Build from a JSON object body.
    ///
    /// Strings are kept, numbers and booleans are stringified, and `null`,
    /// arrays and nested objects are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::NotAnObject`] if `value` is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, IntakeError> {
        let Value::Object(map) = value else {
            return Err(IntakeError::NotAnObject);
        };

        Ok(Self::from_pairs(map.iter().filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key.clone(), text))
        })))
    }

    /// Value submitted under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of the first key in `keys` that was submitted.
    #[must_use]
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|key| self.get(key))
            .map(ToOwned::to_owned)
    }
}

/// A normalized visa application or quick-apply submission.
///
/// Every descriptive field is optional; the public forms vary in what they
/// collect and the endpoint stores whatever arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisaIntake {
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
}

impl VisaIntake {
    /// Resolve canonical fields and infer the form type.
    #[must_use]
    pub fn from_fields(fields: &IntakeFields) -> Self {
        let communication_method = fields.first_of(aliases::COMMUNICATION_METHOD);
        let message = fields.first_of(aliases::MESSAGE);

        let form_type = fields.first_of(aliases::FORM_TYPE).map_or_else(
            || match (&communication_method, &message) {
                (Some(_), Some(_)) => FormType::Consultation,
                (Some(_), None) => FormType::Callback,
                _ => FormType::Unknown,
            },
            |explicit| FormType::parse_lenient(&explicit),
        );

        Self {
            name: fields.first_of(aliases::NAME),
            email: fields.first_of(aliases::EMAIL),
            phone: fields.first_of(aliases::PHONE),
            visa_type: fields.first_of(aliases::VISA_TYPE),
            nationality: fields.first_of(aliases::NATIONALITY),
            source_country: fields.first_of(aliases::SOURCE_COUNTRY),
            destination: fields.first_of(aliases::DESTINATION),
            travel_date: fields.first_of(aliases::TRAVEL_DATE),
            communication_method,
            message,
            form_type,
        }
    }
}

/// A normalized contact form submission. All fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactIntake {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactIntake {
    /// Canonical names of the required fields, in report order.
    pub const REQUIRED: [&'static str; 5] = ["name", "email", "phone", "subject", "message"];

    /// Resolve canonical fields, reporting every missing one at once.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingFields`] listing each absent field.
    pub fn from_fields(fields: &IntakeFields) -> Result<Self, IntakeError> {
        let name = fields.first_of(aliases::NAME);
        let email = fields.first_of(aliases::EMAIL);
        let phone = fields.first_of(aliases::PHONE);
        let subject = fields.first_of(aliases::SUBJECT);
        let message = fields.first_of(aliases::MESSAGE);

        match (name, email, phone, subject, message) {
            (Some(name), Some(email), Some(phone), Some(subject), Some(message)) => Ok(Self {
                name,
                email,
                phone,
                subject,
                message,
            }),
            (name, email, phone, subject, message) => {
                let present = [
                    name.is_some(),
                    email.is_some(),
                    phone.is_some(),
                    subject.is_some(),
                    message.is_some(),
                ];
                let missing = Self::REQUIRED
                    .iter()
                    .zip(present)
                    .filter(|(_, present)| !present)
                    .map(|(field, _)| *field)
                    .collect();
                Err(IntakeError::MissingFields(missing))
            }
        }
    }
}
