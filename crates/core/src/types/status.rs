//! Status enums for submission records.

use serde::{Deserialize, Serialize};

/// Error returned when a status or form type string is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

/// Lowercases and folds `-` and spaces into `_` so "In Progress" and
/// "in-progress" both read as `in_progress`.
fn fold(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Triage state of a visa application.
///
/// Every application starts as [`ApplicationStatus::New`]. Admins may move it
/// between any of the three states, including back to `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    New,
    InProgress,
    Completed,
}

impl ApplicationStatus {
    /// All statuses in dashboard display order.
    pub const ALL: [Self; 3] = [Self::New, Self::InProgress, Self::Completed];

    /// The stored and serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "new" => Ok(Self::New),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError {
                kind: "application status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Which public form produced a visa application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    /// Full consultation request (contact method plus a message).
    Consultation,
    /// Quick callback request (contact method only).
    Callback,
    #[default]
    Unknown,
}

impl FormType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Consultation => "consultation",
            Self::Callback => "callback",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a client-supplied tag, mapping anything unrecognized to `Unknown`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FormType {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "consultation" => Ok(Self::Consultation),
            "callback" | "quick_apply" => Ok(Self::Callback),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParseStatusError {
                kind: "form type",
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_canonical() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_lenient_spelling() {
        assert_eq!(
            "In Progress".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::InProgress
        );
        assert_eq!(
            " in-progress ".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::InProgress
        );
        assert_eq!(
            "COMPLETED".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Completed
        );
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = "archived".parse::<ApplicationStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid application status: archived");
        assert!("".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&ApplicationStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let parsed: ApplicationStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Completed);
    }

    #[test]
    fn test_status_default_is_new() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::New);
    }

    #[test]
    fn test_form_type_lenient() {
        assert_eq!(FormType::parse_lenient("Consultation"), FormType::Consultation);
        assert_eq!(FormType::parse_lenient("quick-apply"), FormType::Callback);
        assert_eq!(FormType::parse_lenient("newsletter"), FormType::Unknown);
    }
}
