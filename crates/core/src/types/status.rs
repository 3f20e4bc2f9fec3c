//! Status and kind enums for catalog entities.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Processing state of a customer application.
///
/// The admin UI only ever moves an application forward
/// (`new` → `processing` → `completed`); the API accepts any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Just submitted from the contact form.
    #[default]
    New,
    /// A manager is working on it.
    Processing,
    /// Closed.
    Completed,
}

impl ApplicationStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 3] = [Self::New, Self::Processing, Self::Completed];

    /// The status the UI offers as the next step, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::Processing),
            Self::Processing => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid application status: {s}")),
        }
    }
}

/// What a media record shows on the about page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// Quality or conformity certificate scan.
    Certificate,
    /// Partner company logo.
    Partner,
}

impl MediaType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Certificate => "certificate",
            Self::Partner => "partner",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "certificate" => Ok(Self::Certificate),
            "partner" => Ok(Self::Partner),
            _ => Err(format!("invalid media type: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_status_moves_forward_only() {
        assert_eq!(
            ApplicationStatus::New.next(),
            Some(ApplicationStatus::Processing)
        );
        assert_eq!(
            ApplicationStatus::Processing.next(),
            Some(ApplicationStatus::Completed)
        );
        assert_eq!(ApplicationStatus::Completed.next(), None);
    }

    #[test]
    fn test_status_parse_matches_display() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.to_string().parse::<ApplicationStatus>(), Ok(status));
        }
        assert!("done".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_media_type_wire_values() {
        assert_eq!(
            serde_json::to_string(&MediaType::Certificate).ok().as_deref(),
            Some("\"certificate\"")
        );
        assert_eq!("partner".parse::<MediaType>(), Ok(MediaType::Partner));
    }
}
