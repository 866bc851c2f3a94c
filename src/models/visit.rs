use chrono::{DateTime, Local};
use uuid::Uuid;

pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn unknown() -> Self {
        Self {
            city: UNKNOWN_LOCATION.to_string(),
            country: UNKNOWN_LOCATION.to_string(),
        }
    }

    pub fn from_parts(city: Option<String>, country: Option<String>) -> Self {
        Self {
            city: city.unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            country: country.unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        }
    }
}

/// A single tracked visit to the site root. Lives only until its
/// notification has been handed to the mailer.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub trace_id: String,
    pub address: Option<String>,
    pub client_signature: String,
    pub location: Location,
}

impl VisitEvent {
    pub fn new(address: Option<String>, client_signature: String, location: Location) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
            address,
            client_signature,
            location,
        }
    }
}

/// Visit stamped with the time the notification was rendered.
#[derive(Debug, Clone)]
pub struct ObservedVisit {
    pub visit: VisitEvent,
    pub observed_at: DateTime<Local>,
}
