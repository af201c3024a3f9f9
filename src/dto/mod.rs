use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Score-entry request/response types.
pub mod entry;
/// Health check response.
pub mod health;
/// Current-user response.
pub mod profile;
/// Round CRUD request/response types.
pub mod round;
/// Statistics response types.
pub mod stats;
/// Validation helpers for DTOs.
pub mod validation;

pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

pub(crate) fn parse_system_time(value: &str) -> Result<SystemTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339).map(SystemTime::from)
}
