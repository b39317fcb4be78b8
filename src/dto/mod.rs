use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Response envelope shared by every route.
pub mod common;
/// Wire representation of content records.
pub mod content;
/// Health status payload.
pub mod health;
/// Profile and identity-management payloads.
pub mod profile;

pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

pub(crate) fn parse_system_time(value: &str) -> Result<SystemTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339).map(SystemTime::from)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn timestamps_round_trip_through_rfc3339() {
        let stamp = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let text = format_system_time(stamp);
        assert_eq!(parse_system_time(&text).unwrap(), stamp);
    }
}
