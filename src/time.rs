//! Wall-clock helpers.
//!
//! All persisted timestamps are Unix milliseconds in UTC; rendering to
//! RFC 3339 (message payloads) and `HH:MM` (conversation summaries)
//! happens at the wire boundary.

use chrono::{DateTime, Utc};

use crate::domain::Timestamp;

/// Current UTC time as a domain Timestamp (milliseconds).
pub fn now_timestamp() -> Timestamp {
    Timestamp::new(Utc::now().timestamp_millis())
}

/// Render a timestamp as an RFC 3339 string in UTC.
pub fn timestamp_to_rfc3339(ts: Timestamp) -> String {
    to_datetime(ts).to_rfc3339()
}

/// Render a timestamp as `HH:MM` in UTC, the summary list format.
pub fn timestamp_to_hhmm(ts: Timestamp) -> String {
    to_datetime(ts).format("%H:%M").to_string()
}

fn to_datetime(ts: Timestamp) -> DateTime<Utc> {
    // Out-of-range millis cannot come from now_timestamp; clamp to epoch
    // rather than panic on corrupt input.
    DateTime::<Utc>::from_timestamp_millis(ts.value()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_rfc3339() {
        // 2023-01-01T00:00:00Z
        let ts = Timestamp::new(1672531200000);

        assert_eq!(timestamp_to_rfc3339(ts), "2023-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_timestamp_to_hhmm() {
        // 2023-01-01T09:05:00Z
        let ts = Timestamp::new(1672531200000 + (9 * 3600 + 5 * 60) * 1000);

        assert_eq!(timestamp_to_hhmm(ts), "09:05");
    }

    #[test]
    fn test_now_timestamp_is_recent() {
        let ts = now_timestamp();

        // Sanity bound: after 2020-01-01.
        assert!(ts.value() > 1577836800000);
    }
}
