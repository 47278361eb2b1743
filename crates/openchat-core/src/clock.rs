//! Sources of non-determinism consulted by the domain: the wall clock and the
//! identifier generator.
//!
//! Both are traits so the replay loader can swap in staged implementations
//! (see `journal::staging`) and tests can pin them to fixed values.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use uuid::Uuid;

/// Text pattern used for every timestamp that crosses the receptionist or the
/// action log, e.g. `2024-03-01T10:15:30Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub trait IdGenerator {
    fn next_id(&self) -> String;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Real time, truncated to whole seconds so a timestamp and its rendered
/// text always compare equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// Random v4 UUIDs in hyphenated text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn timestamp_text_roundtrip() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap();
        let text = format_timestamp(&at);
        assert_eq!(text, "2024-03-01T10:15:30Z");
        assert_eq!(parse_timestamp(&text), Some(at));
    }

    #[test]
    fn parse_rejects_other_patterns() {
        assert_eq!(parse_timestamp("2024-03-01 10:15:30"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn system_clock_has_whole_seconds() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn random_ids_are_distinct_uuids() {
        let a = RandomIds.next_id();
        let b = RandomIds.next_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn closures_act_as_sources() {
        let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let clock = move || at;
        let ids = || "fixed".to_string();
        assert_eq!(Clock::now(&clock), at);
        assert_eq!(ids.next_id(), "fixed");
    }
}
