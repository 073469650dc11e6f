use chrono::{DateTime, SecondsFormat, Utc};
use stockledger_canonical::Timestamp;

/// Source of `createdAtUtc`.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as a millisecond-precision `Z` timestamp.
    fn timestamp(&self) -> Timestamp {
        Timestamp::new(self.now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_utc_with_millis() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());
        let ts = clock.timestamp();
        assert_eq!(ts.as_str(), "2026-03-01T09:30:00.000Z");
        assert!(Timestamp::parse(ts.as_str()).is_ok());
    }

    #[test]
    fn system_clock_output_parses() {
        assert!(Timestamp::parse(SystemClock.timestamp().as_str()).is_ok());
    }
}
