use chrono::{Local, NaiveDateTime};

/// Clock abstracts access to the current wall-clock moment so validation
/// stays deterministic in tests.
///
/// Bookings carry no time zone, so the clock reports local naive time.
pub trait Clock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// Real-time clock backed by the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: NaiveDateTime,
}

impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self { instant }
    }

    /// Parses `YYYY-MM-DD HH:MM`; returns `None` for malformed input.
    pub fn parse(value: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
            .ok()
            .map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.instant
    }
}
