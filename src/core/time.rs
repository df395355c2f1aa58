use std::sync::{Arc, RwLock};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

/// Clock abstracts access to the current wall-clock time so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local wall-clock timestamp.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current calendar day. Defaults to `now().date()`.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Real-time clock backed by the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock for tests and scripted sessions.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Arc<RwLock<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(RwLock::new(at)),
        }
    }

    pub fn set(&self, at: NaiveDateTime) {
        if let Ok(mut guard) = self.current.write() {
            *guard = at;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.current.write() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.current
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let clock = FixedClock::new(start);
        clock.advance(Duration::days(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }
}
