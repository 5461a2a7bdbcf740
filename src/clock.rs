use chrono::{DateTime, Utc};

/// Source of "now" for anything that stamps or expires records
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Manually advanced clock for expiry tests
    pub struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        pub fn at(timestamp: i64) -> Self {
            Self(Mutex::new(
                DateTime::from_timestamp(timestamp, 0).expect("valid timestamp"),
            ))
        }

        pub fn advance_secs(&self, secs: i64) {
            let mut now = self.0.lock().unwrap();
            *now += chrono::Duration::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }
}
