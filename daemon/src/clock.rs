use chrono::{Local, NaiveDateTime};

/// Source of wall-clock time. The daemon reads it once per tick.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Host local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
