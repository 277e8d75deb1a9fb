use chrono::{Local, NaiveDateTime};

/// Source of the current local wall-clock time.
///
/// The picker reads the clock whenever it rebuilds the start-time list, so tests
/// and scripted hosts substitute a [`FixedClock`].
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
