use chrono::{DateTime, Utc};

/// Source of the timestamps stamped onto documents.
///
/// The manager reads the clock once per executed or redone operation; every
/// document touched by that operation (including all children of a macro)
/// receives the same instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
