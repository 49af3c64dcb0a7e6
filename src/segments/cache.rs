//! Staleness-driven cache slot held by every data-backed segment

use chrono::{DateTime, Local, TimeDelta};
use tracing::debug;

/// A payload that knows when it was fetched.
pub trait Timestamped {
    fn fetched_at(&self) -> DateTime<Local>;
}

/// Optional timestamped payload plus the interval after which it goes stale.
///
/// The slot is either empty (never fetched) or holds one complete snapshot;
/// [`store`](Self::store) replaces the whole payload at once.
#[derive(Debug, Clone)]
pub struct StalenessCache<T> {
    payload: Option<T>,
    refresh_interval: TimeDelta,
}

impl<T: Timestamped> StalenessCache<T> {
    /// Creates an empty cache. The interval is fixed for the cache's lifetime.
    pub fn new(refresh_interval: TimeDelta) -> Self {
        Self {
            payload: None,
            refresh_interval,
        }
    }

    pub fn refresh_interval(&self) -> TimeDelta {
        self.refresh_interval
    }

    /// True when nothing was ever stored or the payload has reached the refresh interval.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Local::now())
    }

    /// [`is_stale`](Self::is_stale) against an explicit clock.
    pub fn is_stale_at(&self, now: DateTime<Local>) -> bool {
        match &self.payload {
            None => {
                debug!("Cache staleness check: no payload yet");
                true
            }
            Some(payload) => {
                let age = now.signed_duration_since(payload.fetched_at());
                let is_stale = age >= self.refresh_interval;
                debug!(
                    "Cache staleness check: age={}s, refresh={}s, is_stale={}",
                    age.num_seconds(),
                    self.refresh_interval.num_seconds(),
                    is_stale
                );
                is_stale
            }
        }
    }

    /// The base timer check OR'd with a provider-specific predicate on the payload.
    ///
    /// The extra predicate only runs when a payload exists and the timer alone
    /// says the data is still fresh.
    pub fn is_stale_or<F>(&self, now: DateTime<Local>, extra: F) -> bool
    where
        F: Fn(&T, DateTime<Local>) -> bool,
    {
        if self.is_stale_at(now) {
            return true;
        }
        self.payload
            .as_ref()
            .is_some_and(|payload| extra(payload, now))
    }

    /// Replaces the payload wholesale.
    pub fn store(&mut self, payload: T) {
        self.payload = Some(payload);
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut T> {
        self.payload.as_mut()
    }
}
