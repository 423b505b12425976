/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Clock abstraction.
//!
//! Queue and hold timestamps are whole seconds since the Unix epoch. The
//! engine reads time through [`Clock`] so hold expiry can be driven
//! deterministically in tests with [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current time in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now_secs(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_secs(&self) -> u64 {
        current_time_secs()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use fairseat::utils::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(3_601);
/// assert_eq!(clock.now_secs(), 4_601);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jumps the clock to `now`.
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_secs(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Returns the current time in seconds since the Unix epoch.
#[inline]
#[must_use]
pub fn current_time_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
