/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Events, their time windows and search filters.

use super::id::{EventId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Half-open time interval `[start, end)` in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the event.
    pub start: u64,
    /// End of the event.
    pub end: u64,
}

impl TimeWindow {
    /// Creates a window from start and end timestamps.
    #[inline]
    #[must_use]
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Length of the window in seconds, zero if `end <= start`.
    #[inline]
    #[must_use]
    pub const fn duration_secs(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the two windows share any instant.
    ///
    /// Windows that merely touch (one ends when the other starts) do not overlap.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// An event run by a club with a fixed number of seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique id.
    pub id: EventId,
    /// Unique name, the key registrations are requested by.
    pub name: String,
    /// Where the event takes place.
    pub location: String,
    /// Free-form categories.
    pub categories: BTreeSet<String>,
    /// When the event runs.
    pub window: TimeWindow,
    /// Maximum number of confirmed registrations, always greater than zero.
    pub seat_limit: u32,
    /// Ticket price in minor currency units; zero means free.
    pub price: u64,
    /// The club that owns the event.
    pub club_id: UserId,
    /// Running average rating, `None` until first rated.
    pub rating: Option<f64>,
}

impl Event {
    /// Returns `true` if registration requires a payment order.
    #[inline]
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.price > 0
    }

    /// Folds a new rating into the running average.
    ///
    /// The first rating is taken as-is; every later one is averaged with the
    /// current value, so recent ratings weigh more.
    pub fn apply_rating(&mut self, rating: f64) {
        self.rating = Some(match self.rating {
            None => rating,
            Some(old) => (old + rating) / 2.0,
        });
    }
}

/// Request to create an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Owning club.
    pub club_id: UserId,
    /// Unique name.
    pub name: String,
    /// Venue.
    pub location: String,
    /// Categories, at most the configured maximum.
    pub categories: Vec<String>,
    /// Start and end.
    pub window: TimeWindow,
    /// Seat limit, must be greater than zero.
    pub seat_limit: u32,
    /// Price in minor currency units.
    pub price: u64,
}

/// Optional, AND-ed criteria for [`search_events`](crate::RegistrationEngine::search_events).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    /// Exact event id.
    pub id: Option<EventId>,
    /// Substring of the event name.
    pub name: Option<String>,
    /// Exact location.
    pub location: Option<String>,
    /// Every listed category must be present on the event.
    pub categories: Vec<String>,
    /// Event starts at or after this instant.
    pub starts_after: Option<u64>,
    /// Event ends at or before this instant.
    pub ends_before: Option<u64>,
    /// Exact seat limit.
    pub seat_limit: Option<u32>,
    /// Owning club.
    pub club_id: Option<UserId>,
}

impl EventFilter {
    /// Returns `true` if the event satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        self.id.is_none_or(|id| event.id == id)
            && self
                .name
                .as_deref()
                .is_none_or(|name| event.name.contains(name))
            && self
                .location
                .as_deref()
                .is_none_or(|location| event.location == location)
            && self
                .categories
                .iter()
                .all(|category| event.categories.contains(category))
            && self.starts_after.is_none_or(|t| event.window.start >= t)
            && self.ends_before.is_none_or(|t| event.window.end <= t)
            && self.seat_limit.is_none_or(|limit| event.seat_limit == limit)
            && self.club_id.is_none_or(|club| event.club_id == club)
    }
}

/// One row of the club leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// The club.
    pub club_id: UserId,
    /// The club's username.
    pub club_name: String,
    /// Mean rating over the club's rated events, `0.0` if none are rated.
    pub average_rating: f64,
}
