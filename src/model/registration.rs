/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Registrations and their lifecycle states.

use super::id::{EventId, RegistrationId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a live registration.
///
/// Waiting and pending entries carry the timestamp that orders the queue or
/// bounds the hold; confirmed entries carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationState {
    /// Queued for a seat, ordered by `enqueued_at`.
    Waiting {
        /// Seconds since the epoch when the entry joined the queue tail.
        enqueued_at: u64,
    },
    /// Promoted from the queue, awaiting operator approval.
    Pending {
        /// Seconds since the epoch when the hold started.
        held_at: u64,
    },
    /// Holds a seat.
    Confirmed,
}

impl RegistrationState {
    /// The status this state reports through the status query.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> RegistrationStatus {
        match self {
            Self::Waiting { .. } => RegistrationStatus::Waiting,
            Self::Pending { .. } => RegistrationStatus::Pending,
            Self::Confirmed => RegistrationStatus::Confirmed,
        }
    }
}

/// A registration of one user for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Unique id, preserved across state changes.
    pub id: RegistrationId,
    /// The registered user.
    pub user_id: UserId,
    /// The event registered for.
    pub event_id: EventId,
    /// Current lifecycle state.
    #[serde(flatten)]
    pub state: RegistrationState,
}

impl Registration {
    /// A registration holding a seat.
    #[must_use]
    pub const fn confirmed(id: RegistrationId, user_id: UserId, event_id: EventId) -> Self {
        Self {
            id,
            user_id,
            event_id,
            state: RegistrationState::Confirmed,
        }
    }

    /// A registration queued at `enqueued_at`.
    #[must_use]
    pub const fn waiting(
        id: RegistrationId,
        user_id: UserId,
        event_id: EventId,
        enqueued_at: u64,
    ) -> Self {
        Self {
            id,
            user_id,
            event_id,
            state: RegistrationState::Waiting { enqueued_at },
        }
    }

    /// Returns the same registration moved into `state`.
    #[must_use]
    pub const fn with_state(self, state: RegistrationState) -> Self {
        Self { state, ..self }
    }

    /// Current status.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> RegistrationStatus {
        self.state.status()
    }
}

/// Result of resolving a registration id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Holds a seat.
    Confirmed,
    /// Promoted and awaiting approval.
    Pending,
    /// Queued for a seat.
    Waiting,
    /// Unknown id.
    NotFound,
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Pending => write!(f, "pending"),
            Self::Waiting => write!(f, "waiting"),
            Self::NotFound => write!(f, "not found"),
        }
    }
}
