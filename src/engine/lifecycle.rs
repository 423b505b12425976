/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Lifecycle events emitted on every registration state change.

use crate::model::{EventId, Registration, RegistrationId, RegistrationStatus, UserId};
use serde::{Deserialize, Serialize};

/// The state change a [`LifecycleEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    /// Admitted straight into a confirmed seat.
    Admitted,
    /// Admitted onto the waiting queue.
    Waitlisted,
    /// Moved from the queue head into a pending hold.
    Promoted,
    /// Pending hold outlived the TTL and rejoined the queue tail.
    Expired,
    /// Pending hold approved into a confirmed seat.
    Approved,
    /// Removed by cancellation.
    Cancelled {
        /// The state the registration was in.
        from: RegistrationStatus,
    },
}

/// Notification of a registration state change.
///
/// Sequence numbers start at 1, increase by one per event and are delivered
/// to listeners in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Monotonically increasing sequence number.
    pub sequence_num: u64,
    /// Seconds since the epoch when the change happened.
    pub timestamp: u64,
    /// The registration that changed.
    pub registration_id: RegistrationId,
    /// Its user.
    pub user_id: UserId,
    /// Its event.
    pub event_id: EventId,
    /// What happened.
    #[serde(flatten)]
    pub transition: Transition,
}

impl LifecycleEvent {
    pub(crate) fn new(
        sequence_num: u64,
        timestamp: u64,
        registration: &Registration,
        transition: Transition,
    ) -> Self {
        Self {
            sequence_num,
            timestamp,
            registration_id: registration.id,
            user_id: registration.user_id,
            event_id: registration.event_id,
            transition,
        }
    }
}
