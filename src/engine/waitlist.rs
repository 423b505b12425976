/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Waiting queue promotion, pending hold expiry and approval.

use super::{RegistrationEngine, Transition};
use crate::error::RegistrationError;
use crate::model::{EventId, Registration, RegistrationId, RegistrationState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What one [`run_maintenance`](RegistrationEngine::run_maintenance) pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceReport {
    /// Holds that expired and rejoined the queue tail.
    pub expired: Vec<Registration>,
    /// Queue heads moved into a pending hold.
    pub promoted: Vec<Registration>,
}

impl MaintenanceReport {
    /// Returns `true` if the pass changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expired.is_empty() && self.promoted.is_empty()
    }
}

impl RegistrationEngine {
    /// Moves every pending hold older than the hold TTL back to the tail of
    /// its event's waiting queue, stamped with the current time.
    ///
    /// Returns the re-queued registrations in their new state.
    pub fn sweep(&self) -> Vec<Registration> {
        let now = self.now();
        let ttl = self.config.hold_ttl_secs;

        let mut expired = Vec::new();
        for candidate in self.store.pending_registrations(None) {
            if !is_expired(&candidate.state, now, ttl) {
                continue;
            }
            let requeued = self
                .event_locks
                .run(candidate.event_id, || self.expire_locked(candidate.id, now));
            if let Some(registration) = requeued {
                expired.push(registration);
            }
        }

        if expired.is_empty() {
            debug!(now, "sweep found no expired holds");
        } else {
            info!(now, count = expired.len(), "sweep re-queued expired holds");
        }
        expired
    }

    /// Re-queues one expired hold. Caller holds the event lock.
    fn expire_locked(&self, id: RegistrationId, now: u64) -> Option<Registration> {
        // Approved or cancelled since the scan, or no longer expired.
        let current = self.store.pending(id)?;
        if !is_expired(&current.state, now, self.config.hold_ttl_secs) {
            return None;
        }

        let held = self.store.remove_pending(id)?;
        let requeued = held
            .clone()
            .with_state(RegistrationState::Waiting { enqueued_at: now });
        if let Err(err) = self.store.push_waiting(requeued.clone()) {
            warn!(registration_id = %id, error = %err, "could not re-queue expired hold");
            self.store.insert_pending(held);
            return None;
        }

        self.emit(&requeued, Transition::Expired);
        Some(requeued)
    }

    /// Promotes the head of an event's waiting queue into a pending hold.
    ///
    /// A no-op, returning `None`, when the queue is empty or every seat is
    /// taken by confirmed registrations and pending holds.
    pub fn promote(&self, event_id: EventId) -> Option<Registration> {
        self.event_locks
            .run(event_id, || self.promote_locked(event_id))
    }

    /// Caller holds the event lock.
    pub(super) fn promote_locked(&self, event_id: EventId) -> Option<Registration> {
        let event = self.store.event(event_id)?;
        if self.occupied_seats(event_id) >= event.seat_limit as usize {
            debug!(event_id = %event_id, "no free seat to promote into");
            return None;
        }

        let head = self.store.pop_waiting_head(event_id)?;
        let held = head.with_state(RegistrationState::Pending {
            held_at: self.now(),
        });
        self.store.insert_pending(held.clone());
        self.emit(&held, Transition::Promoted);
        Some(held)
    }

    /// Finalizes a pending hold into a confirmed seat.
    ///
    /// Expired holds are swept first, so approving one that outlived the TTL
    /// fails exactly like approving an id that never existed.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::RegistrationNotFound`] if the id is not pending.
    pub fn approve(&self, id: RegistrationId) -> Result<Registration, RegistrationError> {
        self.sweep();

        let event_id = self
            .store
            .registration_event(id)
            .ok_or(RegistrationError::RegistrationNotFound(id))?;

        self.event_locks.run(event_id, || {
            let held = self
                .store
                .remove_pending(id)
                .ok_or(RegistrationError::RegistrationNotFound(id))?;
            let confirmed = held.with_state(RegistrationState::Confirmed);
            self.store.insert_confirmed(confirmed.clone());
            self.emit(&confirmed, Transition::Approved);
            Ok(confirmed)
        })
    }

    /// Sweeps expired holds, then promotes queue heads into every free seat.
    ///
    /// This is what the background sweeper runs on each tick.
    pub fn run_maintenance(&self) -> MaintenanceReport {
        let expired = self.sweep();

        let mut promoted = Vec::new();
        for event_id in self.store.events_with_waiting() {
            while let Some(registration) = self.promote(event_id) {
                promoted.push(registration);
            }
        }

        if !promoted.is_empty() {
            info!(count = promoted.len(), "maintenance promoted queue heads");
        }
        MaintenanceReport { expired, promoted }
    }
}

#[inline]
fn is_expired(state: &RegistrationState, now: u64, ttl: u64) -> bool {
    match state {
        RegistrationState::Pending { held_at } => now.saturating_sub(*held_at) > ttl,
        _ => false,
    }
}
