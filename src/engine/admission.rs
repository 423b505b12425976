/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Admission control: confirmed seat or waiting queue.

use super::{RegistrationEngine, Transition};
use crate::conflict::find_event_conflict;
use crate::error::RegistrationError;
use crate::model::{
    Event, OrderId, Registration, RegistrationId, RegistrationState, RegistrationStatus, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outcome of a successful registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    /// Id of the new registration.
    pub registration_id: RegistrationId,
    /// Either [`RegistrationStatus::Confirmed`] or [`RegistrationStatus::Waiting`].
    pub status: RegistrationStatus,
    /// Payment order created for a paid event.
    pub order_id: Option<OrderId>,
}

impl RegistrationEngine {
    /// Registers `user_id` for the event named `event_name`.
    ///
    /// Checks, in order: the event exists, the user exists, the user holds no
    /// registration for the event, and the event does not overlap one of the
    /// user's confirmed events. A paid event then needs a payment order
    /// before any record is written. Finally, under the event lock, the
    /// registration is confirmed if a seat is free and queued otherwise.
    ///
    /// Expired pending holds are swept first so they do not count against
    /// the seat limit.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::EventNotFound`] / [`RegistrationError::UserNotFound`]
    /// - [`RegistrationError::AlreadyRegistered`] / [`RegistrationError::TimeConflict`]
    /// - [`RegistrationError::PaymentFailed`] if the order could not be created
    pub async fn register(
        &self,
        event_name: &str,
        user_id: UserId,
    ) -> Result<Admission, RegistrationError> {
        self.sweep();

        let event = self
            .store
            .event_by_name(event_name)
            .ok_or_else(|| RegistrationError::EventNotFound(event_name.to_string()))?;
        if !self.store.contains_user_id(user_id) {
            return Err(RegistrationError::UserNotFound(user_id.to_string()));
        }
        self.check_eligibility(&event, user_id)
            .inspect_err(|err| warn!(event_id = %event.id, user_id = %user_id, error = %err, "registration rejected"))?;

        let order_id = self.payments.order_for(&event, user_id, self.now()).await?;

        // The checks are repeated under the locks: a concurrent request of the
        // same user may have landed while the payment call was in flight.
        let registration = self.user_locks.run(user_id, || {
            self.event_locks.run(event.id, || {
                self.check_eligibility(&event, user_id)?;
                self.admit(&event, user_id)
            })
        });
        let registration = registration.inspect_err(|err| {
            warn!(event_id = %event.id, user_id = %user_id, error = %err, order_id = ?order_id, "registration rejected after payment order");
        })?;

        Ok(Admission {
            registration_id: registration.id,
            status: registration.status(),
            order_id,
        })
    }

    /// Rejects duplicate registrations and time overlaps with confirmed events.
    fn check_eligibility(&self, event: &Event, user_id: UserId) -> Result<(), RegistrationError> {
        let existing = self.store.user_registrations(user_id);

        if existing.iter().any(|r| r.event_id == event.id) {
            return Err(RegistrationError::AlreadyRegistered {
                user_id,
                event_id: event.id,
            });
        }

        let confirmed_events: Vec<Event> = existing
            .iter()
            .filter(|r| r.state == RegistrationState::Confirmed)
            .filter_map(|r| self.store.event(r.event_id))
            .collect();

        match find_event_conflict(event, &confirmed_events) {
            Some(conflicting) => Err(RegistrationError::TimeConflict {
                event_id: event.id,
                conflicting,
            }),
            None => Ok(()),
        }
    }

    /// Creates the registration. Caller holds the event lock.
    fn admit(&self, event: &Event, user_id: UserId) -> Result<Registration, RegistrationError> {
        let reservation = self.ids.generate(|candidate| {
            self.store
                .contains_registration_id(RegistrationId::from(candidate))
        });
        let id = RegistrationId::from(reservation.id());

        if self.occupied_seats(event.id) < event.seat_limit as usize {
            let registration = Registration::confirmed(id, user_id, event.id);
            self.store.insert_confirmed(registration.clone());
            self.emit(&registration, Transition::Admitted);
            Ok(registration)
        } else {
            let registration = Registration::waiting(id, user_id, event.id, self.now());
            self.store.push_waiting(registration.clone())?;
            self.emit(&registration, Transition::Waitlisted);
            Ok(registration)
        }
    }
}
