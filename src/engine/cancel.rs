/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Cancellation and the promotion cascade it triggers.

use super::{RegistrationEngine, Transition};
use crate::error::RegistrationError;
use crate::model::{Registration, RegistrationId, RegistrationStatus};
use serde::{Deserialize, Serialize};

/// Outcome of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    /// The removed registration, in the state it was cancelled from.
    pub registration: Registration,
    /// The queue head promoted into the freed seat, if any.
    pub promoted: Option<Registration>,
}

impl RegistrationEngine {
    /// Cancels a registration in any state.
    ///
    /// Waiting and pending entries are simply removed. A confirmed seat is
    /// removed and then backfilled from the head of the waiting queue, in the
    /// same critical section, so no other admission can take the seat first.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::RegistrationNotFound`] if the id is in no list;
    /// nothing is mutated in that case.
    pub fn cancel(&self, id: RegistrationId) -> Result<Cancellation, RegistrationError> {
        self.sweep();

        // The index entry outlives list moves, unlike the lists themselves.
        let event_id = self
            .store
            .registration_event(id)
            .ok_or(RegistrationError::RegistrationNotFound(id))?;

        self.event_locks.run(event_id, || {
            if let Some(registration) = self
                .store
                .remove_waiting(id)
                .or_else(|| self.store.remove_pending(id))
            {
                self.store.forget_registration(id);
                self.emit(
                    &registration,
                    Transition::Cancelled {
                        from: registration.status(),
                    },
                );
                return Ok(Cancellation {
                    registration,
                    promoted: None,
                });
            }

            // Cancelled by a racing caller since the index lookup.
            let registration = self
                .store
                .remove_confirmed(id)
                .ok_or(RegistrationError::RegistrationNotFound(id))?;
            self.store.forget_registration(id);
            self.emit(
                &registration,
                Transition::Cancelled {
                    from: RegistrationStatus::Confirmed,
                },
            );
            let promoted = self.promote_locked(event_id);

            Ok(Cancellation {
                registration,
                promoted,
            })
        })
    }
}
