/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

use super::RegistrationEngine;
use crate::error::RegistrationError;
use crate::model::{EventId, Registration, RegistrationId, RegistrationStatus, UserId};

impl RegistrationEngine {
    /// Resolves a registration id to its current state.
    ///
    /// Lists are checked confirmed first, then pending, then waiting. No sweep
    /// runs, so an expired hold reads as pending until the next sweep.
    #[must_use]
    pub fn status(&self, id: RegistrationId) -> RegistrationStatus {
        self.get_registration(id)
            .map_or(RegistrationStatus::NotFound, |registration| {
                registration.status()
            })
    }

    /// Looks up a registration in any list.
    ///
    /// The first read takes no lock. If it misses a registration the store
    /// still indexes, the id is mid-move between lists, and the read is
    /// repeated under the event lock where moves cannot be observed halfway.
    #[must_use]
    pub fn get_registration(&self, id: RegistrationId) -> Option<Registration> {
        if let Some(registration) = self.find_in_lists(id) {
            return Some(registration);
        }
        let event_id = self.store.registration_event(id)?;
        self.event_locks.run(event_id, || self.find_in_lists(id))
    }

    fn find_in_lists(&self, id: RegistrationId) -> Option<Registration> {
        self.store
            .confirmed(id)
            .or_else(|| self.store.pending(id))
            .or_else(|| self.store.waiting(id))
    }

    /// All registrations, optionally for one event: confirmed, then waiting
    /// in queue order, then pending by hold start.
    #[must_use]
    pub fn list_registrations(&self, event_id: Option<EventId>) -> Vec<Registration> {
        let mut all = self.store.confirmed_registrations(event_id);
        all.extend(self.store.waiting_registrations(event_id));
        all.extend(self.store.pending_registrations(event_id));
        all
    }

    /// Every registration of one user.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UserNotFound`] if the user does not exist.
    pub fn list_user_registrations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Registration>, RegistrationError> {
        if !self.store.contains_user_id(user_id) {
            return Err(RegistrationError::UserNotFound(user_id.to_string()));
        }
        Ok(self.store.user_registrations(user_id))
    }
}
