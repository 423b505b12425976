/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Record store collaborator.
//!
//! The engine keeps no state of its own beyond locks and listeners; users,
//! events and the three registration lists (confirmed, waiting, pending) live
//! behind [`RegistrationStore`]. Every method is an atomic single-record
//! operation. Multi-step decisions, such as checking capacity and then
//! inserting, are serialized by the engine's per-event locks.

mod memory;

pub use memory::InMemoryStore;

use crate::error::RegistrationError;
use crate::model::{
    Event, EventFilter, EventId, Registration, RegistrationId, User, UserId,
};

/// Key-indexed storage of users, events and registrations.
///
/// Implementations must keep a registration id in at most one of the three
/// registration lists, and must return waiting entries in queue order:
/// ascending enqueue timestamp, ties broken by insertion order.
///
/// Every inserted registration is also recorded in an id-to-event index.
/// The `remove_*` and `pop_*` methods leave that entry in place, so a
/// registration moving between lists stays resolvable while it is in no
/// list at all. Only [`forget_registration`](Self::forget_registration)
/// drops it.
pub trait RegistrationStore: Send + Sync {
    /// Inserts a user.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::DuplicateUsername`] if the username is taken.
    fn insert_user(&self, user: User) -> Result<(), RegistrationError>;

    /// Looks up a user by id.
    fn user(&self, id: UserId) -> Option<User>;

    /// Looks up a user by username.
    fn user_by_name(&self, username: &str) -> Option<User>;

    /// Returns `true` if the user id is in use.
    fn contains_user_id(&self, id: UserId) -> bool;

    /// All user ids, in no particular order.
    fn user_ids(&self) -> Vec<UserId>;

    /// Replaces a user's payment address and returns the updated record.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UserNotFound`] if the user does not exist.
    fn update_payment_address(&self, id: UserId, address: String)
    -> Result<User, RegistrationError>;

    /// Inserts an event.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::DuplicateEventName`] if the name is taken.
    fn insert_event(&self, event: Event) -> Result<(), RegistrationError>;

    /// Looks up an event by id.
    fn event(&self, id: EventId) -> Option<Event>;

    /// Looks up an event by exact name.
    fn event_by_name(&self, name: &str) -> Option<Event>;

    /// Returns `true` if the event id is in use.
    fn contains_event_id(&self, id: EventId) -> bool;

    /// All events, in no particular order.
    fn events(&self) -> Vec<Event>;

    /// Events matching every criterion of `filter`.
    fn search_events(&self, filter: &EventFilter) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| filter.matches(event))
            .collect()
    }

    /// Folds `rating` into the event's running average and returns the updated event.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::EventIdNotFound`] if the event does not exist.
    fn update_rating(&self, id: EventId, rating: f64) -> Result<Event, RegistrationError>;

    /// Returns `true` if the id belongs to a registration not yet forgotten.
    fn contains_registration_id(&self, id: RegistrationId) -> bool {
        self.registration_event(id).is_some()
    }

    /// The event a live registration belongs to, whichever list it is in.
    fn registration_event(&self, id: RegistrationId) -> Option<EventId>;

    /// Drops a registration from the id-to-event index once it has left
    /// every list for good.
    fn forget_registration(&self, id: RegistrationId);

    /// Looks up a confirmed registration.
    fn confirmed(&self, id: RegistrationId) -> Option<Registration>;

    /// Looks up a pending registration.
    fn pending(&self, id: RegistrationId) -> Option<Registration>;

    /// Looks up a waiting registration.
    fn waiting(&self, id: RegistrationId) -> Option<Registration>;

    /// Confirmed registrations, optionally restricted to one event.
    fn confirmed_registrations(&self, event_id: Option<EventId>) -> Vec<Registration>;

    /// Pending registrations ordered by hold start, optionally restricted to one event.
    fn pending_registrations(&self, event_id: Option<EventId>) -> Vec<Registration>;

    /// Waiting registrations in queue order, optionally restricted to one event.
    fn waiting_registrations(&self, event_id: Option<EventId>) -> Vec<Registration>;

    /// Every registration of one user, in any state.
    fn user_registrations(&self, user_id: UserId) -> Vec<Registration>;

    /// Number of confirmed registrations for an event.
    fn confirmed_count(&self, event_id: EventId) -> usize {
        self.confirmed_registrations(Some(event_id)).len()
    }

    /// Number of pending holds for an event.
    fn pending_count(&self, event_id: EventId) -> usize {
        self.pending_registrations(Some(event_id)).len()
    }

    /// Events whose waiting queue is not empty.
    fn events_with_waiting(&self) -> Vec<EventId>;

    /// Adds a registration to the confirmed list.
    fn insert_confirmed(&self, registration: Registration);

    /// Removes and returns a confirmed registration.
    fn remove_confirmed(&self, id: RegistrationId) -> Option<Registration>;

    /// Appends a waiting registration to its event's queue.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::InvalidInput`] if the registration is not in the waiting state.
    fn push_waiting(&self, registration: Registration) -> Result<(), RegistrationError>;

    /// Removes and returns a waiting registration.
    fn remove_waiting(&self, id: RegistrationId) -> Option<Registration>;

    /// Removes and returns the head of an event's waiting queue.
    fn pop_waiting_head(&self, event_id: EventId) -> Option<Registration>;

    /// Adds a registration to the pending list.
    fn insert_pending(&self, registration: Registration);

    /// Removes and returns a pending registration.
    fn remove_pending(&self, id: RegistrationId) -> Option<Registration>;
}
