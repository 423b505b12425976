/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! In-memory [`RegistrationStore`].
//!
//! Users, events and the confirmed and pending lists are plain concurrent
//! maps. Each event's waiting queue is a lock-free skip list keyed by
//! `(enqueued_at, insertion sequence)`, so the queue head is always the
//! oldest entry and equal timestamps keep insertion order.

use super::RegistrationStore;
use crate::error::RegistrationError;
use crate::model::{
    Event, EventId, Registration, RegistrationId, RegistrationState, User, UserId,
};
use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Position of an entry in a waiting queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct QueueKey {
    enqueued_at: u64,
    seq: u64,
}

type WaitingQueue = SkipMap<QueueKey, Registration>;

/// Thread-safe in-memory store.
///
/// # Examples
///
/// ```
/// use fairseat::model::{EventId, Registration, RegistrationId, UserId};
/// use fairseat::store::{InMemoryStore, RegistrationStore};
///
/// let store = InMemoryStore::new();
/// let event = EventId::from(1);
/// store
///     .push_waiting(Registration::waiting(RegistrationId::from(10), UserId::from(1), event, 500))
///     .ok();
/// store
///     .push_waiting(Registration::waiting(RegistrationId::from(11), UserId::from(2), event, 400))
///     .ok();
///
/// let head = store.pop_waiting_head(event).map(|r| r.id);
/// assert_eq!(head, Some(RegistrationId::from(11)));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: DashMap<UserId, User>,
    usernames: DashMap<String, UserId>,
    events: DashMap<EventId, Event>,
    event_names: DashMap<String, EventId>,
    confirmed: DashMap<RegistrationId, Registration>,
    pending: DashMap<RegistrationId, Registration>,
    waiting: DashMap<EventId, Arc<WaitingQueue>>,
    waiting_index: DashMap<RegistrationId, (EventId, QueueKey)>,
    registration_events: DashMap<RegistrationId, EventId>,
    queue_seq: AtomicU64,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, event_id: EventId) -> Option<Arc<WaitingQueue>> {
        self.waiting.get(&event_id).map(|q| Arc::clone(q.value()))
    }

    fn queue_or_create(&self, event_id: EventId) -> Arc<WaitingQueue> {
        Arc::clone(self.waiting.entry(event_id).or_default().value())
    }
}

impl RegistrationStore for InMemoryStore {
    fn insert_user(&self, user: User) -> Result<(), RegistrationError> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(RegistrationError::DuplicateUsername(user.username)),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user);
                Ok(())
            }
        }
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|u| u.value().clone())
    }

    fn user_by_name(&self, username: &str) -> Option<User> {
        let id = *self.usernames.get(username)?.value();
        self.user(id)
    }

    fn contains_user_id(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    fn user_ids(&self) -> Vec<UserId> {
        self.users.iter().map(|u| *u.key()).collect()
    }

    fn update_payment_address(
        &self,
        id: UserId,
        address: String,
    ) -> Result<User, RegistrationError> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| RegistrationError::UserNotFound(id.to_string()))?;
        user.payment_address = Some(address);
        Ok(user.clone())
    }

    fn insert_event(&self, event: Event) -> Result<(), RegistrationError> {
        match self.event_names.entry(event.name.clone()) {
            Entry::Occupied(_) => Err(RegistrationError::DuplicateEventName(event.name)),
            Entry::Vacant(slot) => {
                slot.insert(event.id);
                self.events.insert(event.id, event);
                Ok(())
            }
        }
    }

    fn event(&self, id: EventId) -> Option<Event> {
        self.events.get(&id).map(|e| e.value().clone())
    }

    fn event_by_name(&self, name: &str) -> Option<Event> {
        let id = *self.event_names.get(name)?.value();
        self.event(id)
    }

    fn contains_event_id(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    fn events(&self) -> Vec<Event> {
        self.events.iter().map(|e| e.value().clone()).collect()
    }

    fn update_rating(&self, id: EventId, rating: f64) -> Result<Event, RegistrationError> {
        let mut event = self
            .events
            .get_mut(&id)
            .ok_or(RegistrationError::EventIdNotFound(id))?;
        event.apply_rating(rating);
        Ok(event.clone())
    }

    fn registration_event(&self, id: RegistrationId) -> Option<EventId> {
        self.registration_events.get(&id).map(|e| *e.value())
    }

    fn forget_registration(&self, id: RegistrationId) {
        self.registration_events.remove(&id);
    }

    fn confirmed(&self, id: RegistrationId) -> Option<Registration> {
        self.confirmed.get(&id).map(|r| r.value().clone())
    }

    fn pending(&self, id: RegistrationId) -> Option<Registration> {
        self.pending.get(&id).map(|r| r.value().clone())
    }

    fn waiting(&self, id: RegistrationId) -> Option<Registration> {
        let (event_id, key) = *self.waiting_index.get(&id)?.value();
        let queue = self.queue(event_id)?;
        let registration = queue.get(&key).map(|entry| entry.value().clone());
        registration
    }

    fn confirmed_registrations(&self, event_id: Option<EventId>) -> Vec<Registration> {
        self.confirmed
            .iter()
            .filter(|r| event_id.is_none_or(|id| r.event_id == id))
            .map(|r| r.value().clone())
            .collect()
    }

    fn pending_registrations(&self, event_id: Option<EventId>) -> Vec<Registration> {
        let mut pending: Vec<Registration> = self
            .pending
            .iter()
            .filter(|r| event_id.is_none_or(|id| r.event_id == id))
            .map(|r| r.value().clone())
            .collect();
        pending.sort_by_key(|r| match r.state {
            RegistrationState::Pending { held_at } => (held_at, r.id),
            _ => (0, r.id),
        });
        pending
    }

    fn waiting_registrations(&self, event_id: Option<EventId>) -> Vec<Registration> {
        if let Some(event_id) = event_id {
            return self
                .queue(event_id)
                .map(|queue| queue.iter().map(|e| e.value().clone()).collect())
                .unwrap_or_default();
        }

        let queues: Vec<Arc<WaitingQueue>> =
            self.waiting.iter().map(|q| Arc::clone(q.value())).collect();
        let mut merged: Vec<(QueueKey, Registration)> = queues
            .iter()
            .flat_map(|queue| {
                queue
                    .iter()
                    .map(|e| (*e.key(), e.value().clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        merged.sort_by_key(|(key, _)| *key);
        merged.into_iter().map(|(_, r)| r).collect()
    }

    fn user_registrations(&self, user_id: UserId) -> Vec<Registration> {
        let mut registrations: Vec<Registration> = self
            .confirmed
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        registrations.extend(
            self.waiting_registrations(None)
                .into_iter()
                .filter(|r| r.user_id == user_id),
        );
        registrations.extend(
            self.pending_registrations(None)
                .into_iter()
                .filter(|r| r.user_id == user_id),
        );
        registrations
    }

    fn confirmed_count(&self, event_id: EventId) -> usize {
        self.confirmed
            .iter()
            .filter(|r| r.event_id == event_id)
            .count()
    }

    fn pending_count(&self, event_id: EventId) -> usize {
        self.pending.iter().filter(|r| r.event_id == event_id).count()
    }

    fn events_with_waiting(&self) -> Vec<EventId> {
        self.waiting
            .iter()
            .filter(|q| !q.value().is_empty())
            .map(|q| *q.key())
            .collect()
    }

    fn insert_confirmed(&self, registration: Registration) {
        let registration = registration.with_state(RegistrationState::Confirmed);
        self.registration_events
            .insert(registration.id, registration.event_id);
        self.confirmed.insert(registration.id, registration);
    }

    fn remove_confirmed(&self, id: RegistrationId) -> Option<Registration> {
        self.confirmed.remove(&id).map(|(_, r)| r)
    }

    fn push_waiting(&self, registration: Registration) -> Result<(), RegistrationError> {
        let RegistrationState::Waiting { enqueued_at } = registration.state else {
            return Err(RegistrationError::invalid(format!(
                "registration {} is not in the waiting state",
                registration.id
            )));
        };
        let key = QueueKey {
            enqueued_at,
            seq: self.queue_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.registration_events
            .insert(registration.id, registration.event_id);
        self.waiting_index
            .insert(registration.id, (registration.event_id, key));
        self.queue_or_create(registration.event_id)
            .insert(key, registration);
        Ok(())
    }

    fn remove_waiting(&self, id: RegistrationId) -> Option<Registration> {
        let (_, (event_id, key)) = self.waiting_index.remove(&id)?;
        let queue = self.queue(event_id)?;
        let registration = queue.remove(&key).map(|entry| entry.value().clone());
        registration
    }

    fn pop_waiting_head(&self, event_id: EventId) -> Option<Registration> {
        let queue = self.queue(event_id)?;
        let head = queue.pop_front()?;
        let registration = head.value().clone();
        self.waiting_index.remove(&registration.id);
        Some(registration)
    }

    fn insert_pending(&self, registration: Registration) {
        self.registration_events
            .insert(registration.id, registration.event_id);
        self.pending.insert(registration.id, registration);
    }

    fn remove_pending(&self, id: RegistrationId) -> Option<Registration> {
        self.pending.remove(&id).map(|(_, r)| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TimeWindow, UserType};
    use std::collections::BTreeSet;

    fn user(id: u64, name: &str) -> User {
        User {
            id: UserId::from(id),
            username: name.to_string(),
            user_type: UserType::Regular,
            interests: BTreeSet::new(),
            payment_address: None,
        }
    }

    fn event(id: u64, name: &str) -> Event {
        Event {
            id: EventId::from(id),
            name: name.to_string(),
            location: "Hall".to_string(),
            categories: BTreeSet::new(),
            window: TimeWindow::new(0, 10),
            seat_limit: 2,
            price: 0,
            club_id: UserId::from(99),
            rating: None,
        }
    }

    fn waiting(id: u64, event_id: u64, at: u64) -> Registration {
        Registration::waiting(
            RegistrationId::from(id),
            UserId::from(id),
            EventId::from(event_id),
            at,
        )
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = InMemoryStore::new();
        store.insert_user(user(1, "alice")).unwrap();
        let err = store.insert_user(user(2, "alice")).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateUsername(_)));
        assert!(!store.contains_user_id(UserId::from(2)));
    }

    #[test]
    fn test_user_by_name() {
        let store = InMemoryStore::new();
        store.insert_user(user(1, "alice")).unwrap();
        assert_eq!(store.user_by_name("alice").map(|u| u.id), Some(UserId::from(1)));
        assert!(store.user_by_name("bob").is_none());
    }

    #[test]
    fn test_duplicate_event_name_rejected() {
        let store = InMemoryStore::new();
        store.insert_event(event(1, "Expo")).unwrap();
        assert!(store.insert_event(event(2, "Expo")).is_err());
        assert_eq!(store.events().len(), 1);
    }

    #[test]
    fn test_update_rating_missing_event() {
        let store = InMemoryStore::new();
        let err = store.update_rating(EventId::from(5), 3.0).unwrap_err();
        assert!(matches!(err, RegistrationError::EventIdNotFound(_)));
    }

    #[test]
    fn test_waiting_queue_orders_by_timestamp_then_insertion() {
        let store = InMemoryStore::new();
        store.push_waiting(waiting(1, 7, 300)).unwrap();
        store.push_waiting(waiting(2, 7, 100)).unwrap();
        store.push_waiting(waiting(3, 7, 100)).unwrap();

        let order: Vec<u64> = store
            .waiting_registrations(Some(EventId::from(7)))
            .iter()
            .map(|r| r.id.as_u64())
            .collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_queues_are_per_event() {
        let store = InMemoryStore::new();
        store.push_waiting(waiting(1, 7, 100)).unwrap();
        store.push_waiting(waiting(2, 8, 50)).unwrap();

        let head = store.pop_waiting_head(EventId::from(7)).unwrap();
        assert_eq!(head.id, RegistrationId::from(1));
        assert!(store.pop_waiting_head(EventId::from(7)).is_none());
        assert_eq!(store.events_with_waiting(), vec![EventId::from(8)]);
    }

    #[test]
    fn test_global_waiting_list_is_merged_in_order() {
        let store = InMemoryStore::new();
        store.push_waiting(waiting(1, 7, 300)).unwrap();
        store.push_waiting(waiting(2, 8, 200)).unwrap();
        store.push_waiting(waiting(3, 9, 100)).unwrap();

        let order: Vec<u64> = store
            .waiting_registrations(None)
            .iter()
            .map(|r| r.id.as_u64())
            .collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_remove_waiting_clears_queue_position() {
        let store = InMemoryStore::new();
        let id = RegistrationId::from(1);
        store.push_waiting(waiting(1, 7, 100)).unwrap();
        assert!(store.contains_registration_id(id));

        let removed = store.remove_waiting(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.waiting(id).is_none());
        assert!(store.remove_waiting(id).is_none());

        // Still known until forgotten.
        assert_eq!(store.registration_event(id), Some(EventId::from(7)));
        store.forget_registration(id);
        assert!(!store.contains_registration_id(id));
    }

    #[test]
    fn test_event_index_survives_list_moves() {
        let store = InMemoryStore::new();
        let id = RegistrationId::from(1);
        store.push_waiting(waiting(1, 7, 100)).unwrap();

        let head = store.pop_waiting_head(EventId::from(7)).unwrap();
        assert_eq!(store.registration_event(id), Some(EventId::from(7)));
        store.insert_pending(head.with_state(RegistrationState::Pending { held_at: 200 }));

        let held = store.remove_pending(id).unwrap();
        assert_eq!(store.registration_event(id), Some(EventId::from(7)));
        store.insert_confirmed(held);
        assert!(store.confirmed(id).is_some());
        assert_eq!(store.registration_event(id), Some(EventId::from(7)));
    }

    #[test]
    fn test_push_waiting_rejects_other_states() {
        let store = InMemoryStore::new();
        let reg = Registration::confirmed(
            RegistrationId::from(1),
            UserId::from(1),
            EventId::from(1),
        );
        assert!(store.push_waiting(reg).is_err());
        assert!(store.waiting_registrations(None).is_empty());
    }

    #[test]
    fn test_insert_confirmed_normalizes_state() {
        let store = InMemoryStore::new();
        store.insert_confirmed(waiting(1, 7, 100));
        let reg = store.confirmed(RegistrationId::from(1)).unwrap();
        assert_eq!(reg.state, RegistrationState::Confirmed);
        assert_eq!(store.confirmed_count(EventId::from(7)), 1);
    }

    #[test]
    fn test_user_registrations_span_all_lists() {
        let store = InMemoryStore::new();
        let uid = UserId::from(5);
        store.insert_confirmed(Registration::confirmed(RegistrationId::from(1), uid, EventId::from(1)));
        store
            .push_waiting(Registration::waiting(RegistrationId::from(2), uid, EventId::from(2), 10))
            .unwrap();
        store.insert_pending(
            Registration::waiting(RegistrationId::from(3), uid, EventId::from(3), 10)
                .with_state(RegistrationState::Pending { held_at: 20 }),
        );

        let mut ids: Vec<u64> = store
            .user_registrations(uid)
            .iter()
            .map(|r| r.id.as_u64())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
