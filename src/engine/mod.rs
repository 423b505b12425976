/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Registration admission and waitlist promotion engine.
//!
//! [`RegistrationEngine`] owns no records itself. It reads and writes through
//! an injected [`RegistrationStore`], calls out to an injected
//! [`PaymentProcessor`] for paid events and reads time from an injected
//! [`Clock`]. What it adds is ordering:
//!
//! - the capacity check-and-insert of an admission and the
//!   free-seat-then-promote of a cancellation run under a per-event lock;
//! - every mutation of an event's three registration lists (sweep, promote,
//!   approve, cancel) takes the same lock, so a registration id is never
//!   mutated by two operations at once;
//! - duplicate and time-overlap checks of one user run under a per-user lock.
//!
//! Seats are occupied by confirmed registrations and by pending holds, so a
//! promoted hold keeps the seat it was promoted into until it is approved,
//! cancelled or expires, and approval can never push the confirmed count
//! past the seat limit.
//!
//! # Examples
//!
//! ```no_run
//! use fairseat::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(engine: Arc<RegistrationEngine>, alice: UserId) -> Result<(), RegistrationError> {
//! let admission = engine.register("Robotics Expo", alice).await?;
//! match admission.status {
//!     RegistrationStatus::Confirmed => println!("seat confirmed"),
//!     RegistrationStatus::Waiting => println!("queued"),
//!     _ => unreachable!(),
//! }
//!
//! // Periodically sweep expired holds and backfill free seats.
//! let sweeper = engine.spawn_sweeper();
//! sweeper.shutdown().await.ok();
//! # Ok(())
//! # }
//! ```

mod admission;
mod cancel;
mod catalog;
mod lifecycle;
mod lock;
mod query;
mod sweeper;
mod waitlist;

#[cfg(test)]
mod tests;

pub use admission::Admission;
pub use cancel::Cancellation;
pub use lifecycle::{LifecycleEvent, Transition};
pub use sweeper::SweeperHandle;
pub use waitlist::MaintenanceReport;

use crate::config::EngineConfig;
use crate::ids::IdGenerator;
use crate::model::{EventId, Registration, UserId};
use crate::payment::{PaymentGate, PaymentProcessor};
use crate::store::RegistrationStore;
use crate::utils::{Clock, SystemClock};
use lock::LockTable;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Type alias for lifecycle listener functions.
type EventListener = Arc<dyn Fn(&LifecycleEvent) + Send + Sync>;

/// Decides admission, manages the waitlist and pending holds, and cascades
/// cancellations into promotions.
pub struct RegistrationEngine {
    /// Backing record store.
    store: Arc<dyn RegistrationStore>,

    /// Timeout-guarded payment processor.
    payments: PaymentGate,

    /// Time source for queue and hold timestamps.
    clock: Arc<dyn Clock>,

    /// Tunables.
    config: EngineConfig,

    /// Issues user, event and registration ids.
    ids: IdGenerator,

    /// Serializes capacity decisions and list mutations per event.
    event_locks: LockTable<EventId>,

    /// Serializes eligibility checks per user.
    user_locks: LockTable<UserId>,

    /// Last emitted lifecycle sequence number; also orders listener delivery.
    sequence: Mutex<u64>,

    /// Listeners called synchronously for each lifecycle event.
    listeners: Vec<EventListener>,
}

impl std::fmt::Debug for RegistrationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationEngine")
            .field("config", &self.config)
            .field("payments", &self.payments)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl RegistrationEngine {
    /// Creates an engine over `store` and `payments` using the system clock.
    #[must_use]
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        payments: Arc<dyn PaymentProcessor>,
        config: EngineConfig,
    ) -> Self {
        let gate = PaymentGate::new(payments, config.payment_timeout());
        Self {
            store,
            payments: gate,
            clock: Arc::new(SystemClock),
            config,
            ids: IdGenerator::new(),
            event_locks: LockTable::new(),
            user_locks: LockTable::new(),
            sequence: Mutex::new(0),
            listeners: Vec::new(),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Registers a lifecycle listener.
    ///
    /// Listeners are called synchronously, in sequence order, while the
    /// engine holds the lock of the event concerned. Keep them short.
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RegistrationStore> {
        &self.store
    }

    /// Sequence number of the last lifecycle event, zero if none.
    #[must_use]
    pub fn last_sequence(&self) -> u64 {
        *self.sequence.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn now(&self) -> u64 {
        self.clock.now_secs()
    }

    /// Assigns the next sequence number and notifies listeners.
    fn emit(&self, registration: &Registration, transition: Transition) {
        let mut sequence = self.sequence.lock().unwrap_or_else(PoisonError::into_inner);
        *sequence += 1;
        let event = LifecycleEvent::new(*sequence, self.now(), registration, transition);

        info!(
            sequence_num = event.sequence_num,
            registration_id = %registration.id,
            user_id = %registration.user_id,
            event_id = %registration.event_id,
            transition = ?transition,
            "registration transition"
        );

        for listener in &self.listeners {
            listener(&event);
        }
    }

    /// Seats taken by confirmed registrations and pending holds.
    fn occupied_seats(&self, event_id: EventId) -> usize {
        self.store.confirmed_count(event_id) + self.store.pending_count(event_id)
    }
}
