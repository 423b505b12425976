/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # fairseat
//!
//! Registration admission and waitlist promotion engine for capacity-limited
//! events, such as the stalls and talks of a campus fair.
//!
//! The engine decides, under a fixed seat limit per event, whether a
//! registration request is **confirmed** immediately or **queued** on a FIFO
//! waitlist. When a confirmed seat is cancelled the head of the waitlist is
//! promoted into a time-boxed **pending** hold that an operator must approve
//! within the hold TTL; holds that are not approved in time are swept back to
//! the tail of the waitlist.
//!
//! ## Lifecycle
//!
//! ```text
//! WAITING --(promote)--> PENDING --(approve, within TTL)--> CONFIRMED
//!    ^                      |
//!    +-----(sweep, TTL)-----+
//!
//! WAITING | PENDING --(cancel)--> removed
//! CONFIRMED --(cancel)--> removed, then promote()
//! ```
//!
//! ## Concurrency
//!
//! The capacity check-and-insert of an admission and the
//! free-seat-then-promote of a cancellation run under a per-event lock, so
//! `confirmed(event) <= limit(event)` holds under any number of concurrent
//! callers. Registration ids are reserved atomically by the
//! [`IdGenerator`](ids::IdGenerator).
//!
//! ## Example
//!
//! ```no_run
//! use fairseat::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), RegistrationError> {
//! let engine = RegistrationEngine::new(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(MockPaymentProcessor::new()),
//!     EngineConfig::default(),
//! );
//!
//! let club = engine
//!     .add_user(NewUser::club("robotics", "robotics@upi"))
//!     .await?;
//! let alice = engine.add_user(NewUser::regular("alice")).await?;
//!
//! let now = fairseat::utils::current_time_secs();
//! engine.add_event(NewEvent {
//!     club_id: club,
//!     name: "Line Follower Workshop".to_string(),
//!     location: "Lab 3".to_string(),
//!     categories: vec!["robotics".to_string()],
//!     window: TimeWindow::new(now + 3_600, now + 7_200),
//!     seat_limit: 30,
//!     price: 0,
//! })?;
//!
//! let admission = engine.register("Line Follower Workshop", alice).await?;
//! assert_eq!(
//!     engine.status(admission.registration_id),
//!     RegistrationStatus::Confirmed
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod conflict;
pub mod engine;
mod error;
pub mod ids;
pub mod model;
pub mod payment;
pub mod response;
pub mod store;
pub mod utils;

pub use config::EngineConfig;
pub use engine::{Admission, Cancellation, RegistrationEngine, SweeperHandle};
pub use error::{ErrorKind, RegistrationError};

/// Commonly used types, re-exported for glob import.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{
        Admission, Cancellation, LifecycleEvent, MaintenanceReport, RegistrationEngine,
        SweeperHandle, Transition,
    };
    pub use crate::error::{ErrorKind, RegistrationError};
    pub use crate::model::{
        Event, EventFilter, EventId, LeaderboardEntry, NewEvent, NewUser, OrderId, Registration,
        RegistrationId, RegistrationState, RegistrationStatus, TimeWindow, User, UserId, UserType,
    };
    pub use crate::payment::{MockPaymentProcessor, PaymentError, PaymentProcessor};
    pub use crate::response::Response;
    pub use crate::store::{InMemoryStore, RegistrationStore};
    pub use crate::utils::{Clock, ManualClock, SystemClock};
}
