/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Domain model: users, events and registrations.

mod event;
mod id;
mod registration;
mod user;

pub use event::{Event, EventFilter, LeaderboardEntry, NewEvent, TimeWindow};
pub use id::{EventId, OrderId, RegistrationId, UserId};
pub use registration::{Registration, RegistrationState, RegistrationStatus};
pub use user::{NewUser, User, UserType};
