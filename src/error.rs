/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Error types returned by the registration engine.

use crate::model::{EventId, RegistrationId, UserId};
use crate::payment::PaymentError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`RegistrationError`].
///
/// This is the `kind` reported to callers in a failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An event, user or registration does not exist.
    NotFound,
    /// Duplicate name, duplicate registration or time overlap.
    Conflict,
    /// A request failed validation.
    InvalidInput,
    /// Order creation or payment address validation failed.
    PaymentFailed,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::PaymentFailed => write!(f, "payment_failed"),
        }
    }
}

/// Errors produced by registration and catalogue operations.
///
/// A failed operation leaves every list exactly as it was before the call.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// No event with the given name.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// No event with the given id.
    #[error("event {0} not found")]
    EventIdNotFound(EventId),

    /// No user with the given id or name.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// The registration id is in none of the confirmed, waiting or pending lists.
    ///
    /// Also returned by approval when the pending hold was just evicted by the sweep.
    #[error("registration {0} not found")]
    RegistrationNotFound(RegistrationId),

    /// The username is already taken.
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    /// The event name is already taken.
    #[error("event name already exists: {0}")]
    DuplicateEventName(String),

    /// The user already holds a registration, in any state, for this event.
    #[error("user {user_id} is already registered for event {event_id}")]
    AlreadyRegistered {
        /// The requesting user.
        user_id: UserId,
        /// The event requested.
        event_id: EventId,
    },

    /// The event overlaps another event the user is confirmed for.
    #[error("time slot of event {event_id} collides with confirmed event {conflicting}")]
    TimeConflict {
        /// The event requested.
        event_id: EventId,
        /// The confirmed event it overlaps.
        conflicting: EventId,
    },

    /// The request failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The payment collaborator rejected or failed the call.
    #[error("payment failed: {0}")]
    PaymentFailed(#[from] PaymentError),
}

impl RegistrationError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EventNotFound(_)
            | Self::EventIdNotFound(_)
            | Self::UserNotFound(_)
            | Self::RegistrationNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateUsername(_)
            | Self::DuplicateEventName(_)
            | Self::AlreadyRegistered { .. }
            | Self::TimeConflict { .. } => ErrorKind::Conflict,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::PaymentFailed(_) => ErrorKind::PaymentFailed,
        }
    }

    /// Shorthand for [`RegistrationError::InvalidInput`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
