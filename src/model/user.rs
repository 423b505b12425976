/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! User accounts.

use super::id::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Fair administrator.
    Admin,
    /// A club that owns events and receives payments.
    Club,
    /// A regular attendee.
    Regular,
}

/// A registered user account.
///
/// Immutable after creation except for a club's payment address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique id.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Account role.
    pub user_type: UserType,
    /// Declared interests.
    pub interests: BTreeSet<String>,
    /// Payment address, only meaningful for clubs.
    pub payment_address: Option<String>,
}

impl User {
    /// Returns `true` if this account is a club.
    #[inline]
    #[must_use]
    pub fn is_club(&self) -> bool {
        self.user_type == UserType::Club
    }
}

/// Request to create a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Requested username.
    pub username: String,
    /// Account role.
    pub user_type: UserType,
    /// Declared interests.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Payment address, required for clubs.
    #[serde(default)]
    pub payment_address: Option<String>,
}

impl NewUser {
    /// A regular attendee with no interests.
    #[must_use]
    pub fn regular(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            user_type: UserType::Regular,
            interests: Vec::new(),
            payment_address: None,
        }
    }

    /// A club account with the given payment address.
    #[must_use]
    pub fn club(username: impl Into<String>, payment_address: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            user_type: UserType::Club,
            interests: Vec::new(),
            payment_address: Some(payment_address.into()),
        }
    }

    /// Adds interests to the request.
    #[must_use]
    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests.extend(interests.into_iter().map(Into::into));
        self
    }
}
