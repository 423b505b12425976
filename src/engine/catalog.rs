/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Users, events, ratings and the club leaderboard.

use super::RegistrationEngine;
use crate::error::RegistrationError;
use crate::model::{
    Event, EventFilter, EventId, LeaderboardEntry, NewEvent, NewUser, User, UserId, UserType,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

impl RegistrationEngine {
    /// Creates a user account.
    ///
    /// A club must supply a payment address, which the payment processor has
    /// to accept. Other account types never keep one.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidInput`] for a blank username or a club
    ///   without an address
    /// - [`RegistrationError::DuplicateUsername`] if the name is taken
    /// - [`RegistrationError::PaymentFailed`] if the address is rejected
    pub async fn add_user(&self, request: NewUser) -> Result<UserId, RegistrationError> {
        let username = request.username.trim().to_string();
        if username.is_empty() {
            return Err(RegistrationError::invalid("username must not be empty"));
        }
        if self.store.user_by_name(&username).is_some() {
            return Err(RegistrationError::DuplicateUsername(username));
        }

        let payment_address = match request.user_type {
            UserType::Club => {
                let address = request
                    .payment_address
                    .map(|address| address.trim().to_string())
                    .filter(|address| !address.is_empty())
                    .ok_or_else(|| {
                        RegistrationError::invalid("a club needs a payment address")
                    })?;
                self.payments.validate_address(&address).await?;
                Some(address)
            }
            UserType::Admin | UserType::Regular => None,
        };

        let interests: BTreeSet<String> = request
            .interests
            .iter()
            .map(|interest| interest.trim())
            .filter(|interest| !interest.is_empty())
            .map(str::to_string)
            .collect();

        let reservation = self
            .ids
            .generate(|candidate| self.store.contains_user_id(UserId::from(candidate)));
        let id = UserId::from(reservation.id());
        self.store.insert_user(User {
            id,
            username: username.clone(),
            user_type: request.user_type,
            interests,
            payment_address,
        })?;

        info!(user_id = %id, username = %username, user_type = ?request.user_type, "user added");
        Ok(id)
    }

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UserNotFound`] if the user does not exist.
    pub fn get_user(&self, id: UserId) -> Result<User, RegistrationError> {
        self.store
            .user(id)
            .ok_or_else(|| RegistrationError::UserNotFound(id.to_string()))
    }

    /// Looks up a user by username.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UserNotFound`] if no user has that name.
    pub fn find_user(&self, username: &str) -> Result<User, RegistrationError> {
        self.store
            .user_by_name(username)
            .ok_or_else(|| RegistrationError::UserNotFound(username.to_string()))
    }

    /// Every user id.
    #[must_use]
    pub fn list_user_ids(&self) -> Vec<UserId> {
        self.store.user_ids()
    }

    /// Replaces a club's payment address after validating it.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::UserNotFound`], [`RegistrationError::InvalidInput`]
    /// when the user is not a club, or [`RegistrationError::PaymentFailed`].
    pub async fn update_club_payment_address(
        &self,
        club_id: UserId,
        address: &str,
    ) -> Result<User, RegistrationError> {
        let club = self.get_user(club_id)?;
        if !club.is_club() {
            return Err(RegistrationError::invalid(format!(
                "user {club_id} is not a club"
            )));
        }

        let address = address.trim();
        self.payments.validate_address(address).await?;
        let updated = self
            .store
            .update_payment_address(club_id, address.to_string())?;
        info!(user_id = %club_id, "club payment address updated");
        Ok(updated)
    }

    /// Creates an event owned by a club.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::UserNotFound`] if the club does not exist
    /// - [`RegistrationError::InvalidInput`] if the owner is not a club, or
    ///   the name, window, seat limit or categories are invalid
    /// - [`RegistrationError::DuplicateEventName`] if the name is taken
    pub fn add_event(&self, request: NewEvent) -> Result<EventId, RegistrationError> {
        let club = self.get_user(request.club_id)?;
        if !club.is_club() {
            return Err(RegistrationError::invalid(format!(
                "only clubs can add events, user {} is not a club",
                club.id
            )));
        }

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(RegistrationError::invalid("event name must not be empty"));
        }
        if self.store.event_by_name(&name).is_some() {
            return Err(RegistrationError::DuplicateEventName(name));
        }

        self.validate_schedule(&request)
            .inspect_err(|err| warn!(event = %name, error = %err, "event rejected"))?;

        let categories = self.validate_categories(&request.categories)?;

        let reservation = self
            .ids
            .generate(|candidate| self.store.contains_event_id(EventId::from(candidate)));
        let id = EventId::from(reservation.id());
        self.store.insert_event(Event {
            id,
            name: name.clone(),
            location: request.location.trim().to_string(),
            categories,
            window: request.window,
            seat_limit: request.seat_limit,
            price: request.price,
            club_id: club.id,
            rating: None,
        })?;

        info!(event_id = %id, event = %name, club_id = %club.id, seat_limit = request.seat_limit, "event added");
        Ok(id)
    }

    fn validate_schedule(&self, request: &NewEvent) -> Result<(), RegistrationError> {
        let window = request.window;
        if window.start <= self.now() {
            return Err(RegistrationError::invalid("event must start in the future"));
        }
        if window.end <= window.start {
            return Err(RegistrationError::invalid("event must end after it starts"));
        }
        if window.duration_secs() > self.config.max_event_duration_secs {
            return Err(RegistrationError::invalid(format!(
                "event may last at most {} seconds",
                self.config.max_event_duration_secs
            )));
        }
        if request.seat_limit == 0 {
            return Err(RegistrationError::invalid("seat limit must be greater than zero"));
        }
        Ok(())
    }

    fn validate_categories(
        &self,
        categories: &[String],
    ) -> Result<BTreeSet<String>, RegistrationError> {
        if categories.len() > self.config.max_categories {
            return Err(RegistrationError::invalid(format!(
                "at most {} categories allowed",
                self.config.max_categories
            )));
        }
        categories
            .iter()
            .map(|category| {
                let category = category.trim();
                if category.is_empty() {
                    Err(RegistrationError::invalid("categories must not be blank"))
                } else {
                    Ok(category.to_string())
                }
            })
            .collect()
    }

    /// Looks up an event by id.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::EventIdNotFound`] if the event does not exist.
    pub fn get_event(&self, id: EventId) -> Result<Event, RegistrationError> {
        self.store
            .event(id)
            .ok_or(RegistrationError::EventIdNotFound(id))
    }

    /// Every event, ordered by start time.
    #[must_use]
    pub fn list_events(&self) -> Vec<Event> {
        let mut events = self.store.events();
        events.sort_by_key(|event| (event.window.start, event.id));
        events
    }

    /// Events matching every set criterion of `filter`, ordered by start time.
    #[must_use]
    pub fn search_events(&self, filter: &EventFilter) -> Vec<Event> {
        let mut events = self.store.search_events(filter);
        events.sort_by_key(|event| (event.window.start, event.id));
        events
    }

    /// Folds a rating between 1 and 5 into the event's running average.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::InvalidInput`] for an out-of-range rating, or
    /// [`RegistrationError::EventIdNotFound`].
    pub fn update_rating(&self, event_id: EventId, rating: u8) -> Result<Event, RegistrationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(RegistrationError::invalid(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
            )));
        }
        let event = self.store.update_rating(event_id, f64::from(rating))?;
        info!(event_id = %event_id, rating, average = ?event.rating, "event rated");
        Ok(event)
    }

    /// Clubs ranked by the mean rating of their rated events.
    ///
    /// A club with no rated event scores `0.0`. Ties are broken by name.
    #[must_use]
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut ratings: HashMap<UserId, Vec<f64>> = HashMap::new();
        for event in self.store.events() {
            if let Some(rating) = event.rating {
                ratings.entry(event.club_id).or_default().push(rating);
            }
        }

        let mut board: Vec<LeaderboardEntry> = self
            .store
            .user_ids()
            .into_iter()
            .filter_map(|id| self.store.user(id))
            .filter(User::is_club)
            .map(|club| {
                let average_rating = ratings
                    .get(&club.id)
                    .map_or(0.0, |r| r.iter().sum::<f64>() / r.len() as f64);
                LeaderboardEntry {
                    club_id: club.id,
                    club_name: club.username,
                    average_rating,
                }
            })
            .collect();

        board.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| a.club_name.cmp(&b.club_name))
        });
        board.truncate(limit);
        board
    }
}
