/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Time-overlap detection between a candidate event and a user's confirmed events.

use crate::model::{Event, EventId, TimeWindow};

/// Returns the id of the first existing event whose window overlaps `candidate`.
///
/// Pure; the caller decides which events count as "existing". The engine
/// passes only the user's confirmed events, so waiting and pending entries
/// never block a registration.
///
/// # Examples
///
/// ```
/// use fairseat::conflict::find_conflict;
/// use fairseat::model::{EventId, TimeWindow};
///
/// let existing = [(EventId::from(1), TimeWindow::new(100, 200))];
/// assert_eq!(
///     find_conflict(TimeWindow::new(150, 250), existing),
///     Some(EventId::from(1))
/// );
/// assert_eq!(find_conflict(TimeWindow::new(200, 300), existing), None);
/// ```
#[must_use]
pub fn find_conflict<I>(candidate: TimeWindow, existing: I) -> Option<EventId>
where
    I: IntoIterator<Item = (EventId, TimeWindow)>,
{
    existing
        .into_iter()
        .find(|(_, window)| candidate.overlaps(window))
        .map(|(id, _)| id)
}

/// Convenience wrapper over [`find_conflict`] for full event records.
#[must_use]
pub fn find_event_conflict<'a, I>(candidate: &Event, confirmed: I) -> Option<EventId>
where
    I: IntoIterator<Item = &'a Event>,
{
    find_conflict(
        candidate.window,
        confirmed
            .into_iter()
            .filter(|event| event.id != candidate.id)
            .map(|event| (event.id, event.window)),
    )
}
