/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Identifier generation.
//!
//! Ids are random 64-bit values taken from a v4 UUID. A candidate is retried
//! until it neither collides with the caller's id space nor with an id another
//! caller is still about to store. That reservation lives in an
//! [`IdReservation`] guard and is released when the guard drops, so the
//! reserved set only ever holds ids whose records are not yet stored.

use dashmap::DashSet;
use uuid::Uuid;

/// Issues fresh, collision-free identifiers.
#[derive(Debug, Default)]
pub struct IdGenerator {
    reserved: DashSet<u64>,
}

/// An id held back from other callers until the guard is dropped.
///
/// Keep the guard alive until the record carrying the id is in the store
/// (or the operation has failed).
#[derive(Debug)]
#[must_use = "dropping the reservation releases the id immediately"]
pub struct IdReservation<'a> {
    id: u64,
    generator: &'a IdGenerator,
}

impl IdReservation<'_> {
    /// The reserved id.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for IdReservation<'_> {
    fn drop(&mut self) {
        self.generator.reserved.remove(&self.id);
    }
}

impl IdGenerator {
    /// Creates a generator with no reserved ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws an id for which `taken` returns `false` and reserves it.
    ///
    /// There is no retry bound; with a 64-bit space a retry is already rare.
    pub fn generate(&self, taken: impl Fn(u64) -> bool) -> IdReservation<'_> {
        loop {
            let candidate = random_id();
            if candidate == 0 || taken(candidate) {
                continue;
            }
            if self.reserved.insert(candidate) {
                return IdReservation {
                    id: candidate,
                    generator: self,
                };
            }
        }
    }

    /// Number of ids currently reserved.
    #[must_use]
    pub fn reserved_count(&self) -> usize {
        self.reserved.len()
    }
}

#[inline]
fn random_id() -> u64 {
    let (high, low) = Uuid::new_v4().as_u64_pair();
    high ^ low
}
