/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Payment processor collaborator.
//!
//! The engine only needs two things from a payment provider: create an order
//! for a paid registration and validate a club's payment address. Order
//! creation success is the whole trust boundary; settlement is never checked.

mod gate;
mod mock;

pub use gate::PaymentGate;
pub use mock::MockPaymentProcessor;

use crate::model::OrderId;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by [`PaymentProcessor`] methods.
pub type PaymentFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PaymentError>> + Send + 'a>>;

/// Errors reported by a payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The processor refused to create the order.
    #[error("order rejected: {reason}")]
    OrderRejected {
        /// Processor-supplied reason.
        reason: String,
    },

    /// The payment address is not valid.
    #[error("invalid payment address: {address}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
    },

    /// The call did not complete within the configured timeout.
    #[error("payment processor timed out")]
    Timeout,

    /// The processor could not be reached or failed unexpectedly.
    #[error("payment processor unavailable: {0}")]
    Unavailable(String),
}

/// An external payment provider.
///
/// Calls are treated as blocking network operations: the engine wraps each
/// one in a timeout and never retries.
pub trait PaymentProcessor: Send + Sync {
    /// Creates an order for `amount` minor currency units.
    ///
    /// `receipt` is an opaque reference the processor stores with the order.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] if no order was created.
    fn create_order<'a>(&'a self, amount: u64, receipt: &'a str) -> PaymentFuture<'a, OrderId>;

    /// Checks whether `address` can receive payments.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] if the check itself could not be performed.
    fn validate_address<'a>(&'a self, address: &'a str) -> PaymentFuture<'a, bool>;
}
