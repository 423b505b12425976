/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Timeout-guarded access to a [`PaymentProcessor`].

use super::{PaymentError, PaymentProcessor};
use crate::model::{Event, OrderId, UserId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Wraps a processor with a per-call timeout.
///
/// Failed or timed-out calls are reported once and never retried.
#[derive(Clone)]
pub struct PaymentGate {
    processor: Arc<dyn PaymentProcessor>,
    timeout: Duration,
}

impl std::fmt::Debug for PaymentGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentGate")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PaymentGate {
    /// Creates a gate around `processor`.
    #[must_use]
    pub fn new(processor: Arc<dyn PaymentProcessor>, timeout: Duration) -> Self {
        Self { processor, timeout }
    }

    /// Obtains an order for a paid event, or `None` for a free one.
    ///
    /// # Errors
    ///
    /// The processor's error, or [`PaymentError::Timeout`].
    pub async fn order_for(
        &self,
        event: &Event,
        user_id: UserId,
        now: u64,
    ) -> Result<Option<OrderId>, PaymentError> {
        if !event.is_paid() {
            return Ok(None);
        }

        let receipt = format!("event_{}_{}_{}", event.id, user_id, now);
        let call = self.processor.create_order(event.price, &receipt);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(order_id)) => {
                info!(event_id = %event.id, user_id = %user_id, order_id = %order_id, "payment order created");
                Ok(Some(order_id))
            }
            Ok(Err(err)) => {
                warn!(event_id = %event.id, user_id = %user_id, error = %err, "payment order failed");
                Err(err)
            }
            Err(_) => {
                warn!(event_id = %event.id, user_id = %user_id, "payment order timed out");
                Err(PaymentError::Timeout)
            }
        }
    }

    /// Validates a payment address.
    ///
    /// # Errors
    ///
    /// [`PaymentError::InvalidAddress`] when the processor says no, otherwise
    /// the processor's error or [`PaymentError::Timeout`].
    pub async fn validate_address(&self, address: &str) -> Result<(), PaymentError> {
        let call = self.processor.validate_address(address);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(PaymentError::InvalidAddress {
                address: address.to_string(),
            }),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(PaymentError::Timeout),
        }
    }
}
