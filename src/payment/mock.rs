/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! In-process payment processor for development and tests.

use super::{PaymentError, PaymentFuture, PaymentProcessor};
use crate::model::OrderId;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Mock processor that accepts every order unless told to fail.
///
/// Addresses are considered valid when they look like `name@provider`.
#[derive(Debug, Default)]
pub struct MockPaymentProcessor {
    fail_orders: AtomicBool,
    latency: Option<Duration>,
    orders_created: AtomicUsize,
}

impl MockPaymentProcessor {
    /// A processor that succeeds immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every order creation by `latency`. Address checks stay instant.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes subsequent order creations fail (or succeed again).
    pub fn set_fail_orders(&self, fail: bool) {
        self.fail_orders.store(fail, Ordering::SeqCst);
    }

    /// Number of orders successfully created.
    #[must_use]
    pub fn orders_created(&self) -> usize {
        self.orders_created.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl PaymentProcessor for MockPaymentProcessor {
    fn create_order<'a>(&'a self, amount: u64, receipt: &'a str) -> PaymentFuture<'a, OrderId> {
        Box::pin(async move {
            self.simulate_latency().await;

            if self.fail_orders.load(Ordering::SeqCst) {
                return Err(PaymentError::OrderRejected {
                    reason: format!("mock rejection for receipt {receipt}"),
                });
            }

            let order_id = OrderId::new(format!("order_{}", Uuid::new_v4().simple()));
            self.orders_created.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(amount, receipt, order_id = %order_id, "mock order created");
            Ok(order_id)
        })
    }

    fn validate_address<'a>(&'a self, address: &'a str) -> PaymentFuture<'a, bool> {
        Box::pin(async move {
            let valid = address
                .split_once('@')
                .is_some_and(|(name, provider)| !name.is_empty() && !provider.is_empty());
            Ok(valid)
        })
    }
}
