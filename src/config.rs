/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Engine configuration.
//!
//! Loaded from environment variables (optionally through a `.env` file) with
//! defaults matching the fair's house rules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default pending hold TTL: one hour.
pub const DEFAULT_HOLD_TTL_SECS: u64 = 3_600;

/// Default timeout for a payment processor call.
pub const DEFAULT_PAYMENT_TIMEOUT_MS: u64 = 10_000;

/// Default period of the background sweeper.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default longest allowed event: twelve hours.
pub const DEFAULT_MAX_EVENT_DURATION_SECS: u64 = 12 * 60 * 60;

/// Default maximum number of categories per event.
pub const DEFAULT_MAX_CATEGORIES: usize = 50;

/// Tunables of a [`RegistrationEngine`](crate::RegistrationEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long a pending hold stays valid, in seconds.
    pub hold_ttl_secs: u64,
    /// Timeout applied to each payment processor call, in milliseconds.
    pub payment_timeout_ms: u64,
    /// Period of the background sweeper, in seconds.
    pub sweep_interval_secs: u64,
    /// Longest allowed event, in seconds.
    pub max_event_duration_secs: u64,
    /// Maximum number of categories on one event.
    pub max_categories: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hold_ttl_secs: DEFAULT_HOLD_TTL_SECS,
            payment_timeout_ms: DEFAULT_PAYMENT_TIMEOUT_MS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            max_event_duration_secs: DEFAULT_MAX_EVENT_DURATION_SECS,
            max_categories: DEFAULT_MAX_CATEGORIES,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Recognised variables:
    ///
    /// - `FAIRSEAT_HOLD_TTL_SECS`
    /// - `FAIRSEAT_PAYMENT_TIMEOUT_MS`
    /// - `FAIRSEAT_SWEEP_INTERVAL_SECS`
    /// - `FAIRSEAT_MAX_EVENT_DURATION_SECS`
    /// - `FAIRSEAT_MAX_CATEGORIES`
    ///
    /// Missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from a dotenv-style file without touching the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns the [`dotenvy::Error`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let vars = dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self::from_lookup(|key| vars.get(key).cloned()))
    }

    /// Builds a configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            hold_ttl_secs: parse_or(&lookup, "FAIRSEAT_HOLD_TTL_SECS", defaults.hold_ttl_secs),
            payment_timeout_ms: parse_or(
                &lookup,
                "FAIRSEAT_PAYMENT_TIMEOUT_MS",
                defaults.payment_timeout_ms,
            ),
            sweep_interval_secs: parse_or(
                &lookup,
                "FAIRSEAT_SWEEP_INTERVAL_SECS",
                defaults.sweep_interval_secs,
            ),
            max_event_duration_secs: parse_or(
                &lookup,
                "FAIRSEAT_MAX_EVENT_DURATION_SECS",
                defaults.max_event_duration_secs,
            ),
            max_categories: parse_or(&lookup, "FAIRSEAT_MAX_CATEGORIES", defaults.max_categories),
        }
    }

    /// The payment call timeout as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn payment_timeout(&self) -> Duration {
        Duration::from_millis(self.payment_timeout_ms)
    }

    /// The sweeper period as a [`Duration`], never shorter than one second.
    #[inline]
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable configuration value");
            default
        }),
        None => default,
    }
}
