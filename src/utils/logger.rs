/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Process-wide `tracing` subscriber setup.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

static INIT: Once = Once::new();

/// Installs a formatted `tracing` subscriber for the whole process.
///
/// The level is read from the `LOGLEVEL` environment variable (`DEBUG`,
/// `INFO`, `WARN`, `ERROR`, `TRACE`) and defaults to `INFO`. Only the first
/// call has any effect.
pub fn setup_logger() {
    INIT.call_once(|| {
        let level = parse_level(env::var("LOGLEVEL").ok().as_deref());

        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("log level set to {}", level);
        }
    });
}

fn parse_level(raw: Option<&str>) -> Level {
    match raw.map(str::to_uppercase).as_deref() {
        Some("DEBUG") => Level::DEBUG,
        Some("ERROR") => Level::ERROR,
        Some("WARN") => Level::WARN,
        Some("TRACE") => Level::TRACE,
        _ => Level::INFO,
    }
}
