/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Time sources and logging setup.

mod clock;
mod logger;

pub use clock::{Clock, ManualClock, SystemClock, current_time_secs};
pub use logger::setup_logger;
